//! Querydesk Core - Core abstractions and types for the query workspace
//!
//! This crate provides the fundamental traits and types that the other
//! querydesk crates depend on. It defines:
//!
//! - `QueryExecutor` - Trait for executing SQL against a data source
//! - `SchemaProvider` - Trait for fetching schema metadata
//! - `NaturalLanguageTranslator` - Trait for prompt-to-SQL translation
//! - `DataSourceCatalog` - Trait for listing selectable data sources
//! - Common types like `Value`, `Row`, `QueryResult`, `SchemaMetadata`

mod catalog;
mod collaborators;
mod error;
mod schema;
mod types;

pub use catalog::*;
pub use collaborators::*;
pub use error::*;
pub use schema::*;
pub use types::*;
