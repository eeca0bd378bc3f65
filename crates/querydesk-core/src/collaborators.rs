//! Collaborator traits for asynchronous workspace operations
//!
//! These traits are the seam between the workspace core and the
//! services it depends on but does not implement: schema introspection,
//! SQL execution, and natural-language translation. All calls suspend
//! at this boundary and resume on completion; the core never assumes
//! parallel execution.

use async_trait::async_trait;

use crate::{QueryResult, Result, SchemaMetadata};

/// Provider of schema metadata snapshots
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// Fetch the schema snapshot for a database
    async fn fetch(&self, database: &str) -> Result<SchemaMetadata>;

    /// Force a re-fetch of the same shape, bypassing any upstream cache
    async fn refresh(&self, database: &str) -> Result<SchemaMetadata> {
        self.fetch(database).await
    }
}

/// Executor of SQL queries
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute SQL against a database and return the typed result
    async fn execute(&self, database: &str, sql: &str) -> Result<QueryResult>;
}

/// Output of a natural-language translation: the generated SQL paired
/// with the result of running it.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// SQL the translator generated from the prompt
    pub generated_sql: String,
    /// Result of executing the generated SQL
    pub result: QueryResult,
}

/// Translator from natural-language prompts to executed SQL
#[async_trait]
pub trait NaturalLanguageTranslator: Send + Sync {
    /// Translate a prompt for a database and execute the generated SQL
    async fn translate(&self, database: &str, prompt: &str) -> Result<Translation>;
}
