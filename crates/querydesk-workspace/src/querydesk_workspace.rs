//! Interactive query workspace
//!
//! Ties together the pieces of a tabbed SQL workspace: an ordered tab
//! collection with an always-valid active pointer, split layout sizing
//! backed by persisted preferences, a pure schema-browser filter, and a
//! coordinator that commits execution and translation outcomes back
//! into the tab that issued them.

pub mod coordinator;
pub mod filter;
pub mod history;
pub mod tabs;
pub mod view_models;
pub mod workspace;

pub use coordinator::QueryExecutionCoordinator;
pub use filter::{filter_schema, FilteredSchema, ObjectKind, ObjectNode, SchemaGroup};
pub use history::{ExecutionHistory, ExecutionRecord};
pub use tabs::{QueryTab, TabStore};
pub use view_models::WorkspaceSnapshot;
pub use workspace::{QueryWorkspace, SCHEMA_FETCH_TIMEOUT};
