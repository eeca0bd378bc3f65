//! Data source catalog trait
//!
//! Connection CRUD lives outside the workspace core; the catalog only
//! exposes what the core needs: the selectable sources and their
//! active flag.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named data source the workspace can execute against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Database to pass to the execution collaborators
    pub database: String,
    /// Whether the source currently accepts work
    pub active: bool,
}

/// Catalog of data sources, opaque to the workspace core
pub trait DataSourceCatalog: Send + Sync {
    /// List all known data sources
    fn list(&self) -> Vec<DataSource>;

    /// Look up a data source by id
    fn get(&self, id: Uuid) -> Option<DataSource>;
}
