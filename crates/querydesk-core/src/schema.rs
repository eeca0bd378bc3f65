//! Schema metadata types
//!
//! A read-only snapshot of a data source's tables, views, and columns.
//! The snapshot is fetched from the schema collaborator, replaced
//! wholesale on data-source switch, and never mutated in place.

use serde::{Deserialize, Serialize};

/// The schema name that collapses the grouping level in the browser
/// when it is the only schema present.
pub const DEFAULT_SCHEMA: &str = "public";

/// Column metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ColumnMeta {
    /// Column name
    #[serde(default)]
    pub name: String,
    /// Data type (database-specific string)
    #[serde(default)]
    pub data_type: String,
    /// Whether the column can be NULL
    #[serde(default)]
    pub nullable: bool,
    /// Whether the column is part of the primary key
    #[serde(default)]
    pub primary_key: bool,
    /// Default value expression
    #[serde(default)]
    pub default_value: Option<String>,
}

/// Metadata for a table or view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TableMeta {
    /// Table or view name
    #[serde(default)]
    pub name: String,
    /// Owning schema (e.g. "public")
    #[serde(default = "default_schema_name")]
    pub schema: String,
    /// Column metadata
    #[serde(default)]
    pub columns: Vec<ColumnMeta>,
}

fn default_schema_name() -> String {
    DEFAULT_SCHEMA.to_string()
}

/// Full schema snapshot for one data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchemaMetadata {
    /// Database the snapshot was taken from
    #[serde(default)]
    pub database: String,
    /// Tables, in catalog order
    #[serde(default)]
    pub tables: Vec<TableMeta>,
    /// Views, in catalog order
    #[serde(default)]
    pub views: Vec<TableMeta>,
}

impl SchemaMetadata {
    /// Validate a loosely-shaped collaborator payload into a typed snapshot
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Iterate over all tables and views
    pub fn objects(&self) -> impl Iterator<Item = &TableMeta> {
        self.tables.iter().chain(self.views.iter())
    }

    /// Distinct schema names, in first-appearance order
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for object in self.objects() {
            if !names.contains(&object.schema.as_str()) {
                names.push(&object.schema);
            }
        }
        names
    }

    /// Whether the grouping level should be flattened: exactly one
    /// schema and it is the default one.
    pub fn has_single_default_schema(&self) -> bool {
        self.schema_names() == [DEFAULT_SCHEMA]
    }

    /// Check if the snapshot contains no objects at all
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.views.is_empty()
    }
}
