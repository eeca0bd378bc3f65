//! Schema tree filtering
//!
//! Pure function from a schema snapshot plus a case-insensitive
//! substring to the tree the browser renders. Deterministic and free of
//! side effects; the output is ephemeral and never stored.
//!
//! Matching rules:
//! - A table or view is included iff its name matches or at least one
//!   of its columns matches.
//! - A name match keeps every column; a column-only match keeps just
//!   the matching columns.
//! - Objects are grouped by schema, except when the snapshot contains
//!   exactly one schema and it is the default ("public"), in which case
//!   the grouping level is flattened.
//! - The empty query is the identity transform.
//! - No matches anywhere yields an explicit terminal state instead of
//!   an empty tree rendered silently.

use querydesk_core::{ColumnMeta, SchemaMetadata, TableMeta};

/// Whether a browser node is a table or a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Table,
    View,
}

/// A table or view in the filtered tree, with the columns to render
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub name: String,
    pub schema: String,
    pub kind: ObjectKind,
    pub columns: Vec<ColumnMeta>,
}

/// One schema grouping level in the filtered tree
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaGroup {
    pub name: String,
    pub objects: Vec<ObjectNode>,
}

/// The tree the schema browser renders
#[derive(Debug, Clone, PartialEq)]
pub enum FilteredSchema {
    /// Single default schema: objects rendered without a grouping level
    Flat(Vec<ObjectNode>),
    /// Objects grouped by schema, in first-appearance order
    Grouped(Vec<SchemaGroup>),
    /// Nothing matched (or the snapshot holds no objects)
    NoMatches,
}

impl FilteredSchema {
    /// Total number of objects in the tree
    pub fn object_count(&self) -> usize {
        match self {
            FilteredSchema::Flat(objects) => objects.len(),
            FilteredSchema::Grouped(groups) => groups.iter().map(|g| g.objects.len()).sum(),
            FilteredSchema::NoMatches => 0,
        }
    }
}

/// Filter a schema snapshot down to the objects matching `query`
pub fn filter_schema(metadata: &SchemaMetadata, query: &str) -> FilteredSchema {
    let needle = query.trim().to_lowercase();

    let mut nodes: Vec<ObjectNode> = Vec::new();
    for (object, kind) in metadata
        .tables
        .iter()
        .map(|t| (t, ObjectKind::Table))
        .chain(metadata.views.iter().map(|v| (v, ObjectKind::View)))
    {
        if let Some(node) = filter_object(object, kind, &needle) {
            nodes.push(node);
        }
    }

    if nodes.is_empty() {
        return FilteredSchema::NoMatches;
    }

    if metadata.has_single_default_schema() {
        FilteredSchema::Flat(nodes)
    } else {
        FilteredSchema::Grouped(group_by_schema(nodes))
    }
}

fn filter_object(object: &TableMeta, kind: ObjectKind, needle: &str) -> Option<ObjectNode> {
    let name_matches = needle.is_empty() || object.name.to_lowercase().contains(needle);

    let columns = if name_matches {
        // Parent match implies full child visibility.
        object.columns.clone()
    } else {
        let matching: Vec<ColumnMeta> = object
            .columns
            .iter()
            .filter(|c| c.name.to_lowercase().contains(needle))
            .cloned()
            .collect();
        if matching.is_empty() {
            return None;
        }
        matching
    };

    Some(ObjectNode {
        name: object.name.clone(),
        schema: object.schema.clone(),
        kind,
        columns,
    })
}

fn group_by_schema(nodes: Vec<ObjectNode>) -> Vec<SchemaGroup> {
    let mut groups: Vec<SchemaGroup> = Vec::new();
    for node in nodes {
        match groups.iter_mut().find(|g| g.name == node.schema) {
            Some(group) => group.objects.push(node),
            None => groups.push(SchemaGroup {
                name: node.schema.clone(),
                objects: vec![node],
            }),
        }
    }
    groups
}
