//! Core result types for the query workspace

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ColumnMeta;

/// A single cell value in a query result
///
/// Collaborator responses arrive as loose JSON; the untagged
/// deserialization maps JSON scalars onto typed variants at the
/// boundary, so the rest of the workspace only ever sees typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    Text(String),
    /// Structured JSON payload (objects and arrays)
    Json(serde_json::Value),
}

impl Value {
    /// Check if the value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            Value::Text(s) => s.parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(s) => s.parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
            Value::Json(v) => write!(f, "{}", v),
        }
    }
}

/// A row from a query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    /// Column values, in column order
    pub values: Vec<Value>,
}

impl Row {
    /// Create a new row
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Get a value by column index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

/// Result of a single query execution
///
/// Attached to exactly one tab; fully replaced on every execution and
/// cleared when a re-execution fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Unique result ID
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Column metadata
    #[serde(default)]
    pub columns: Vec<ColumnMeta>,
    /// Result rows
    #[serde(default)]
    pub rows: Vec<Row>,
    /// Server-reported row count
    #[serde(default)]
    pub row_count: u64,
    /// Execution time in milliseconds
    #[serde(default)]
    pub execution_time_ms: u64,
    /// Whether the result set was truncated by the executor
    #[serde(default)]
    pub truncated: bool,
}

impl QueryResult {
    /// Create a new empty query result
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            columns: Vec::new(),
            rows: Vec::new(),
            row_count: 0,
            execution_time_ms: 0,
            truncated: false,
        }
    }

    /// Validate a loosely-shaped collaborator payload into a typed result
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Check if the result has rows
    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_value_accessors() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Text("abc".into()).as_str(), Some("abc"));
        assert_eq!(Value::Integer(7).as_i64(), Some(7));
        assert_eq!(Value::Text("42".into()).as_i64(), Some(42));
        assert_eq!(Value::Integer(2).as_f64(), Some(2.0));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Float(1.5).as_bool(), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::Text("hi".into()).to_string(), "hi");
    }

    #[test]
    fn test_value_from_loose_json() {
        let row: Row = serde_json::from_value(json!([null, true, 5, 1.25, "x", {"k": 1}])).unwrap();
        assert_eq!(
            row.values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Integer(5),
                Value::Float(1.25),
                Value::Text("x".into()),
                Value::Json(json!({"k": 1})),
            ]
        );
    }

    #[test]
    fn test_query_result_from_partial_payload() {
        // Upstream format drift: missing fields fall back to defaults
        // instead of failing deserialization.
        let result = QueryResult::from_value(json!({
            "columns": [{"name": "id", "data_type": "integer"}],
            "rows": [[1], [2]],
        }))
        .unwrap();

        assert_eq!(result.column_count(), 1);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.row_count, 0);
        assert!(!result.truncated);
    }

    #[test]
    fn test_query_result_empty() {
        let result = QueryResult::empty();
        assert!(!result.has_rows());
        assert_eq!(result.column_count(), 0);
    }
}
