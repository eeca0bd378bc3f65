//! Execution history
//!
//! Ring buffer of past executions, most recent first. Records both SQL
//! and natural-language runs; entries outlive their owning tab.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use uuid::Uuid;

/// One recorded execution
#[derive(Clone, Debug)]
pub struct ExecutionRecord {
    /// Unique identifier
    pub id: Uuid,

    /// The SQL that was executed
    pub sql: String,

    /// Data source the execution ran against
    pub source_id: Option<Uuid>,

    /// Tab that issued the execution
    pub tab_id: Uuid,

    /// When the execution finished
    pub executed_at: DateTime<Utc>,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,

    /// Rows returned on success
    pub row_count: Option<u64>,

    /// Error message on failure
    pub error: Option<String>,
}

impl ExecutionRecord {
    /// Record a successful execution
    pub fn success(
        sql: String,
        source_id: Option<Uuid>,
        tab_id: Uuid,
        duration_ms: u64,
        row_count: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sql,
            source_id,
            tab_id,
            executed_at: Utc::now(),
            duration_ms,
            row_count: Some(row_count),
            error: None,
        }
    }

    /// Record a failed execution
    pub fn failure(
        sql: String,
        source_id: Option<Uuid>,
        tab_id: Uuid,
        duration_ms: u64,
        error: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sql,
            source_id,
            tab_id,
            executed_at: Utc::now(),
            duration_ms,
            row_count: None,
            error: Some(error),
        }
    }

    /// Whether the execution succeeded
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Bounded execution history, most recent first
pub struct ExecutionHistory {
    records: VecDeque<ExecutionRecord>,
    max_records: usize,
}

impl ExecutionHistory {
    /// Create a history that keeps at most `max_records` entries
    pub fn new(max_records: usize) -> Self {
        Self {
            records: VecDeque::new(),
            max_records,
        }
    }

    /// Add a record, evicting the oldest when over capacity
    pub fn record(&mut self, record: ExecutionRecord) {
        tracing::debug!(
            execution_id = %record.id,
            success = record.succeeded(),
            duration_ms = record.duration_ms,
            "recording execution"
        );
        self.records.push_front(record);
        while self.records.len() > self.max_records {
            self.records.pop_back();
        }
    }

    /// All records, most recent first
    pub fn records(&self) -> impl Iterator<Item = &ExecutionRecord> {
        self.records.iter()
    }

    /// Records for a specific data source
    pub fn for_source(&self, source_id: Uuid) -> impl Iterator<Item = &ExecutionRecord> {
        self.records
            .iter()
            .filter(move |r| r.source_id == Some(source_id))
    }

    /// Case-insensitive search over recorded SQL
    pub fn search(&self, query: &str) -> impl Iterator<Item = &ExecutionRecord> {
        let query_lower = query.to_lowercase();
        self.records
            .iter()
            .filter(move |r| r.sql.to_lowercase().contains(&query_lower))
    }

    /// Drop all records
    pub fn clear(&mut self) {
        let count = self.records.len();
        tracing::info!(records_cleared = count, "clearing execution history");
        self.records.clear();
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for ExecutionHistory {
    fn default() -> Self {
        Self::new(1000)
    }
}
