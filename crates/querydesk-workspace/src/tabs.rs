//! Query tab collection
//!
//! `TabStore` owns the ordered tab collection and the active-tab
//! pointer. All operations are pure reducers over the collection:
//! unknown ids are ignored rather than raised, so a result arriving for
//! a tab closed moments earlier degrades silently instead of tearing
//! the UI down.
//!
//! Invariants: the collection always holds at least one tab, and the
//! active id always references a live member.

use chrono::{DateTime, Utc};
use querydesk_core::QueryResult;
use uuid::Uuid;

/// An independent query-editing context
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTab {
    /// Unique identifier
    pub id: Uuid,
    /// Display name, derived from creation time
    pub name: String,
    /// Current editor contents
    pub query_text: String,
    /// Last attached result, if any
    pub result: Option<QueryResult>,
    /// Whether the text has unexecuted edits
    pub dirty: bool,
    /// When the tab was created
    pub created_at: DateTime<Utc>,
}

impl QueryTab {
    fn new() -> Self {
        let created_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: format!("Query {}", created_at.format("%H:%M:%S")),
            query_text: String::new(),
            result: None,
            dirty: false,
            created_at,
        }
    }
}

/// Ordered collection of query tabs with an active pointer
#[derive(Debug)]
pub struct TabStore {
    tabs: Vec<QueryTab>,
    active_id: Uuid,
}

impl TabStore {
    /// Create a store holding one fresh, active tab
    pub fn new() -> Self {
        let tab = QueryTab::new();
        let active_id = tab.id;
        Self {
            tabs: vec![tab],
            active_id,
        }
    }

    /// All tabs in display order
    pub fn tabs(&self) -> &[QueryTab] {
        &self.tabs
    }

    /// Number of open tabs (always >= 1)
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// The collection invariant makes this always false; provided for
    /// completeness.
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Id of the active tab
    pub fn active_tab_id(&self) -> Uuid {
        self.active_id
    }

    /// The active tab
    pub fn active_tab(&self) -> &QueryTab {
        // The active id always references a live member; the fallback
        // only matters if the invariant were externally violated.
        self.tabs
            .iter()
            .find(|t| t.id == self.active_id)
            .unwrap_or(&self.tabs[0])
    }

    /// Look up a tab by id
    pub fn get(&self, id: Uuid) -> Option<&QueryTab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// Whether a tab with this id is still open
    pub fn contains(&self, id: Uuid) -> bool {
        self.tabs.iter().any(|t| t.id == id)
    }

    /// Append a fresh tab and make it active. Returns the new id.
    pub fn create_tab(&mut self) -> Uuid {
        let tab = QueryTab::new();
        let id = tab.id;
        self.tabs.push(tab);
        self.active_id = id;
        tracing::debug!(tab_id = %id, open_tabs = self.tabs.len(), "created tab");
        id
    }

    /// Close a tab. Unknown ids are ignored.
    ///
    /// If the closed tab was active, the tab now occupying the same
    /// index becomes active, falling back to the last tab. Closing the
    /// sole tab synthesizes exactly one fresh tab.
    pub fn close_tab(&mut self, id: Uuid) {
        let Some(index) = self.tabs.iter().position(|t| t.id == id) else {
            return;
        };
        self.tabs.remove(index);
        tracing::debug!(tab_id = %id, open_tabs = self.tabs.len(), "closed tab");

        if self.tabs.is_empty() {
            let tab = QueryTab::new();
            self.active_id = tab.id;
            self.tabs.push(tab);
            return;
        }

        if self.active_id == id {
            let neighbor = index.min(self.tabs.len() - 1);
            self.active_id = self.tabs[neighbor].id;
        }
    }

    /// Switch the active tab. Unknown ids are a no-op: the prior active
    /// tab is retained.
    pub fn set_active(&mut self, id: Uuid) {
        if self.contains(id) {
            self.active_id = id;
        }
    }

    /// Update a tab's query text. The tab is dirty whenever the text is
    /// non-empty. Unknown ids are ignored.
    pub fn update_query(&mut self, id: Uuid, text: impl Into<String>) {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) else {
            return;
        };
        let text = text.into();
        tab.dirty = !text.is_empty();
        tab.query_text = text;
    }

    /// Replace a tab's result. Attaching a result clears the dirty
    /// flag; passing `None` clears the result and leaves dirty alone.
    ///
    /// Returns whether the mutation was committed (the tab still
    /// exists).
    pub fn attach_result(&mut self, id: Uuid, result: Option<QueryResult>) -> bool {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if result.is_some() {
            tab.dirty = false;
        }
        tab.result = result;
        true
    }

    /// Atomically replace a tab's query text and result, clearing the
    /// dirty flag. Used by natural-language translation so no observer
    /// can see the generated SQL paired with a stale result.
    ///
    /// Returns whether the mutation was committed.
    pub fn apply_translation(&mut self, id: Uuid, sql: String, result: QueryResult) -> bool {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        tab.query_text = sql;
        tab.result = Some(result);
        tab.dirty = false;
        true
    }
}

impl Default for TabStore {
    fn default() -> Self {
        Self::new()
    }
}
