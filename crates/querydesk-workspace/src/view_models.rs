//! Read-only projections of workspace state
//!
//! A snapshot is assembled on demand for rendering; it borrows nothing
//! and holds no locks, so a renderer can keep it across frames.

use querydesk_core::DataSource;
use querydesk_settings::{LayoutMode, LayoutPreferences, SafeSizes};
use uuid::Uuid;

use crate::filter::FilteredSchema;
use crate::tabs::QueryTab;

/// Everything a renderer needs for one frame of the workspace
#[derive(Debug, Clone)]
pub struct WorkspaceSnapshot {
    /// Open tabs in display order
    pub tabs: Vec<QueryTab>,
    /// Id of the active tab
    pub active_tab_id: Uuid,
    /// Persisted split ratios and panel state
    pub layout: LayoutPreferences,
    /// Responsive mode for the given viewport width
    pub layout_mode: LayoutMode,
    /// Horizontal split sizes, already clamped to pane minimums
    pub split: SafeSizes,
    /// Schema browser tree after filtering
    pub schema_tree: FilteredSchema,
    /// Currently selected data source, if any
    pub data_source: Option<DataSource>,
}

impl WorkspaceSnapshot {
    /// The active tab within the snapshot
    pub fn active_tab(&self) -> Option<&QueryTab> {
        self.tabs.iter().find(|t| t.id == self.active_tab_id)
    }
}
