//! Workspace composition root
//!
//! `QueryWorkspace` wires the tab store, execution coordinator, layout
//! state, and schema browsing together behind one handle. Interior
//! mutability is per-concern (`parking_lot` locks around small state),
//! and no lock is ever held across an await point.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use querydesk_core::{
    DataSource, DataSourceCatalog, NaturalLanguageTranslator, QueryExecutor, QueryResult, Result,
    SchemaMetadata, SchemaProvider, Translation, WorkspaceError,
};
use querydesk_settings::{
    load_layout_preferences, save_layout_preferences, LayoutConfig, LayoutPreferences,
    PreferenceStore, SafeSizes,
};

use crate::coordinator::QueryExecutionCoordinator;
use crate::filter::{filter_schema, FilteredSchema};
use crate::history::ExecutionHistory;
use crate::tabs::TabStore;
use crate::view_models::WorkspaceSnapshot;

/// Upper bound on a single schema fetch
pub const SCHEMA_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// The interactive query workspace
pub struct QueryWorkspace {
    tabs: Arc<RwLock<TabStore>>,
    coordinator: QueryExecutionCoordinator,
    catalog: Arc<dyn DataSourceCatalog>,
    schema_provider: Arc<dyn SchemaProvider>,
    preferences: Arc<dyn PreferenceStore>,
    layout_config: LayoutConfig,
    selected: RwLock<Option<DataSource>>,
    schema: RwLock<Option<SchemaMetadata>>,
    filter_text: RwLock<String>,
    layout: RwLock<LayoutPreferences>,
}

impl QueryWorkspace {
    /// Assemble a workspace over its collaborators
    ///
    /// Layout preferences are reloaded from the store immediately;
    /// anything unreadable degrades to defaults.
    pub fn new(
        catalog: Arc<dyn DataSourceCatalog>,
        schema_provider: Arc<dyn SchemaProvider>,
        executor: Arc<dyn QueryExecutor>,
        translator: Arc<dyn NaturalLanguageTranslator>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        let tabs = Arc::new(RwLock::new(TabStore::new()));
        let coordinator = QueryExecutionCoordinator::new(tabs.clone(), executor, translator);
        let layout = load_layout_preferences(preferences.as_ref());
        tracing::info!(
            horizontal_split = layout.horizontal_split_percent,
            vertical_split = layout.vertical_split_percent,
            "workspace initialized"
        );

        Self {
            tabs,
            coordinator,
            catalog,
            schema_provider,
            preferences,
            layout_config: LayoutConfig::default(),
            selected: RwLock::new(None),
            schema: RwLock::new(None),
            filter_text: RwLock::new(String::new()),
            layout: RwLock::new(layout),
        }
    }

    // --- Tabs ---

    /// Open a fresh tab and make it active
    pub fn create_tab(&self) -> Uuid {
        self.tabs.write().create_tab()
    }

    /// Close a tab; unknown ids are ignored
    pub fn close_tab(&self, id: Uuid) {
        self.tabs.write().close_tab(id);
    }

    /// Switch the active tab; unknown ids are a no-op
    pub fn set_active_tab(&self, id: Uuid) {
        self.tabs.write().set_active(id);
    }

    /// Id of the active tab
    pub fn active_tab_id(&self) -> Uuid {
        self.tabs.read().active_tab_id()
    }

    /// Replace a tab's query text; unknown ids are ignored
    pub fn update_query(&self, id: Uuid, text: impl Into<String>) {
        self.tabs.write().update_query(id, text);
    }

    /// Whether a tab has an execution in flight
    pub fn is_executing(&self, tab_id: Uuid) -> bool {
        self.coordinator.is_executing(tab_id)
    }

    // --- Data sources and schema ---

    /// Available data sources
    pub fn data_sources(&self) -> Vec<DataSource> {
        self.catalog.list()
    }

    /// Select a data source by id
    ///
    /// The previous schema snapshot is discarded wholesale so the
    /// browser never mixes objects from two sources; call
    /// [`load_schema`](Self::load_schema) to populate the new one.
    pub fn select_data_source(&self, id: Uuid) -> Result<()> {
        let source = self.catalog.get(id).ok_or_else(|| {
            WorkspaceError::Validation(format!("unknown data source {}", id))
        })?;
        tracing::info!(source = %source.name, database = %source.database, "selected data source");
        *self.selected.write() = Some(source);
        *self.schema.write() = None;
        Ok(())
    }

    /// The currently selected data source
    pub fn selected_data_source(&self) -> Option<DataSource> {
        self.selected.read().clone()
    }

    /// Fetch schema metadata for the selected source
    ///
    /// Bounded by [`SCHEMA_FETCH_TIMEOUT`]; a fetch that overruns it
    /// surfaces as a `Timeout` error and leaves any previous snapshot
    /// in place.
    #[tracing::instrument(skip(self))]
    pub async fn load_schema(&self) -> Result<()> {
        let source = self.selected.read().clone().ok_or_else(|| {
            WorkspaceError::Validation("no data source selected".to_string())
        })?;

        let fetched =
            tokio::time::timeout(SCHEMA_FETCH_TIMEOUT, self.schema_provider.fetch(&source.database))
                .await
                .map_err(|_| {
                    WorkspaceError::Timeout(format!(
                        "schema fetch for '{}' exceeded {:?}",
                        source.database, SCHEMA_FETCH_TIMEOUT
                    ))
                })??;

        tracing::info!(
            database = %source.database,
            tables = fetched.tables.len(),
            views = fetched.views.len(),
            "schema loaded"
        );
        *self.schema.write() = Some(fetched);
        Ok(())
    }

    /// Re-fetch schema metadata, bypassing any provider-side cache
    #[tracing::instrument(skip(self))]
    pub async fn refresh_schema(&self) -> Result<()> {
        let source = self.selected.read().clone().ok_or_else(|| {
            WorkspaceError::Validation("no data source selected".to_string())
        })?;

        let fetched = tokio::time::timeout(
            SCHEMA_FETCH_TIMEOUT,
            self.schema_provider.refresh(&source.database),
        )
        .await
        .map_err(|_| {
            WorkspaceError::Timeout(format!(
                "schema refresh for '{}' exceeded {:?}",
                source.database, SCHEMA_FETCH_TIMEOUT
            ))
        })??;

        *self.schema.write() = Some(fetched);
        Ok(())
    }

    /// Update the schema browser filter text
    pub fn set_schema_filter(&self, text: impl Into<String>) {
        *self.filter_text.write() = text.into();
    }

    // --- Execution ---

    /// Execute the SQL of a specific tab against the selected source
    pub async fn execute_sql(&self, tab_id: Uuid) -> Result<QueryResult> {
        let source = self.selected.read().clone();
        self.coordinator.execute_sql(source, tab_id).await
    }

    /// Translate a prompt and run the generated SQL in the active tab
    pub async fn execute_natural_language(&self, prompt: &str) -> Result<Translation> {
        let source = self.selected.read().clone();
        self.coordinator.execute_natural_language(source, prompt).await
    }

    /// Shared execution history
    pub fn history(&self) -> Arc<RwLock<ExecutionHistory>> {
        self.coordinator.history()
    }

    // --- Layout ---

    /// Apply a horizontal split drag and persist the outcome
    ///
    /// The requested percentage is clamped so both panes keep their
    /// minimum widths; the clamped value is what gets stored. Store
    /// failures are logged and ignored.
    pub fn resize_horizontal(&self, requested_left_percent: f64, viewport_width: f64) -> SafeSizes {
        let sizes = self
            .layout_config
            .compute_safe_sizes(requested_left_percent, viewport_width);
        let prefs = {
            let mut layout = self.layout.write();
            layout.horizontal_split_percent = sizes.left_percent;
            *layout
        };
        save_layout_preferences(self.preferences.as_ref(), &prefs);
        sizes
    }

    /// Apply a vertical editor/results split drag and persist it
    pub fn resize_vertical(&self, requested_percent: f64) {
        let clamped = if requested_percent.is_finite() {
            requested_percent.clamp(0.0, 100.0)
        } else {
            LayoutPreferences::default().vertical_split_percent
        };
        let prefs = {
            let mut layout = self.layout.write();
            layout.vertical_split_percent = clamped;
            *layout
        };
        save_layout_preferences(self.preferences.as_ref(), &prefs);
    }

    /// Collapse or expand the schema metadata panel, persisting it
    pub fn toggle_metadata_panel(&self) -> bool {
        let prefs = {
            let mut layout = self.layout.write();
            layout.metadata_panel_collapsed = !layout.metadata_panel_collapsed;
            *layout
        };
        save_layout_preferences(self.preferences.as_ref(), &prefs);
        prefs.metadata_panel_collapsed
    }

    /// Current layout preferences
    pub fn layout(&self) -> LayoutPreferences {
        *self.layout.read()
    }

    // --- Rendering ---

    /// Assemble a read-only snapshot for a given viewport width
    ///
    /// The schema tree is recomputed from the stored snapshot and
    /// filter text on every call; with no schema loaded it is the
    /// no-matches terminal.
    pub fn snapshot(&self, viewport_width: f64) -> WorkspaceSnapshot {
        let layout = *self.layout.read();
        let schema_tree = match self.schema.read().as_ref() {
            Some(metadata) => filter_schema(metadata, &self.filter_text.read()),
            None => FilteredSchema::NoMatches,
        };
        let tabs = self.tabs.read();

        WorkspaceSnapshot {
            tabs: tabs.tabs().to_vec(),
            active_tab_id: tabs.active_tab_id(),
            layout,
            layout_mode: self.layout_config.determine_layout_mode(viewport_width),
            split: self
                .layout_config
                .compute_safe_sizes(layout.horizontal_split_percent, viewport_width),
            schema_tree,
            data_source: self.selected.read().clone(),
        }
    }
}
