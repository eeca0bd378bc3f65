//! Query execution coordination
//!
//! Orchestrates SQL execution and natural-language translation against
//! the external collaborators and commits outcomes into the shared
//! `TabStore`. Every operation targets a tab id captured at call time,
//! never "whichever tab is currently active", so switching tabs while a
//! request is in flight can never misattribute a result.
//!
//! There is no explicit cancellation: when a tab is closed mid-flight,
//! the completion handler finds it gone and drops the late result. The
//! per-tab lifecycle is `Idle -> Executing -> (Succeeded | Failed) ->
//! Idle`; the transient outcome is the returned `Result`, not a
//! persisted tab field.

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use querydesk_core::{
    DataSource, NaturalLanguageTranslator, QueryExecutor, QueryResult, Result, Translation,
    WorkspaceError,
};

use crate::history::{ExecutionHistory, ExecutionRecord};
use crate::tabs::TabStore;

/// Coordinates asynchronous executions over the shared tab collection
pub struct QueryExecutionCoordinator {
    tabs: Arc<RwLock<TabStore>>,
    executor: Arc<dyn QueryExecutor>,
    translator: Arc<dyn NaturalLanguageTranslator>,
    history: Arc<RwLock<ExecutionHistory>>,
    executing: RwLock<HashSet<Uuid>>,
}

impl QueryExecutionCoordinator {
    /// Create a coordinator over a shared tab store
    pub fn new(
        tabs: Arc<RwLock<TabStore>>,
        executor: Arc<dyn QueryExecutor>,
        translator: Arc<dyn NaturalLanguageTranslator>,
    ) -> Self {
        Self {
            tabs,
            executor,
            translator,
            history: Arc::new(RwLock::new(ExecutionHistory::default())),
            executing: RwLock::new(HashSet::new()),
        }
    }

    /// Create a coordinator sharing an existing history instance
    pub fn with_shared_history(
        tabs: Arc<RwLock<TabStore>>,
        executor: Arc<dyn QueryExecutor>,
        translator: Arc<dyn NaturalLanguageTranslator>,
        history: Arc<RwLock<ExecutionHistory>>,
    ) -> Self {
        Self {
            tabs,
            executor,
            translator,
            history,
            executing: RwLock::new(HashSet::new()),
        }
    }

    /// Whether a tab currently has an execution in flight
    pub fn is_executing(&self, tab_id: Uuid) -> bool {
        self.executing.read().contains(&tab_id)
    }

    /// Get a reference to the execution history
    pub fn history(&self) -> Arc<RwLock<ExecutionHistory>> {
        self.history.clone()
    }

    /// Execute the SQL of a specific tab
    ///
    /// Requires a selected, active data source and non-blank query
    /// text; both are validated before any external call, with no state
    /// mutated on rejection. On success the result is attached to the
    /// same tab id and its dirty flag cleared. On failure that tab's
    /// previous result is cleared (a failing re-execution must not
    /// leave a stale success visible) and the error is surfaced without
    /// touching other tabs.
    #[tracing::instrument(skip(self, source), fields(tab_id = %tab_id))]
    pub async fn execute_sql(
        &self,
        source: Option<DataSource>,
        tab_id: Uuid,
    ) -> Result<QueryResult> {
        let source = validate_source(source)?;

        // Capture the query text at call time; later edits to the tab
        // do not affect this execution.
        let sql = {
            let tabs = self.tabs.read();
            match tabs.get(tab_id) {
                Some(tab) => tab.query_text.clone(),
                None => return Err(WorkspaceError::StaleTab(tab_id)),
            }
        };
        if sql.trim().is_empty() {
            return Err(WorkspaceError::Validation(
                "query text is empty".to_string(),
            ));
        }

        tracing::debug!(database = %source.database, "executing query");
        self.executing.write().insert(tab_id);
        let start = Instant::now();
        let outcome = self.executor.execute(&source.database, &sql).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        self.executing.write().remove(&tab_id);

        match outcome {
            Ok(result) => {
                let row_count = result.rows.len() as u64;
                let committed = self
                    .tabs
                    .write()
                    .attach_result(tab_id, Some(result.clone()));

                self.history.write().record(ExecutionRecord::success(
                    sql,
                    Some(source.id),
                    tab_id,
                    duration_ms,
                    row_count,
                ));

                if !committed {
                    // The tab was closed while the call was in flight.
                    tracing::debug!(duration_ms, "dropping result for closed tab");
                    return Err(WorkspaceError::StaleTab(tab_id));
                }

                tracing::info!(rows = row_count, duration_ms, "query execution completed");
                Ok(result)
            }
            Err(e) => {
                let message = e.to_string();
                // Clear any previously attached result so a failing
                // re-execution never leaves a stale success visible.
                self.tabs.write().attach_result(tab_id, None);
                self.history.write().record(ExecutionRecord::failure(
                    sql,
                    Some(source.id),
                    tab_id,
                    duration_ms,
                    message.clone(),
                ));
                tracing::error!(error = %message, duration_ms, "query execution failed");
                Err(match e {
                    WorkspaceError::Execution(_) => e,
                    _ => WorkspaceError::Execution(message),
                })
            }
        }
    }

    /// Translate a natural-language prompt and run the generated SQL
    ///
    /// Targets the tab that is active when the call is issued. On
    /// success the tab's query text and result are replaced in a single
    /// mutation, so no observer ever sees the generated SQL paired with
    /// a stale or empty result. On failure the tab is left completely
    /// unchanged.
    #[tracing::instrument(skip(self, source, prompt))]
    pub async fn execute_natural_language(
        &self,
        source: Option<DataSource>,
        prompt: &str,
    ) -> Result<Translation> {
        let source = validate_source(source)?;
        if prompt.trim().is_empty() {
            return Err(WorkspaceError::Validation("prompt is empty".to_string()));
        }

        // Capture the target before suspending; the user may switch
        // tabs while the translator is working.
        let tab_id = self.tabs.read().active_tab_id();

        tracing::debug!(database = %source.database, tab_id = %tab_id, "translating prompt");
        self.executing.write().insert(tab_id);
        let start = Instant::now();
        let outcome = self.translator.translate(&source.database, prompt).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        self.executing.write().remove(&tab_id);

        match outcome {
            Ok(translation) => {
                let row_count = translation.result.rows.len() as u64;
                let committed = self.tabs.write().apply_translation(
                    tab_id,
                    translation.generated_sql.clone(),
                    translation.result.clone(),
                );

                self.history.write().record(ExecutionRecord::success(
                    translation.generated_sql.clone(),
                    Some(source.id),
                    tab_id,
                    duration_ms,
                    row_count,
                ));

                if !committed {
                    tracing::debug!(duration_ms, "dropping translation for closed tab");
                    return Err(WorkspaceError::StaleTab(tab_id));
                }

                tracing::info!(rows = row_count, duration_ms, "translation applied");
                Ok(translation)
            }
            Err(e) => {
                let message = e.to_string();
                self.history.write().record(ExecutionRecord::failure(
                    prompt.to_string(),
                    Some(source.id),
                    tab_id,
                    duration_ms,
                    message.clone(),
                ));
                tracing::error!(error = %message, duration_ms, "translation failed");
                Err(match e {
                    WorkspaceError::Translation(_) => e,
                    _ => WorkspaceError::Translation(message),
                })
            }
        }
    }
}

fn validate_source(source: Option<DataSource>) -> Result<DataSource> {
    let source = source.ok_or_else(|| {
        WorkspaceError::Validation("no data source selected".to_string())
    })?;
    if !source.active {
        return Err(WorkspaceError::Validation(format!(
            "data source '{}' is not active",
            source.name
        )));
    }
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use querydesk_core::{ColumnMeta, Row, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn sample_result() -> QueryResult {
        QueryResult {
            columns: vec![ColumnMeta {
                name: "id".into(),
                data_type: "integer".into(),
                ..Default::default()
            }],
            rows: vec![Row::new(vec![Value::Integer(1)])],
            row_count: 1,
            execution_time_ms: 3,
            ..QueryResult::empty()
        }
    }

    fn active_source() -> DataSource {
        DataSource {
            id: Uuid::new_v4(),
            name: "local".into(),
            database: "shop".into(),
            active: true,
        }
    }

    struct CountingExecutor {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingExecutor {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QueryExecutor for CountingExecutor {
        async fn execute(&self, _database: &str, _sql: &str) -> Result<QueryResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(WorkspaceError::Execution("syntax error".into()))
            } else {
                Ok(sample_result())
            }
        }
    }

    struct GatedExecutor {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl QueryExecutor for GatedExecutor {
        async fn execute(&self, _database: &str, _sql: &str) -> Result<QueryResult> {
            self.gate.notified().await;
            Ok(sample_result())
        }
    }

    struct StubTranslator {
        fail: bool,
    }

    #[async_trait]
    impl NaturalLanguageTranslator for StubTranslator {
        async fn translate(&self, _database: &str, _prompt: &str) -> Result<Translation> {
            if self.fail {
                Err(WorkspaceError::Translation("model unavailable".into()))
            } else {
                Ok(Translation {
                    generated_sql: "SELECT * FROM users".into(),
                    result: sample_result(),
                })
            }
        }
    }

    fn coordinator_with(
        executor: Arc<dyn QueryExecutor>,
        translator: Arc<dyn NaturalLanguageTranslator>,
    ) -> (Arc<QueryExecutionCoordinator>, Arc<RwLock<TabStore>>) {
        let tabs = Arc::new(RwLock::new(TabStore::new()));
        let coordinator = Arc::new(QueryExecutionCoordinator::new(
            tabs.clone(),
            executor,
            translator,
        ));
        (coordinator, tabs)
    }

    #[tokio::test]
    async fn test_execute_sql_requires_data_source() {
        let executor = Arc::new(CountingExecutor::ok());
        let (coordinator, tabs) =
            coordinator_with(executor.clone(), Arc::new(StubTranslator { fail: false }));
        let tab_id = tabs.read().active_tab_id();
        tabs.write().update_query(tab_id, "SELECT 1");

        let err = coordinator.execute_sql(None, tab_id).await.unwrap_err();
        assert!(matches!(err, WorkspaceError::Validation(_)));
        assert_eq!(executor.calls(), 0);
        assert!(tabs.read().get(tab_id).unwrap().result.is_none());
    }

    #[tokio::test]
    async fn test_execute_sql_rejects_blank_query_before_calling_out() {
        let executor = Arc::new(CountingExecutor::ok());
        let (coordinator, tabs) =
            coordinator_with(executor.clone(), Arc::new(StubTranslator { fail: false }));
        let tab_id = tabs.read().active_tab_id();
        tabs.write().update_query(tab_id, "   \n\t  ");

        let err = coordinator
            .execute_sql(Some(active_source()), tab_id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::Validation(_)));
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn test_execute_sql_rejects_inactive_source() {
        let executor = Arc::new(CountingExecutor::ok());
        let (coordinator, tabs) =
            coordinator_with(executor.clone(), Arc::new(StubTranslator { fail: false }));
        let tab_id = tabs.read().active_tab_id();
        tabs.write().update_query(tab_id, "SELECT 1");

        let mut source = active_source();
        source.active = false;
        let err = coordinator
            .execute_sql(Some(source), tab_id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::Validation(_)));
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn test_execute_sql_attaches_result_and_clears_dirty() {
        let (coordinator, tabs) = coordinator_with(
            Arc::new(CountingExecutor::ok()),
            Arc::new(StubTranslator { fail: false }),
        );
        let tab_id = tabs.read().active_tab_id();
        tabs.write().update_query(tab_id, "SELECT 1");

        let result = coordinator
            .execute_sql(Some(active_source()), tab_id)
            .await
            .unwrap();
        assert_eq!(result.rows.len(), 1);

        let tabs = tabs.read();
        let tab = tabs.get(tab_id).unwrap();
        assert!(tab.result.is_some());
        assert!(!tab.dirty);
        assert_eq!(coordinator.history().read().len(), 1);
        assert!(coordinator.history().read().records().next().unwrap().succeeded());
    }

    #[tokio::test]
    async fn test_failed_execution_clears_previous_result_only_on_issuing_tab() {
        let (coordinator, tabs) = coordinator_with(
            Arc::new(CountingExecutor::failing()),
            Arc::new(StubTranslator { fail: false }),
        );
        let t1 = tabs.read().active_tab_id();
        let t2 = tabs.write().create_tab();
        tabs.write().update_query(t1, "SELECT 1");
        tabs.write().update_query(t2, "SELECT 2");
        tabs.write().attach_result(t1, Some(sample_result()));
        tabs.write().attach_result(t2, Some(sample_result()));

        let err = coordinator
            .execute_sql(Some(active_source()), t1)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::Execution(_)));

        let tabs = tabs.read();
        assert!(tabs.get(t1).unwrap().result.is_none());
        assert!(tabs.get(t2).unwrap().result.is_some());
    }

    #[tokio::test]
    async fn test_result_commits_to_issuing_tab_despite_active_switch() {
        let gate = Arc::new(Notify::new());
        let (coordinator, tabs) = coordinator_with(
            Arc::new(GatedExecutor { gate: gate.clone() }),
            Arc::new(StubTranslator { fail: false }),
        );
        let t1 = tabs.read().active_tab_id();
        tabs.write().update_query(t1, "SELECT 1");

        let handle = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.execute_sql(Some(active_source()), t1).await }
        });
        tokio::task::yield_now().await;
        assert!(coordinator.is_executing(t1));

        // Switch the active tab while the call is in flight.
        let t2 = tabs.write().create_tab();
        gate.notify_one();
        handle.await.unwrap().unwrap();

        let tabs = tabs.read();
        assert!(tabs.get(t1).unwrap().result.is_some());
        assert!(tabs.get(t2).unwrap().result.is_none());
    }

    #[tokio::test]
    async fn test_late_result_for_closed_tab_is_dropped() {
        let gate = Arc::new(Notify::new());
        let (coordinator, tabs) = coordinator_with(
            Arc::new(GatedExecutor { gate: gate.clone() }),
            Arc::new(StubTranslator { fail: false }),
        );
        let t1 = tabs.read().active_tab_id();
        tabs.write().update_query(t1, "SELECT 1");

        let handle = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.execute_sql(Some(active_source()), t1).await }
        });
        tokio::task::yield_now().await;

        tabs.write().close_tab(t1);
        gate.notify_one();

        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, WorkspaceError::StaleTab(id) if id == t1));
        assert!(err.is_silent());

        // The synthesized replacement tab is untouched.
        let tabs = tabs.read();
        assert_eq!(tabs.len(), 1);
        assert!(tabs.active_tab().result.is_none());
    }

    #[tokio::test]
    async fn test_natural_language_replaces_text_and_result_atomically() {
        let (coordinator, tabs) = coordinator_with(
            Arc::new(CountingExecutor::ok()),
            Arc::new(StubTranslator { fail: false }),
        );
        let tab_id = tabs.read().active_tab_id();
        tabs.write().update_query(tab_id, "old draft");

        let translation = coordinator
            .execute_natural_language(Some(active_source()), "show me all users")
            .await
            .unwrap();
        assert_eq!(translation.generated_sql, "SELECT * FROM users");

        let tabs = tabs.read();
        let tab = tabs.get(tab_id).unwrap();
        assert_eq!(tab.query_text, "SELECT * FROM users");
        assert_eq!(
            tab.result.as_ref().map(|r| r.rows.len()),
            Some(translation.result.rows.len())
        );
        assert!(!tab.dirty);
    }

    #[tokio::test]
    async fn test_natural_language_failure_leaves_tab_unchanged() {
        let (coordinator, tabs) = coordinator_with(
            Arc::new(CountingExecutor::ok()),
            Arc::new(StubTranslator { fail: true }),
        );
        let tab_id = tabs.read().active_tab_id();
        tabs.write().update_query(tab_id, "old draft");
        let before = tabs.read().get(tab_id).unwrap().clone();

        let err = coordinator
            .execute_natural_language(Some(active_source()), "show me all users")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::Translation(_)));

        assert_eq!(tabs.read().get(tab_id).unwrap(), &before);
    }

    #[tokio::test]
    async fn test_natural_language_rejects_blank_prompt() {
        let (coordinator, _tabs) = coordinator_with(
            Arc::new(CountingExecutor::ok()),
            Arc::new(StubTranslator { fail: false }),
        );
        let err = coordinator
            .execute_natural_language(Some(active_source()), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::Validation(_)));
    }
}
