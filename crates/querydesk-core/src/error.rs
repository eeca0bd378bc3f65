//! Error types for the query workspace

use thiserror::Error;
use uuid::Uuid;

/// Core error type for workspace operations
///
/// None of these variants is fatal to the process. Each one maps to a
/// dismissible notification in the UI shell, except `StaleTab` which
/// callers drop without surfacing.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Rejected before any external call; no state was mutated.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The execution collaborator rejected a request. The issuing tab's
    /// result has been cleared; other tabs are unaffected.
    #[error("Execution error: {0}")]
    Execution(String),

    /// The natural-language translator rejected a request. The target
    /// tab was left completely unchanged.
    #[error("Translation error: {0}")]
    Translation(String),

    /// Preference store read/write failed. Callers log and fall back to
    /// defaults.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A response arrived for a tab that no longer exists.
    #[error("Tab {0} no longer exists")]
    StaleTab(Uuid),

    /// A bounded collaborator wait expired.
    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WorkspaceError {
    /// Whether this error should be dropped without notifying the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, WorkspaceError::StaleTab(_))
    }
}

/// Result type alias for workspace operations
pub type Result<T> = std::result::Result<T, WorkspaceError>;
