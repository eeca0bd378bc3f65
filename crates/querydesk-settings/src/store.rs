//! Durable preference store
//!
//! A process-wide key-value blob store that survives restarts. The
//! file-backed implementation keeps everything in one JSON object so a
//! corrupt entry can never take the rest of the file down with it.

use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;

use querydesk_core::{Result, WorkspaceError};

/// Durable key-value store for preference blobs
pub trait PreferenceStore: Send + Sync {
    /// Read the blob stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous blob
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// File-backed preference store
///
/// Reads and writes a single JSON object of string entries. Unreadable
/// or malformed files surface as `Persistence` errors; callers are
/// expected to log and fall back to defaults.
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    /// Create a store backed by the given file
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a store backed by the default preferences file
    pub fn default_location() -> Result<Self> {
        let path = crate::preferences_file()
            .map_err(|e| WorkspaceError::Persistence(e.to_string()))?;
        Ok(Self::new(path))
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            WorkspaceError::Persistence(format!("failed to read {:?}: {}", self.path, e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            WorkspaceError::Persistence(format!("malformed preference file {:?}: {}", self.path, e))
        })
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WorkspaceError::Persistence(format!("failed to create {:?}: {}", parent, e))
            })?;
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| WorkspaceError::Persistence(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| {
            WorkspaceError::Persistence(format!("failed to write {:?}: {}", self.path, e))
        })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.read_entries()?;
        Ok(entries
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.write_entries(&entries)?;
        tracing::debug!(key = %key, path = ?self.path, "saved preference");
        Ok(())
    }
}

/// In-memory preference store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryPreferenceStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
