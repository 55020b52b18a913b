pub mod local;

use crate::types::Notice;

/// Abstract per-device storage for the notice collection and UI preferences.
/// Implementations: LocalStorage (filesystem).
pub trait NoticeStorage: Send + Sync {
    /// Read the persisted collection. `Ok(None)` when nothing was ever saved.
    fn load_notices(&self) -> Result<Option<Vec<Notice>>, StorageError>;

    /// Replace the persisted collection.
    fn save_notices(&self, notices: &[Notice]) -> Result<(), StorageError>;

    /// Persistent theme preference.
    fn dark_mode(&self) -> bool;

    fn set_dark_mode(&self, enabled: bool) -> Result<(), StorageError>;

    /// Session-scoped value; gone when the process ends.
    fn session_value(&self, key: &str) -> Option<String>;

    /// Set or clear (`None`) a session-scoped value.
    fn set_session_value(&self, key: &str, value: Option<String>);
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
