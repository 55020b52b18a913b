/// Local filesystem storage backend.
///
/// Keeps one directory per board:
/// - `notices.json`: the serialized notice array (full fidelity, attachments included)
/// - `preferences.json`: persistent UI preferences (theme)
///
/// Writes are atomic (write to .tmp, fsync, rename) and serialized by a mutex.
/// A SHA-256 fingerprint of the last written collection lets identical saves
/// skip the disk. Session values live in memory only.
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{NoticeStorage, StorageError};
use crate::types::Notice;

const NOTICES_FILE: &str = "notices.json";
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Preferences {
    #[serde(default)]
    dark_mode: bool,
}

pub struct LocalStorage {
    dir: PathBuf,
    /// Serializes writers of both files
    write_lock: Mutex<()>,
    /// Fingerprint of the notices document last written or read
    notices_hash: Mutex<Option<String>>,
    session: RwLock<HashMap<String, String>>,
}

impl LocalStorage {
    /// Open (creating if needed) a storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
            notices_hash: Mutex::new(None),
            session: RwLock::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn notices_path(&self) -> PathBuf {
        self.dir.join(NOTICES_FILE)
    }

    fn preferences_path(&self) -> PathBuf {
        self.dir.join(PREFERENCES_FILE)
    }

    /// SHA-256 of content with normalized line endings.
    fn content_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.replace("\r\n", "\n").as_bytes());
        hex::encode(hasher.finalize())
    }

    fn read_preferences(&self) -> Preferences {
        match fs::read_to_string(self.preferences_path()) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("[noticeboard.storage] Ignoring unreadable preferences: {}", e);
                Preferences::default()
            }),
            Err(_) => Preferences::default(),
        }
    }

    /// Atomic write with fsync: write to .tmp, fsync, rename, fsync directory.
    fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        let tmp_path = path.with_extension("noticeboard.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        // fsync directory for rename durability
        if let Some(dir) = path.parent() {
            if let Ok(d) = fs::File::open(dir) {
                let _ = d.sync_all();
            }
        }
        Ok(())
    }
}

impl NoticeStorage for LocalStorage {
    fn load_notices(&self) -> Result<Option<Vec<Notice>>, StorageError> {
        let content = match fs::read_to_string(self.notices_path()) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let notices: Vec<Notice> = serde_json::from_str(&content)?;
        *self.notices_hash.lock().unwrap() = Some(Self::content_hash(&content));
        Ok(Some(notices))
    }

    fn save_notices(&self, notices: &[Notice]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap();

        let content = serde_json::to_string(notices)?;
        let hash = Self::content_hash(&content);
        let path = self.notices_path();

        let mut last = self.notices_hash.lock().unwrap();
        if last.as_deref() == Some(hash.as_str()) && path.exists() {
            log::debug!("[noticeboard.storage] Collection unchanged, skipping write");
            return Ok(());
        }

        Self::atomic_write(&path, &content)?;
        *last = Some(hash);
        log::debug!(
            "[noticeboard.storage] Saved {} notices to {:?}",
            notices.len(),
            path
        );
        Ok(())
    }

    fn dark_mode(&self) -> bool {
        self.read_preferences().dark_mode
    }

    fn set_dark_mode(&self, enabled: bool) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap();
        let mut prefs = self.read_preferences();
        prefs.dark_mode = enabled;
        let content = serde_json::to_string_pretty(&prefs)?;
        Self::atomic_write(&self.preferences_path(), &content)?;
        Ok(())
    }

    fn session_value(&self, key: &str) -> Option<String> {
        self.session.read().unwrap().get(key).cloned()
    }

    fn set_session_value(&self, key: &str, value: Option<String>) {
        let mut session = self.session.write().unwrap();
        match value {
            Some(v) => {
                session.insert(key.to_string(), v);
            }
            None => {
                session.remove(key);
            }
        }
    }
}
