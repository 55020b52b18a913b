/// Configuration for the notice board sync daemon.
/// Reads config.json from ~/.config/noticeboard/config.json (or platform equivalent).
///
/// ```json
/// {
///   "remote": { "accessKey": "...", "documentId": "..." },
///   "board": { "pollIntervalSecs": 5, "adminCodeSha256": "..." },
///   "dataDir": "/var/lib/noticeboard"
/// }
/// ```
use noticeboard_core::config::{BoardOptions, RemoteConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "NOTICEBOARD_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeBoardConfig {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub board: BoardOptions,
    /// Local store directory; defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl NoticeBoardConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn config_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("noticeboard")
}

/// Default config path: ~/.config/noticeboard/config.json
pub fn default_config_path() -> PathBuf {
    config_root().join("config.json")
}

/// Config path from the environment, else the default.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Default local store: <data dir>/noticeboard
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(config_root)
        .join("noticeboard")
}

pub fn read_config(path: &Path) -> Result<NoticeBoardConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load config from path. Returns defaults if the file is missing or malformed.
pub fn load_config(path: &Path) -> NoticeBoardConfig {
    match read_config(path) {
        Ok(config) => config,
        Err(ConfigError::Io { .. }) => {
            log::info!("[noticeboard.config] No config at {}, using defaults", path.display());
            NoticeBoardConfig::default()
        }
        Err(e) => {
            log::warn!("[noticeboard.config] {}", e);
            NoticeBoardConfig::default()
        }
    }
}
