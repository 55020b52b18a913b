/// Configuration types shared by the core and the backend host.
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const DEFAULT_REMOTE_BASE_URL: &str = "https://api.jsonbin.io/v3";
pub const PLACEHOLDER_ACCESS_KEY: &str = "YOUR_API_KEY";
pub const PLACEHOLDER_DOCUMENT_ID: &str = "YOUR_BIN_ID";

/// Serialized-size ceiling of one remote document, in bytes.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 500_000;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Where the shared remote document lives and how to authenticate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub document_id: String,
}

impl RemoteConfig {
    /// Remote sync is active only when both credentials hold real values.
    /// Empty strings and the template placeholders count as unset.
    pub fn is_active(&self) -> bool {
        let key = self.access_key.trim();
        let doc = self.document_id.trim();
        !key.is_empty()
            && !doc.is_empty()
            && key != PLACEHOLDER_ACCESS_KEY
            && doc != PLACEHOLDER_DOCUMENT_ID
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_key: PLACEHOLDER_ACCESS_KEY.to_string(),
            document_id: PLACEHOLDER_DOCUMENT_ID.to_string(),
        }
    }
}

/// Behavior switches for a notice board instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardOptions {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_max_payload")]
    pub max_payload_bytes: usize,
    /// With attachments disabled, drafts lose their files and the
    /// strip/merge path never runs.
    #[serde(default = "default_true")]
    pub attachments_enabled: bool,
    /// SHA-256 hex digest of the admin code. `None` disables admin login.
    #[serde(default)]
    pub admin_code_sha256: Option<String>,
}

impl BoardOptions {
    /// Store only the digest of a plaintext admin code.
    pub fn with_admin_code(mut self, code: &str) -> Self {
        self.admin_code_sha256 = Some(digest_admin_code(code));
        self
    }
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            max_payload_bytes: default_max_payload(),
            attachments_enabled: true,
            admin_code_sha256: None,
        }
    }
}

/// SHA-256 hex digest used to compare admin codes.
pub fn digest_admin_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

fn default_base_url() -> String {
    DEFAULT_REMOTE_BASE_URL.to_string()
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_max_payload() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

fn default_true() -> bool {
    true
}
