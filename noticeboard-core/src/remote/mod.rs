pub mod payload;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::types::Notice;
pub use payload::{RemoteDocument, RemoteSnapshot};

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Remote store returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Could not encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Raw result of a read: the JSON body plus the version header, if any.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub body: Value,
    pub version_header: Option<String>,
}

/// Moves documents to and from the remote store.
/// Implementations: `JsonBinTransport` (HTTP, backend crate).
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Read the latest document together with its metadata.
    async fn get_latest(&self) -> Result<FetchedDocument, RemoteError>;

    /// Replace the whole document; returns the response body.
    async fn put(&self, body: String) -> Result<Value, RemoteError>;
}

/// Result of a successful `replace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceReceipt {
    pub version_tag: String,
    pub attachments_stripped: bool,
}

/// Remote store client: owns the payload policy on top of a transport.
#[derive(Clone)]
pub struct RemoteStoreClient {
    transport: Arc<dyn RemoteTransport>,
    max_payload_bytes: usize,
}

impl RemoteStoreClient {
    pub fn new(transport: Arc<dyn RemoteTransport>, max_payload_bytes: usize) -> Self {
        Self {
            transport,
            max_payload_bytes,
        }
    }

    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_bytes
    }

    pub async fn fetch_latest(&self) -> Result<RemoteSnapshot, RemoteError> {
        let fetched = self.transport.get_latest().await?;
        let snapshot = payload::decode_latest(fetched.body, fetched.version_header)?;
        log::debug!(
            "[noticeboard.remote] Fetched {} notices (version {:?}, stripped={})",
            snapshot.notices.len(),
            snapshot.version_tag,
            snapshot.attachments_stripped
        );
        Ok(snapshot)
    }

    /// Overwrite the remote document with `notices`.
    pub async fn replace(&self, notices: &[Notice]) -> Result<ReplaceReceipt, RemoteError> {
        let encoded = payload::encode_for_upload(notices, self.max_payload_bytes, Utc::now())?;
        let size = encoded.len();
        let response = self.transport.put(encoded.body).await?;
        let version_tag = payload::decode_receipt(&response)?;
        log::info!(
            "[noticeboard.remote] Wrote {} notices ({} bytes, version {})",
            notices.len(),
            size,
            version_tag
        );
        Ok(ReplaceReceipt {
            version_tag,
            attachments_stripped: encoded.attachments_stripped,
        })
    }
}
