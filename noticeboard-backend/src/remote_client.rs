/// HTTP transport for a JSONBin-style remote document.
///
/// GET  {base}/b/{id}/latest   X-Master-Key, X-Bin-Meta: true
/// PUT  {base}/b/{id}          X-Master-Key, Content-Type: application/json
///
/// Any non-2xx status is a failure; the body text (or the status reason) is
/// kept for the log.
use async_trait::async_trait;
use noticeboard_core::config::RemoteConfig;
use noticeboard_core::remote::{
    FetchedDocument, RemoteError, RemoteStoreClient, RemoteTransport,
};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::sync::Arc;

const MASTER_KEY_HEADER: &str = "X-Master-Key";
const BIN_META_HEADER: &str = "X-Bin-Meta";
const VERSION_HEADER: &str = "X-Bin-Version-Updated";

pub struct JsonBinTransport {
    client: reqwest::Client,
    base_url: String,
    access_key: String,
    document_id: String,
}

impl JsonBinTransport {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_key: config.access_key.trim().to_string(),
            document_id: config.document_id.trim().to_string(),
        }
    }

    fn document_url(&self) -> String {
        format!("{}/b/{}", self.base_url, self.document_id)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let message = if text.trim().is_empty() {
        status.canonical_reason().unwrap_or("").to_string()
    } else {
        text
    };
    Err(RemoteError::Status {
        status: status.as_u16(),
        message,
    })
}

fn network(e: reqwest::Error) -> RemoteError {
    RemoteError::Network(e.to_string())
}

#[async_trait]
impl RemoteTransport for JsonBinTransport {
    async fn get_latest(&self) -> Result<FetchedDocument, RemoteError> {
        let resp = self
            .client
            .get(format!("{}/latest", self.document_url()))
            .header(MASTER_KEY_HEADER, &self.access_key)
            .header(BIN_META_HEADER, "true")
            .send()
            .await
            .map_err(network)?;
        let resp = check_status(resp).await?;

        let version_header = resp
            .headers()
            .get(VERSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body: Value = resp
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;

        Ok(FetchedDocument {
            body,
            version_header,
        })
    }

    async fn put(&self, body: String) -> Result<Value, RemoteError> {
        let resp = self
            .client
            .put(self.document_url())
            .header(MASTER_KEY_HEADER, &self.access_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(network)?;
        let resp = check_status(resp).await?;
        resp.json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }
}

/// Remote client for an active config, `None` when sync is not configured.
pub fn build_remote(config: &RemoteConfig, max_payload_bytes: usize) -> Option<RemoteStoreClient> {
    if !config.is_active() {
        log::info!("[noticeboard.remote] Remote store not configured, running local-only");
        return None;
    }
    log::info!(
        "[noticeboard.remote] Syncing with document {} at {}",
        config.document_id,
        config.base_url
    );
    let transport: Arc<dyn RemoteTransport> = Arc::new(JsonBinTransport::new(config));
    Some(RemoteStoreClient::new(transport, max_payload_bytes))
}
