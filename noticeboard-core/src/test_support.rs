//! Shared fixtures for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::remote::{FetchedDocument, RemoteDocument, RemoteError, RemoteTransport};
use crate::types::{Attachment, Category, Notice, NoticeDraft, Priority, DEFAULT_AUTHOR};

pub fn notice(id: &str) -> Notice {
    Notice {
        id: id.to_string(),
        title: format!("Notice {}", id),
        content: "<p>Body</p>".to_string(),
        category: Category::Academic,
        priority: Priority::Normal,
        date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        deadline: None,
        author: DEFAULT_AUTHOR.to_string(),
        tags: Vec::new(),
        attachments: None,
        has_attachments: None,
        attachment_count: None,
        display_order: None,
        timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        last_modified: None,
    }
}

pub fn attachment(name: &str) -> Attachment {
    Attachment {
        id: format!("att-{}", name),
        name: name.to_string(),
        mime_type: "image/png".to_string(),
        size: 3,
        data: "data:image/png;base64,AAAA".to_string(),
    }
}

pub fn draft(title: &str) -> NoticeDraft {
    NoticeDraft {
        title: title.to_string(),
        content: "<p>Details</p>".to_string(),
        category: Some(Category::Academic),
        date: NaiveDate::from_ymd_opt(2026, 3, 1),
        ..NoticeDraft::default()
    }
}

#[derive(Default)]
struct FakeState {
    record: Option<Value>,
    version: u64,
    failing: bool,
    puts: Vec<String>,
    gets: usize,
}

/// In-memory remote store with a version counter ("v1", "v2", ...).
#[derive(Default)]
pub struct FakeTransport {
    state: Mutex<FakeState>,
    write_gate: tokio::sync::Mutex<()>,
    put_started: Notify,
    read_gate: tokio::sync::Mutex<()>,
    get_started: Notify,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    /// Write a document as another client would.
    pub fn publish(&self, notices: &[Notice], stripped: bool) {
        let doc = RemoteDocument {
            notices: notices.to_vec(),
            last_updated: None,
            attachments_stripped: stripped,
        };
        let mut state = self.state.lock().unwrap();
        state.version += 1;
        state.record = Some(serde_json::to_value(doc).unwrap());
    }

    pub fn remote_notices(&self) -> Vec<Notice> {
        let state = self.state.lock().unwrap();
        state
            .record
            .as_ref()
            .map(|r| serde_json::from_value::<RemoteDocument>(r.clone()).unwrap().notices)
            .unwrap_or_default()
    }

    pub fn last_put(&self) -> Option<String> {
        self.state.lock().unwrap().puts.last().cloned()
    }

    pub fn put_count(&self) -> usize {
        self.state.lock().unwrap().puts.len()
    }

    pub fn get_count(&self) -> usize {
        self.state.lock().unwrap().gets
    }

    /// Block writes until the guard is dropped.
    pub async fn hold_writes(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.write_gate.lock().await
    }

    /// Resolves once a write has started.
    pub async fn wait_for_put(&self) {
        self.put_started.notified().await;
    }

    /// Hold read responses until the guard is dropped. A read that hits the
    /// gate has already captured the document it will return.
    pub async fn hold_reads(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.read_gate.lock().await
    }

    /// Resolves once a read is waiting at the gate.
    pub async fn wait_for_get(&self) {
        self.get_started.notified().await;
    }
}

#[async_trait]
impl RemoteTransport for FakeTransport {
    async fn get_latest(&self) -> Result<FetchedDocument, RemoteError> {
        let fetched = {
            let mut state = self.state.lock().unwrap();
            state.gets += 1;
            if state.failing {
                return Err(RemoteError::Network("connection refused".into()));
            }
            let record = state.record.clone().unwrap_or_else(|| json!({}));
            FetchedDocument {
                body: json!({
                    "record": record,
                    "metadata": { "version_updated": format!("v{}", state.version) }
                }),
                version_header: None,
            }
        };

        // Only park when a test holds the gate
        if self.read_gate.try_lock().is_err() {
            self.get_started.notify_one();
            let _gate = self.read_gate.lock().await;
        }
        Ok(fetched)
    }

    async fn put(&self, body: String) -> Result<Value, RemoteError> {
        self.put_started.notify_one();
        let _gate = self.write_gate.lock().await;

        let mut state = self.state.lock().unwrap();
        if state.failing {
            return Err(RemoteError::Status {
                status: 503,
                message: "Service Unavailable".into(),
            });
        }
        let record: Value = serde_json::from_str(&body)?;
        state.version += 1;
        state.record = Some(record);
        state.puts.push(body);
        Ok(json!({
            "record": {},
            "metadata": { "version_updated": format!("v{}", state.version) }
        }))
    }
}
