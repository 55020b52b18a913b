/// Wire format of the shared remote document.
///
/// Upload: `{ notices, lastUpdated, attachmentsStripped? }`. When the full
/// document would exceed the size ceiling, every notice is re-encoded with
/// its attachments replaced by `hasAttachments`/`attachmentCount` markers and
/// the document is flagged `attachmentsStripped: true`.
///
/// Download: the store wraps the document as `{ record, metadata }`; a bare
/// document is accepted too. The version tag comes from
/// `metadata.version_updated`, then the version header.
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RemoteError;
use crate::tags::normalize_tags;
use crate::types::Notice;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    #[serde(default)]
    pub notices: Vec<Notice>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub attachments_stripped: bool,
}

/// A serialized document ready for upload.
#[derive(Debug, Clone)]
pub struct EncodedPayload {
    pub body: String,
    pub attachments_stripped: bool,
}

impl EncodedPayload {
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// The decoded result of a read.
#[derive(Debug, Clone)]
pub struct RemoteSnapshot {
    pub notices: Vec<Notice>,
    pub attachments_stripped: bool,
    /// `None` when the store reported no version at all.
    pub version_tag: Option<String>,
}

impl RemoteSnapshot {
    /// Some notices arrived without their files and may be restorable from
    /// the local copy.
    pub fn needs_local_attachments(&self) -> bool {
        self.attachments_stripped || self.notices.iter().any(Notice::has_attachment_markers)
    }
}

pub(crate) fn iso_now(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serialize the collection, stripping attachments when the full document
/// exceeds `max_bytes`.
///
/// A document that still carries strip markers (this client never had those
/// files) stays flagged `attachmentsStripped` even when it fits, so the
/// client holding the files keeps restoring them.
pub fn encode_for_upload(
    notices: &[Notice],
    max_bytes: usize,
    now: DateTime<Utc>,
) -> Result<EncodedPayload, serde_json::Error> {
    let carries_markers = notices.iter().any(Notice::has_attachment_markers);
    let full = RemoteDocument {
        notices: notices.to_vec(),
        last_updated: Some(iso_now(now)),
        attachments_stripped: carries_markers,
    };
    let body = serde_json::to_string(&full)?;
    if body.len() <= max_bytes {
        return Ok(EncodedPayload {
            body,
            attachments_stripped: false,
        });
    }

    log::warn!(
        "[noticeboard.remote] Payload of {} bytes exceeds {} bytes, retrying without attachments",
        body.len(),
        max_bytes
    );
    let stripped = RemoteDocument {
        notices: notices.iter().map(Notice::stripped).collect(),
        last_updated: full.last_updated,
        attachments_stripped: true,
    };
    let body = serde_json::to_string(&stripped)?;
    if body.len() > max_bytes {
        log::warn!(
            "[noticeboard.remote] Stripped payload is still {} bytes; sending anyway",
            body.len()
        );
    }
    Ok(EncodedPayload {
        body,
        attachments_stripped: true,
    })
}

fn tag_from(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Decode a read response body (wrapped or bare) into a snapshot.
pub fn decode_latest(
    body: Value,
    version_header: Option<String>,
) -> Result<RemoteSnapshot, RemoteError> {
    let version_tag = body
        .pointer("/metadata/version_updated")
        .and_then(tag_from)
        .or(version_header.filter(|h| !h.is_empty()));

    let top_level_stripped = body
        .get("attachmentsStripped")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let record = match body {
        Value::Object(mut map) => match map.remove("record") {
            Some(record @ Value::Object(_)) => record,
            Some(other) => {
                return Err(RemoteError::InvalidResponse(format!(
                    "record is not an object: {}",
                    other
                )))
            }
            None => Value::Object(map),
        },
        other => {
            return Err(RemoteError::InvalidResponse(format!(
                "expected a JSON object, got {}",
                other
            )))
        }
    };

    let mut document: RemoteDocument = serde_json::from_value(record)
        .map_err(|e| RemoteError::InvalidResponse(format!("bad document: {}", e)))?;
    for notice in &mut document.notices {
        notice.tags = normalize_tags(notice.tags.as_slice());
    }

    Ok(RemoteSnapshot {
        notices: document.notices,
        attachments_stripped: document.attachments_stripped || top_level_stripped,
        version_tag,
    })
}

/// Extract the new version tag from a write response.
pub fn decode_receipt(body: &Value) -> Result<String, RemoteError> {
    body.pointer("/metadata/version_updated")
        .and_then(tag_from)
        .ok_or_else(|| {
            RemoteError::InvalidResponse("write response has no metadata.version_updated".into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{attachment, notice};
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_small_payload_keeps_attachments() {
        let mut n = notice("5");
        n.attachments = Some(vec![attachment("x.png")]);
        let payload = encode_for_upload(&[n], 500_000, now()).unwrap();
        assert!(!payload.attachments_stripped);

        let doc: Value = serde_json::from_str(&payload.body).unwrap();
        assert_eq!(doc["notices"][0]["attachments"][0]["name"], "x.png");
        assert!(doc.get("attachmentsStripped").is_none());
        assert_eq!(doc["lastUpdated"], "2026-03-01T12:00:00.000Z");
    }

    #[test]
    fn test_oversized_payload_is_stripped() {
        let mut big = attachment("scan.pdf");
        big.data = format!("data:application/pdf;base64,{}", "A".repeat(600_000));
        let mut n = notice("7");
        n.attachments = Some(vec![big]);

        let payload = encode_for_upload(&[n, notice("8")], 500_000, now()).unwrap();
        assert!(payload.attachments_stripped);
        assert!(payload.len() < 500_000);

        let doc: Value = serde_json::from_str(&payload.body).unwrap();
        assert_eq!(doc["attachmentsStripped"], true);
        assert!(doc["notices"][0].get("attachments").is_none());
        assert_eq!(doc["notices"][0]["hasAttachments"], true);
        assert_eq!(doc["notices"][0]["attachmentCount"], 1);
        assert_eq!(doc["notices"][1]["hasAttachments"], false);
        assert_eq!(doc["notices"][1]["attachmentCount"], 0);
        assert!(!payload.body.contains("base64"));
    }

    #[test]
    fn test_decode_wrapped_document() {
        let body = json!({
            "record": {
                "notices": [serde_json::to_value(notice("1")).unwrap()],
                "lastUpdated": "2026-03-01T12:00:00.000Z",
                "attachmentsStripped": true
            },
            "metadata": { "version_updated": "2026-03-01T12:00:01.000Z" }
        });
        let snap = decode_latest(body, Some("ignored".into())).unwrap();
        assert_eq!(snap.notices.len(), 1);
        assert!(snap.attachments_stripped);
        assert_eq!(snap.version_tag.as_deref(), Some("2026-03-01T12:00:01.000Z"));
    }

    #[test]
    fn test_decode_bare_document_falls_back_to_header() {
        let body = json!({ "notices": [], "attachmentsStripped": false });
        let snap = decode_latest(body.clone(), Some("v-header".into())).unwrap();
        assert_eq!(snap.version_tag.as_deref(), Some("v-header"));
        assert!(snap.notices.is_empty());

        let snap = decode_latest(body, None).unwrap();
        assert!(snap.version_tag.is_none());
    }

    #[test]
    fn test_markers_keep_small_document_flagged() {
        let mut n = notice("5");
        n.attachments = Some(vec![attachment("x.png")]);
        let payload = encode_for_upload(&[n.stripped(), notice("6")], 500_000, now()).unwrap();
        // Nothing was stripped on this write
        assert!(!payload.attachments_stripped);

        let doc: Value = serde_json::from_str(&payload.body).unwrap();
        assert_eq!(doc["attachmentsStripped"], true);
        assert_eq!(doc["notices"][0]["hasAttachments"], true);
    }

    #[test]
    fn test_decode_normalizes_tags() {
        let mut n = notice("1");
        n.tags = vec!["Exams".into(), " exams".into(), "CS".into(), "".into()];
        let body = json!({ "record": { "notices": [n] } });
        let snap = decode_latest(body, None).unwrap();
        assert_eq!(snap.notices[0].tags, vec!["exams", "cs"]);
    }

    #[test]
    fn test_decode_empty_record() {
        let body = json!({ "record": {}, "metadata": { "version_updated": 3 } });
        let snap = decode_latest(body, None).unwrap();
        assert!(snap.notices.is_empty());
        assert_eq!(snap.version_tag.as_deref(), Some("3"));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(matches!(
            decode_latest(json!([1, 2]), None),
            Err(RemoteError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_receipt_requires_version() {
        let ok = json!({ "metadata": { "version_updated": "v2" } });
        assert_eq!(decode_receipt(&ok).unwrap(), "v2");
        assert!(decode_receipt(&json!({ "record": {} })).is_err());
    }
}
