/// Identifier generation for notices, attachments and admin sessions.
///
/// Ids are `<millis>-<8 hex>`: the creation time keeps them roughly sortable,
/// and the hash suffix (atomic counter + nanosecond clock through SHA-256)
/// keeps ids created in the same millisecond apart. These ids are not secret;
/// session tokens are random UUIDs instead.
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};
use uuid::Uuid;

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn hash_suffix() -> String {
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut hasher = Sha256::new();
    hasher.update(seq.to_le_bytes());
    hasher.update(ts.to_le_bytes());
    hex::encode(&hasher.finalize()[..4])
}

fn millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Generate a new notice id.
pub fn generate_notice_id() -> String {
    format!("{}-{}", millis(), hash_suffix())
}

/// Generate a new attachment id.
pub fn generate_attachment_id() -> String {
    format!("att-{}-{}", millis(), hash_suffix())
}

/// Generate an opaque admin session token (random v4 UUID).
pub fn generate_session_token() -> String {
    Uuid::new_v4().to_string()
}
