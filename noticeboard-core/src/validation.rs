//! Input validation for notice drafts and attachments.
//!
//! All validators return `ValidationError` naming the offending field.

use std::sync::LazyLock;

use base64::Engine;
use regex::Regex;
use thiserror::Error;

use crate::types::{Attachment, NoticeDraft};

/// Largest accepted attachment, in bytes.
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types accepted as attachments.
pub const ALLOWED_ATTACHMENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "application/pdf",
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Visible text of rich-text markup: tags dropped, `&nbsp;` folded, trimmed.
/// An editor's empty state (`<p><br></p>`) has no visible text.
pub fn visible_text(markup: &str) -> String {
    TAG_RE
        .replace_all(markup, "")
        .replace("&nbsp;", " ")
        .trim()
        .to_string()
}

/// Check that a requested display order is a two-digit slot in "01".."99".
pub fn validate_display_order(order: &str) -> Result<(), ValidationError> {
    let valid = order.len() == 2
        && order.bytes().all(|b| b.is_ascii_digit())
        && order != "00";
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new(
            "displayOrder",
            format!("Display order must be between 01 and 99, got '{}'", order),
        ))
    }
}

/// Check a single attachment: allowed type, size ceiling, decodable payload.
pub fn validate_attachment(attachment: &Attachment) -> Result<(), ValidationError> {
    if !ALLOWED_ATTACHMENT_TYPES.contains(&attachment.mime_type.as_str()) {
        return Err(ValidationError::new(
            "attachments",
            format!("File type not allowed: {}", attachment.name),
        ));
    }

    let payload = attachment
        .data
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or_else(|| {
            ValidationError::new(
                "attachments",
                format!("Unreadable file data: {}", attachment.name),
            )
        })?;

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| {
            ValidationError::new(
                "attachments",
                format!("Unreadable file data: {}", attachment.name),
            )
        })?;

    if attachment.size > MAX_ATTACHMENT_BYTES || decoded.len() as u64 > MAX_ATTACHMENT_BYTES {
        return Err(ValidationError::new(
            "attachments",
            format!("File too large: {} (Max 5MB)", attachment.name),
        ));
    }
    Ok(())
}

/// Check the required fields of a draft before it becomes a notice.
pub fn validate_draft(draft: &NoticeDraft) -> Result<(), ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::new(
            "title",
            "Please enter a title for the notice",
        ));
    }
    if visible_text(&draft.content).is_empty() {
        return Err(ValidationError::new(
            "content",
            "Please enter content for the notice",
        ));
    }
    if draft.category.is_none() {
        return Err(ValidationError::new("category", "Please select a category"));
    }
    if draft.date.is_none() {
        return Err(ValidationError::new("date", "Please select a notice date"));
    }
    if let Some(order) = draft.display_order.as_deref() {
        validate_display_order(order)?;
    }
    for attachment in &draft.attachments {
        validate_attachment(attachment)?;
    }
    Ok(())
}
