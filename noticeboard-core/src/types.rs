use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Display-order value used for notices that were never pinned.
/// Several notices may share it; every other order has at most one holder.
pub const SENTINEL_ORDER: &str = "99";

/// Author written into notices submitted without one.
pub const DEFAULT_AUTHOR: &str = "Administration";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Academic,
    Events,
    Exams,
    Urgent,
    Scholarship,
    FeePayments,
    Admission,
    Placement,
    Library,
}

impl Category {
    /// Every category, in the order filter listings show them.
    pub const ALL: [Category; 9] = [
        Category::Academic,
        Category::Events,
        Category::Exams,
        Category::Urgent,
        Category::Scholarship,
        Category::FeePayments,
        Category::Admission,
        Category::Placement,
        Category::Library,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Academic => "academic",
            Category::Events => "events",
            Category::Exams => "exams",
            Category::Urgent => "urgent",
            Category::Scholarship => "scholarship",
            Category::FeePayments => "fee-payments",
            Category::Admission => "admission",
            Category::Placement => "placement",
            Category::Library => "library",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Academic => "Academic",
            Category::Events => "Events",
            Category::Exams => "Exams",
            Category::Urgent => "Urgent",
            Category::Scholarship => "Scholarship",
            Category::FeePayments => "Fee Payments",
            Category::Admission => "Admission",
            Category::Placement => "Placement",
            Category::Library => "Library",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

/// A file attached to a notice, carried inline as a base64 data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    pub date: NaiveDate,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    /// Set in place of `attachments` when a remote write had to strip payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_attachments: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Notice {
    /// Effective display order; unset orders sort as the sentinel.
    pub fn order(&self) -> &str {
        self.display_order.as_deref().unwrap_or(SENTINEL_ORDER)
    }

    pub fn attachments(&self) -> &[Attachment] {
        self.attachments.as_deref().unwrap_or(&[])
    }

    pub fn has_local_attachments(&self) -> bool {
        !self.attachments().is_empty()
    }

    /// Carries strip markers but no payload: the files only exist in some
    /// client's local copy.
    pub fn has_attachment_markers(&self) -> bool {
        self.has_attachments == Some(true) && !self.has_local_attachments()
    }

    /// A deadline strictly before `today` is overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.deadline.is_some_and(|d| d < today)
    }

    /// Copy of this notice with attachment payloads replaced by markers.
    pub fn stripped(&self) -> Notice {
        let count = self.attachments().len();
        Notice {
            attachments: None,
            has_attachments: Some(count > 0),
            attachment_count: Some(count),
            ..self.clone()
        }
    }
}

/// The editable fields of a notice, as submitted by the editor form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub display_order: Option<String>,
}

impl From<&Notice> for NoticeDraft {
    fn from(notice: &Notice) -> Self {
        Self {
            title: notice.title.clone(),
            content: notice.content.clone(),
            category: Some(notice.category),
            priority: Some(notice.priority),
            date: Some(notice.date),
            deadline: notice.deadline,
            author: Some(notice.author.clone()),
            tags: notice.tags.clone(),
            attachments: notice.attachments().to_vec(),
            display_order: notice.display_order.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// A user-facing message for the UI to show as a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

/// Older documents carry numeric ids (`Date.now()`-style); accept both forms.
fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(d)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}
