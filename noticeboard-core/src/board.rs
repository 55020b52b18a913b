/// The notice board: in-memory collection plus the local/remote sync protocol.
///
/// Every mutation follows the same path:
/// 1. check the admin token and validate input (no state change on failure)
/// 2. commit to memory under the state lock (order allocation included)
/// 3. release the lock, write the remote document if one is configured
/// 4. save the full collection locally (also the fallback when step 3 fails)
///
/// The state lock is never held across an await. While a mutation sits between
/// steps 2 and 4, or when one committed while a poll's read was out, the poll
/// reports `Deferred` instead of adopting remote data.
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{NaiveDate, Utc};
use tokio::sync::broadcast;

use crate::config::{digest_admin_code, BoardOptions};
use crate::events::{BoardEvent, ChangeSource};
use crate::ids::{generate_attachment_id, generate_notice_id, generate_session_token};
use crate::order::{self, OrderAssignment, OrderOption};
use crate::remote::payload::iso_now;
use crate::remote::{RemoteError, RemoteStoreClient};
use crate::samples::sample_notices;
use crate::storage::{NoticeStorage, StorageError};
use crate::sync::{poll_decision, reconcile, PollDecision};
use crate::tags::{self, NoticeFilter, TagIndex};
use crate::types::{
    Attachment, Category, Notice, NoticeDraft, Notification, Priority, DEFAULT_AUTHOR,
};
use crate::validation::{validate_display_order, validate_draft, ValidationError};

/// Session key holding the active admin token.
pub const ADMIN_SESSION_KEY: &str = "admin-session";

const EVENT_CAPACITY: usize = 64;

const OFFLINE_MESSAGE: &str = "Error connecting to server. Using offline mode.";
const STRIPPED_MESSAGE: &str = "File attachments saved locally only due to size limits";
const ADD_FALLBACK: &str = "Error saving notice online. Changes saved locally.";
const UPDATE_FALLBACK: &str = "Error updating notice online. Changes saved locally.";
const DELETE_FALLBACK: &str = "Error deleting notice online. Removed locally.";

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("Admin login required to {action}")]
    PrivilegeRequired { action: &'static str },

    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),

    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(#[from] RemoteError),

    #[error("Local save failed: {0}")]
    LocalPersistenceFailed(#[from] StorageError),
}

impl BoardError {
    /// The toast a UI shows for this failure.
    pub fn notification(&self) -> Notification {
        match self {
            BoardError::PrivilegeRequired { .. } => Notification::error(self.to_string()),
            BoardError::ValidationFailed(e) => Notification::error(e.message.clone()),
            BoardError::RemoteUnavailable(_) => Notification::error(OFFLINE_MESSAGE),
            BoardError::LocalPersistenceFailed(_) => {
                Notification::error("Error saving notice locally. Please try again.")
            }
        }
    }
}

/// Capability proving an admin login in the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminToken(String);

/// Where a mutation ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Written to the remote document and saved locally
    Remote,
    /// No remote configured; saved locally
    Local,
    /// Remote write failed; saved locally only
    LocalFallback,
    /// Nothing matched (unknown id); no state change
    NotApplied,
}

#[derive(Debug, Clone)]
pub struct Outcome<T> {
    pub value: T,
    pub persistence: Persistence,
    pub notifications: Vec<Notification>,
}

impl<T> Outcome<T> {
    fn not_applied(value: T) -> Self {
        Self {
            value,
            persistence: Persistence::NotApplied,
            notifications: Vec::new(),
        }
    }

    pub fn is_applied(&self) -> bool {
        self.persistence != Persistence::NotApplied
    }
}

/// Where the collection came from on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    /// The remote document was empty and was seeded with samples
    RemoteSeeded,
    Local,
    /// Nothing usable locally; samples were used
    Samples,
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub source: LoadSource,
    pub notices: usize,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No remote configured
    Disabled,
    Unchanged,
    Deferred,
    Applied,
}

#[derive(Default)]
struct BoardState {
    notices: Vec<Notice>,
    tag_index: TagIndex,
    last_version: Option<String>,
    pending_mutations: usize,
    /// Bumped by every committed mutation
    mutation_epoch: u64,
}

impl BoardState {
    /// Restore display order and rebuild the derived tag index.
    fn refresh(&mut self) {
        order::sort_for_display(&mut self.notices);
        self.tag_index = TagIndex::build(&self.notices);
    }

    fn replace_all(&mut self, notices: Vec<Notice>) {
        self.notices = notices;
        self.refresh();
    }

    /// Close a mutation commit: refresh derived state and mark it in flight.
    fn begin_mutation(&mut self) {
        self.refresh();
        self.pending_mutations += 1;
        self.mutation_epoch += 1;
    }

    /// A mutation is in flight, or one committed since `epoch` was read.
    fn mutated_since(&self, epoch: u64) -> bool {
        self.pending_mutations > 0 || self.mutation_epoch != epoch
    }
}

/// Marks a mutation as in flight until dropped.
struct PendingMutation<'a> {
    state: &'a Mutex<BoardState>,
}

impl Drop for PendingMutation<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.pending_mutations = state.pending_mutations.saturating_sub(1);
    }
}

/// A draft that passed validation, with defaults filled in.
struct ValidDraft {
    title: String,
    content: String,
    category: Category,
    priority: Priority,
    date: NaiveDate,
    deadline: Option<NaiveDate>,
    author: String,
    tags: Vec<String>,
    attachments: Vec<Attachment>,
    display_order: Option<String>,
}

pub struct NoticeBoard {
    storage: Arc<dyn NoticeStorage>,
    remote: Option<RemoteStoreClient>,
    options: BoardOptions,
    state: Mutex<BoardState>,
    events: broadcast::Sender<BoardEvent>,
}

impl NoticeBoard {
    /// `remote: None` runs the board local-only.
    pub fn new(
        storage: Arc<dyn NoticeStorage>,
        remote: Option<RemoteStoreClient>,
        options: BoardOptions,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            remote,
            options,
            state: Mutex::new(BoardState::default()),
            events,
        }
    }

    pub fn options(&self) -> &BoardOptions {
        &self.options
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Board events: re-render signals and every notification.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: BoardEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    fn emit_all(&self, source: ChangeSource, notifications: &[Notification]) {
        self.emit(BoardEvent::NoticesChanged { source });
        for n in notifications {
            self.emit(BoardEvent::Notification(n.clone()));
        }
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Populate the collection: remote first when configured, else (or on
    /// failure) the local copy, else samples.
    pub async fn load(&self) -> LoadReport {
        let mut notifications = Vec::new();

        let source = match &self.remote {
            Some(remote) => match remote.fetch_latest().await {
                Ok(snapshot) if snapshot.notices.is_empty() => {
                    log::info!("[noticeboard.sync] Remote document is empty, seeding samples");
                    let samples = sample_notices(Utc::now());
                    self.state.lock().unwrap().replace_all(samples.clone());
                    match remote.replace(&samples).await {
                        Ok(receipt) => {
                            self.state.lock().unwrap().last_version = Some(receipt.version_tag);
                            self.save_local(&mut notifications);
                            LoadSource::RemoteSeeded
                        }
                        Err(e) => {
                            log::warn!("[noticeboard.sync] Seeding remote failed: {}", e);
                            notifications.push(Notification::error(OFFLINE_MESSAGE));
                            self.load_local(&mut notifications)
                        }
                    }
                }
                Ok(snapshot) => {
                    let version = snapshot
                        .version_tag
                        .clone()
                        .unwrap_or_else(|| iso_now(Utc::now()));
                    let local = self.local_for_merge(snapshot.needs_local_attachments());
                    let notices =
                        reconcile(snapshot, local.as_deref(), self.options.attachments_enabled);
                    {
                        let mut state = self.state.lock().unwrap();
                        state.replace_all(notices);
                        state.last_version = Some(version);
                    }
                    self.save_local(&mut notifications);
                    LoadSource::Remote
                }
                Err(e) => {
                    log::warn!("[noticeboard.sync] Initial fetch failed: {}", e);
                    notifications.push(BoardError::RemoteUnavailable(e).notification());
                    self.load_local(&mut notifications)
                }
            },
            None => self.load_local(&mut notifications),
        };

        let count = self.state.lock().unwrap().notices.len();
        log::info!(
            "[noticeboard.sync] Loaded {} notices from {:?}",
            count,
            source
        );
        self.emit_all(ChangeSource::Load, &notifications);
        LoadReport {
            source,
            notices: count,
            notifications,
        }
    }

    fn load_local(&self, notifications: &mut Vec<Notification>) -> LoadSource {
        match self.storage.load_notices() {
            Ok(Some(notices)) => {
                self.state.lock().unwrap().replace_all(notices);
                LoadSource::Local
            }
            Ok(None) => {
                self.state
                    .lock()
                    .unwrap()
                    .replace_all(sample_notices(Utc::now()));
                self.save_local(notifications);
                LoadSource::Samples
            }
            Err(e) => {
                log::error!("[noticeboard.storage] Local notices unreadable: {}", e);
                self.state
                    .lock()
                    .unwrap()
                    .replace_all(sample_notices(Utc::now()));
                LoadSource::Samples
            }
        }
    }

    /// The persisted local copy, read only when a document lacking
    /// attachment payloads needs it.
    fn local_for_merge(&self, needed: bool) -> Option<Vec<Notice>> {
        if !needed || !self.options.attachments_enabled {
            return None;
        }
        match self.storage.load_notices() {
            Ok(local) => local,
            Err(e) => {
                log::warn!(
                    "[noticeboard.sync] Local copy unreadable, attachments cannot be restored: {}",
                    e
                );
                None
            }
        }
    }

    /// Save the current collection; failures become a notification.
    fn save_local(&self, notifications: &mut Vec<Notification>) {
        if let Err(e) = self.try_save_local() {
            log::error!("[noticeboard.storage] Local save failed: {}", e);
            notifications.push(BoardError::LocalPersistenceFailed(e).notification());
        }
    }

    fn try_save_local(&self) -> Result<(), StorageError> {
        let snapshot = self.notices();
        self.storage.save_notices(&snapshot)
    }

    // -----------------------------------------------------------------------
    // Poll
    // -----------------------------------------------------------------------

    /// One poll tick: fetch, compare version tags, adopt the remote document
    /// when it changed.
    pub async fn poll_once(&self) -> Result<PollOutcome, BoardError> {
        let Some(remote) = &self.remote else {
            return Ok(PollOutcome::Disabled);
        };
        let epoch = {
            let state = self.state.lock().unwrap();
            if state.pending_mutations > 0 {
                return Ok(PollOutcome::Deferred);
            }
            state.mutation_epoch
        };

        // A mutation that commits while the read is out makes the fetched
        // document stale, even if its write has already finished.
        let snapshot = remote.fetch_latest().await?;

        let decision = {
            let state = self.state.lock().unwrap();
            poll_decision(
                state.last_version.as_deref(),
                snapshot.version_tag.as_deref(),
                state.mutated_since(epoch),
            )
        };
        match decision {
            PollDecision::Unchanged => return Ok(PollOutcome::Unchanged),
            PollDecision::Deferred => return Ok(PollOutcome::Deferred),
            PollDecision::Apply => {}
        }

        let version = snapshot.version_tag.clone();
        let local = self.local_for_merge(snapshot.needs_local_attachments());
        let notices = reconcile(snapshot, local.as_deref(), self.options.attachments_enabled);
        {
            let mut state = self.state.lock().unwrap();
            if state.mutated_since(epoch) {
                return Ok(PollOutcome::Deferred);
            }
            state.replace_all(notices);
            state.last_version = version;
        }
        log::info!("[noticeboard.sync] Adopted newer remote document");

        let mut notifications = Vec::new();
        self.save_local(&mut notifications);
        self.emit_all(ChangeSource::Remote, &notifications);
        Ok(PollOutcome::Applied)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Full collection in display order.
    pub fn notices(&self) -> Vec<Notice> {
        self.state.lock().unwrap().notices.clone()
    }

    /// Notices matching `filter`, in display order.
    pub fn list_notices(&self, filter: &NoticeFilter) -> Vec<Notice> {
        self.state
            .lock()
            .unwrap()
            .notices
            .iter()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect()
    }

    pub fn get_notice(&self, id: &str) -> Option<Notice> {
        self.state
            .lock()
            .unwrap()
            .notices
            .iter()
            .find(|n| n.id == id)
            .cloned()
    }

    /// Every tag in use, sorted.
    pub fn available_tags(&self) -> Vec<String> {
        self.state.lock().unwrap().tag_index.to_vec()
    }

    pub fn categories_in_use(&self) -> Vec<Category> {
        tags::categories_in_use(&self.state.lock().unwrap().notices)
    }

    pub fn next_order(&self) -> String {
        order::next_available(&self.state.lock().unwrap().notices)
    }

    pub fn order_options(&self, editing_id: Option<&str>) -> Vec<OrderOption> {
        order::order_options(&self.state.lock().unwrap().notices, editing_id)
    }

    pub fn last_version(&self) -> Option<String> {
        self.state.lock().unwrap().last_version.clone()
    }

    // -----------------------------------------------------------------------
    // Session & preferences
    // -----------------------------------------------------------------------

    /// Exchange the admin code for a session token. `None` on a wrong code or
    /// when no admin code is configured.
    pub fn login_admin(&self, code: &str) -> Option<AdminToken> {
        let expected = self.options.admin_code_sha256.as_deref()?;
        if !digest_admin_code(code).eq_ignore_ascii_case(expected) {
            log::info!("[noticeboard.auth] Rejected admin login");
            return None;
        }
        let token = generate_session_token();
        self.storage
            .set_session_value(ADMIN_SESSION_KEY, Some(token.clone()));
        log::info!("[noticeboard.auth] Admin logged in");
        self.emit(BoardEvent::Notification(Notification::success(
            "Admin login successful!",
        )));
        Some(AdminToken(token))
    }

    /// Revoke the session's admin token.
    pub fn logout_admin(&self) {
        self.storage.set_session_value(ADMIN_SESSION_KEY, None);
        log::info!("[noticeboard.auth] Admin logged out");
        self.emit(BoardEvent::Notification(Notification::success(
            "Admin logout successful",
        )));
    }

    pub fn is_admin(&self, token: &AdminToken) -> bool {
        self.storage.session_value(ADMIN_SESSION_KEY).as_deref() == Some(token.0.as_str())
    }

    fn require_admin(&self, token: &AdminToken, action: &'static str) -> Result<(), BoardError> {
        if self.is_admin(token) {
            Ok(())
        } else {
            Err(BoardError::PrivilegeRequired { action })
        }
    }

    pub fn dark_mode(&self) -> bool {
        self.storage.dark_mode()
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<(), BoardError> {
        self.storage.set_dark_mode(enabled)?;
        Ok(())
    }

    /// Flip the theme; returns the new setting.
    pub fn toggle_dark_mode(&self) -> Result<bool, BoardError> {
        let enabled = !self.dark_mode();
        self.set_dark_mode(enabled)?;
        Ok(enabled)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    fn prepare(&self, draft: NoticeDraft) -> Result<ValidDraft, BoardError> {
        let mut draft = draft;
        if !self.options.attachments_enabled && !draft.attachments.is_empty() {
            log::debug!(
                "[noticeboard.board] Attachments disabled, dropping {} files",
                draft.attachments.len()
            );
            draft.attachments.clear();
        }
        validate_draft(&draft)?;

        let (Some(category), Some(date)) = (draft.category, draft.date) else {
            return Err(ValidationError::new("category", "Please select a category").into());
        };
        let author = draft
            .author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_AUTHOR)
            .to_string();
        let attachments = draft
            .attachments
            .into_iter()
            .map(|mut a| {
                if a.id.is_empty() {
                    a.id = generate_attachment_id();
                }
                a
            })
            .collect();

        Ok(ValidDraft {
            title: draft.title.trim().to_string(),
            content: draft.content,
            category,
            priority: draft.priority.unwrap_or_default(),
            date,
            deadline: draft.deadline,
            author,
            tags: tags::normalize_tags(draft.tags.as_slice()),
            attachments,
            display_order: draft.display_order,
        })
    }

    fn build_notice(
        id: String,
        draft: ValidDraft,
        display_order: String,
        timestamp: chrono::DateTime<Utc>,
    ) -> Notice {
        Notice {
            id,
            title: draft.title,
            content: draft.content,
            category: draft.category,
            priority: draft.priority,
            date: draft.date,
            deadline: draft.deadline,
            author: draft.author,
            tags: draft.tags,
            attachments: if draft.attachments.is_empty() {
                None
            } else {
                Some(draft.attachments)
            },
            has_attachments: None,
            attachment_count: None,
            display_order: Some(display_order),
            timestamp,
            last_modified: Some(Utc::now()),
        }
    }

    /// Create a notice from `draft`. Without a display order the next free
    /// slot is used; a held slot evicts its holder.
    pub async fn add_notice(
        &self,
        token: &AdminToken,
        draft: NoticeDraft,
    ) -> Result<Outcome<Notice>, BoardError> {
        self.require_admin(token, "add or edit notices")?;
        let draft = self.prepare(draft)?;

        let mut notifications = Vec::new();
        let notice = {
            let mut state = self.state.lock().unwrap();
            let mut id = generate_notice_id();
            while state.notices.iter().any(|n| n.id == id) {
                id = generate_notice_id();
            }
            let slot = draft
                .display_order
                .clone()
                .unwrap_or_else(|| order::next_available(&state.notices));
            let assignment = order::plan_assignment(&state.notices, &id, &slot);
            assignment.apply(&mut state.notices);
            notifications.extend(assignment.notification());

            let notice = Self::build_notice(id, draft, slot, Utc::now());
            state.notices.insert(0, notice.clone());
            state.begin_mutation();
            notice
        };
        log::info!("[noticeboard.board] Added notice {}", notice.id);

        let success = format!("Notice \"{}\" added successfully!", notice.title);
        let persistence = self
            .persist(Some(success), ADD_FALLBACK, &mut notifications)
            .await?;
        Ok(Outcome {
            value: notice,
            persistence,
            notifications,
        })
    }

    /// Replace the editable fields of notice `id`, keeping its id and creation
    /// timestamp. An unknown id is not an error; nothing changes.
    pub async fn update_notice(
        &self,
        token: &AdminToken,
        id: &str,
        draft: NoticeDraft,
    ) -> Result<Outcome<Option<Notice>>, BoardError> {
        self.require_admin(token, "add or edit notices")?;
        let draft = self.prepare(draft)?;

        let mut notifications = Vec::new();
        let notice = {
            let mut state = self.state.lock().unwrap();
            let Some(index) = state.notices.iter().position(|n| n.id == id) else {
                log::debug!("[noticeboard.board] Update of unknown notice {}", id);
                return Ok(Outcome::not_applied(None));
            };
            let timestamp = state.notices[index].timestamp;
            let slot = draft
                .display_order
                .clone()
                .or_else(|| state.notices[index].display_order.clone())
                .unwrap_or_else(|| order::next_available(&state.notices));
            let assignment = order::plan_assignment(&state.notices, id, &slot);
            assignment.apply(&mut state.notices);
            notifications.extend(assignment.notification());

            let notice = Self::build_notice(id.to_string(), draft, slot, timestamp);
            state.notices[index] = notice.clone();
            state.begin_mutation();
            notice
        };
        log::info!("[noticeboard.board] Updated notice {}", notice.id);

        let success = format!("Notice \"{}\" updated successfully!", notice.title);
        let persistence = self
            .persist(Some(success), UPDATE_FALLBACK, &mut notifications)
            .await?;
        Ok(Outcome {
            value: Some(notice),
            persistence,
            notifications,
        })
    }

    /// Remove notice `id`. Returns whether anything was removed.
    pub async fn delete_notice(
        &self,
        token: &AdminToken,
        id: &str,
    ) -> Result<Outcome<bool>, BoardError> {
        self.require_admin(token, "delete notices")?;

        {
            let mut state = self.state.lock().unwrap();
            let before = state.notices.len();
            state.notices.retain(|n| n.id != id);
            if state.notices.len() == before {
                log::debug!("[noticeboard.board] Delete of unknown notice {}", id);
                return Ok(Outcome::not_applied(false));
            }
            state.begin_mutation();
        }
        log::info!("[noticeboard.board] Deleted notice {}", id);

        let mut notifications = Vec::new();
        let persistence = self
            .persist(
                Some("Notice deleted successfully!".to_string()),
                DELETE_FALLBACK,
                &mut notifications,
            )
            .await?;
        Ok(Outcome {
            value: true,
            persistence,
            notifications,
        })
    }

    /// Pin notice `notice_id` to `requested`, evicting any other holder.
    pub async fn assign_order(
        &self,
        token: &AdminToken,
        notice_id: &str,
        requested: &str,
    ) -> Result<Outcome<Option<OrderAssignment>>, BoardError> {
        self.require_admin(token, "add or edit notices")?;
        validate_display_order(requested)?;

        let mut notifications = Vec::new();
        let assignment = {
            let mut state = self.state.lock().unwrap();
            if !state.notices.iter().any(|n| n.id == notice_id) {
                return Ok(Outcome::not_applied(None));
            }
            let assignment = order::plan_assignment(&state.notices, notice_id, requested);
            assignment.apply(&mut state.notices);
            let now = Utc::now();
            for n in state.notices.iter_mut() {
                let evicted = assignment
                    .eviction
                    .as_ref()
                    .is_some_and(|e| e.notice_id == n.id);
                if n.id == notice_id || evicted {
                    n.last_modified = Some(now);
                }
            }
            notifications.extend(assignment.notification());
            state.begin_mutation();
            assignment
        };

        let persistence = self
            .persist(None, UPDATE_FALLBACK, &mut notifications)
            .await?;
        Ok(Outcome {
            value: Some(assignment),
            persistence,
            notifications,
        })
    }

    /// Write a freshly committed collection out: remote first when
    /// configured, then locally. Expects the caller to have counted itself
    /// in `pending_mutations`.
    async fn persist(
        &self,
        success: Option<String>,
        fallback: &'static str,
        notifications: &mut Vec<Notification>,
    ) -> Result<Persistence, BoardError> {
        let _pending = PendingMutation { state: &self.state };

        let persistence = match &self.remote {
            None => Persistence::Local,
            Some(remote) => {
                let snapshot = self.notices();
                match remote.replace(&snapshot).await {
                    Ok(receipt) => {
                        if receipt.attachments_stripped {
                            notifications.push(Notification::warning(STRIPPED_MESSAGE));
                        }
                        self.state.lock().unwrap().last_version = Some(receipt.version_tag);
                        Persistence::Remote
                    }
                    Err(e) => {
                        log::warn!("[noticeboard.sync] Remote write failed, saving locally: {}", e);
                        notifications.push(Notification::error(fallback));
                        Persistence::LocalFallback
                    }
                }
            }
        };

        if let Err(e) = self.try_save_local() {
            log::error!("[noticeboard.storage] Local save failed: {}", e);
            if persistence != Persistence::Remote {
                let err = BoardError::LocalPersistenceFailed(e);
                notifications.push(err.notification());
                self.emit_all(ChangeSource::Mutation, notifications);
                return Err(err);
            }
            notifications.push(Notification::warning(
                "Saved online, but the local backup could not be written",
            ));
        }

        if persistence != Persistence::LocalFallback {
            if let Some(message) = success {
                notifications.push(Notification::success(message));
            }
        }
        self.emit_all(ChangeSource::Mutation, notifications);
        Ok(persistence)
    }
}
