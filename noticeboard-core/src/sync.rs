/// Reconciliation of the remote document with local state.
///
/// The remote store is one blob with a version tag and no per-notice history,
/// so reconciliation is whole-collection:
/// - remote empty on load -> the store is uninitialized, seed it
/// - remote stripped -> take remote notices, restoring attachments by id from
///   the local full-fidelity copy
/// - otherwise -> remote wins wholesale
///
/// Poll ticks compare version tags first and only reconcile on change.
use std::collections::HashMap;

use crate::order::{duplicate_orders, sort_for_display};
use crate::remote::RemoteSnapshot;
use crate::types::Notice;

/// Substitute local attachments into remote notices that lost theirs.
///
/// A remote notice whose local counterpart (same id) has a non-empty attachment
/// list gets that list back and its strip markers cleared; every other remote
/// notice is taken as-is. Local-only notices are not resurrected.
pub fn merge_stripped(remote: Vec<Notice>, local: &[Notice]) -> (Vec<Notice>, usize) {
    restore_from_local(remote, local, |_| true)
}

/// Like [`merge_stripped`], but only for notices still carrying strip
/// markers. Used on unflagged documents, where a notice without markers may
/// have had its files removed on purpose.
pub fn merge_markers(remote: Vec<Notice>, local: &[Notice]) -> (Vec<Notice>, usize) {
    restore_from_local(remote, local, Notice::has_attachment_markers)
}

fn restore_from_local(
    remote: Vec<Notice>,
    local: &[Notice],
    wants: impl Fn(&Notice) -> bool,
) -> (Vec<Notice>, usize) {
    let by_id: HashMap<&str, &Notice> = local
        .iter()
        .filter(|n| n.has_local_attachments())
        .map(|n| (n.id.as_str(), n))
        .collect();

    let mut restored = 0;
    let merged = remote
        .into_iter()
        .map(|mut notice| {
            if !wants(&notice) {
                return notice;
            }
            if let Some(local) = by_id.get(notice.id.as_str()) {
                notice.attachments = local.attachments.clone();
                notice.has_attachments = None;
                notice.attachment_count = None;
                restored += 1;
            }
            notice
        })
        .collect();
    (merged, restored)
}

/// Build the collection to adopt from a fetched snapshot.
///
/// `local` is the persisted local copy, consulted only when the snapshot
/// lacks attachment payloads (flagged stripped, or republished by a client
/// that only had markers) and attachments are enabled. The result is
/// display-sorted.
pub fn reconcile(
    snapshot: RemoteSnapshot,
    local: Option<&[Notice]>,
    attachments_enabled: bool,
) -> Vec<Notice> {
    let local = local.unwrap_or(&[]);
    let mut notices = if !attachments_enabled || !snapshot.needs_local_attachments() {
        snapshot.notices
    } else if snapshot.attachments_stripped {
        let (merged, restored) = merge_stripped(snapshot.notices, local);
        log::info!(
            "[noticeboard.sync] Remote document was stripped, restored attachments on {} notices",
            restored
        );
        merged
    } else {
        let (merged, restored) = merge_markers(snapshot.notices, local);
        log::info!(
            "[noticeboard.sync] Restored attachments on {} notices republished without them",
            restored
        );
        merged
    };

    let dups = duplicate_orders(&notices);
    if !dups.is_empty() {
        log::warn!(
            "[noticeboard.sync] Remote document has shared display orders: {}",
            dups.join(", ")
        );
    }

    sort_for_display(&mut notices);
    notices
}

/// What a poll tick should do with a fetched version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    /// Same version as last seen (or no version reported)
    Unchanged,
    /// A local mutation is in flight; look again next tick
    Deferred,
    /// New remote version; reconcile and adopt it
    Apply,
}

pub fn poll_decision(last_seen: Option<&str>, fetched: Option<&str>, mutation_pending: bool) -> PollDecision {
    if mutation_pending {
        return PollDecision::Deferred;
    }
    match fetched {
        Some(tag) if Some(tag) != last_seen => PollDecision::Apply,
        _ => PollDecision::Unchanged,
    }
}
