/// Events broadcast by a notice board to its UI collaborator.
use serde::{Deserialize, Serialize};

use crate::types::Notification;

/// Why the visible collection changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeSource {
    /// Initial load (remote, local copy, or samples)
    Load,
    /// A local add/update/delete/reorder
    Mutation,
    /// A poll tick applied a newer remote document
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoardEvent {
    /// Re-render signal
    NoticesChanged { source: ChangeSource },
    Notification(Notification),
}
