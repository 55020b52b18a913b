pub mod board;
pub mod config;
pub mod events;
pub mod ids;
pub mod order;
pub mod poller;
pub mod remote;
pub mod samples;
pub mod storage;
pub mod sync;
pub mod tags;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use board::{AdminToken, BoardError, NoticeBoard, Outcome, Persistence};
pub use types::{Notice, NoticeDraft, Notification};
