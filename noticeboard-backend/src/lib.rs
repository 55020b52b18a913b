/// Notice board sync daemon: config loading, storage and remote setup, the
/// poll loop, and a log of board events until Ctrl-C.
pub mod config;
pub mod log_bridge;
pub mod remote_client;

use crate::config::NoticeBoardConfig;
use noticeboard_core::events::BoardEvent;
use noticeboard_core::poller::Poller;
use noticeboard_core::storage::local::LocalStorage;
use noticeboard_core::storage::{NoticeStorage, StorageError};
use noticeboard_core::types::{Notification, Severity};
use noticeboard_core::NoticeBoard;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

/// Open the local store and wire up the remote client from `config`.
pub fn build_board(config: &NoticeBoardConfig) -> Result<NoticeBoard, StorageError> {
    let dir = config.data_dir();
    let storage: Arc<dyn NoticeStorage> = Arc::new(LocalStorage::open(&dir)?);
    log::info!("[noticeboard.backend] Local store at {}", dir.display());
    let remote = remote_client::build_remote(&config.remote, config.board.max_payload_bytes);
    Ok(NoticeBoard::new(storage, remote, config.board.clone()))
}

fn log_notification(n: &Notification) {
    match n.severity {
        Severity::Error => log::error!("[noticeboard.events] {}", n.message),
        Severity::Warning => log::warn!("[noticeboard.events] {}", n.message),
        Severity::Success | Severity::Info => log::info!("[noticeboard.events] {}", n.message),
    }
}

/// Log board events until shutdown.
pub async fn forward_events(
    mut events: broadcast::Receiver<BoardEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            result = events.recv() => {
                match result {
                    Ok(BoardEvent::NoticesChanged { source }) => {
                        log::info!("[noticeboard.events] Notices changed ({:?})", source);
                    }
                    Ok(BoardEvent::Notification(n)) => log_notification(&n),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        log::warn!("[noticeboard.events] Skipped {} events", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}

pub async fn run() {
    if let Err(e) = log_bridge::init() {
        log_bridge::write_fallback_line(&format!("failed to initialize backend logger: {}", e));
    }
    log::info!("[noticeboard.backend] Logging to {}", log_bridge::log_file_path());

    let config_path = config::config_path();
    let config = config::load_config(&config_path);

    let board = match build_board(&config) {
        Ok(board) => Arc::new(board),
        Err(e) => {
            log::error!("[noticeboard.backend] Cannot open local store: {}", e);
            return;
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let event_task = tokio::spawn(forward_events(board.subscribe(), shutdown_rx));

    let report = board.load().await;
    log::info!(
        "[noticeboard.backend] Board ready: {} notices from {:?}",
        report.notices,
        report.source
    );

    let mut poller = Poller::for_board(board.clone());
    if board.is_remote_enabled() {
        poller.start();
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("[noticeboard.backend] Cannot listen for Ctrl-C: {}", e);
    }
    log::info!("[noticeboard.backend] Shutting down");

    poller.stop();
    let _ = shutdown_tx.send(true);
    let _ = event_task.await;
}
