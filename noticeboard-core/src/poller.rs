/// Background poll loop for a notice board.
///
/// One task per poller: it ticks on a fixed interval and whenever `trigger`
/// is called (focus regain). Restarting aborts the previous task instead of
/// stacking a second one. Poll failures are logged and the loop carries on.
/// Must be started from within a tokio runtime.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::board::{NoticeBoard, PollOutcome};

pub struct Poller {
    board: Arc<NoticeBoard>,
    period: Duration,
    wake: Arc<Notify>,
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(board: Arc<NoticeBoard>, period: Duration) -> Self {
        Self {
            board,
            period,
            wake: Arc::new(Notify::new()),
            shutdown: None,
            task: None,
        }
    }

    /// Uses the board's configured poll interval.
    pub fn for_board(board: Arc<NoticeBoard>) -> Self {
        let period = Duration::from_secs(board.options().poll_interval_secs.max(1));
        Self::new(board, period)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Start polling, replacing any running loop.
    pub fn start(&mut self) {
        self.stop();

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        self.shutdown = Some(shutdown_tx);

        let board = self.board.clone();
        let wake = self.wake.clone();
        let period = self.period;

        log::info!(
            "[noticeboard.poller] Polling every {}s",
            period.as_secs_f32()
        );
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the board was just loaded.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = wake.notified() => {
                        log::debug!("[noticeboard.poller] Woken for an immediate check");
                    }
                    _ = shutdown_rx.changed() => {
                        log::info!("[noticeboard.poller] Shutting down");
                        break;
                    }
                }

                match board.poll_once().await {
                    Ok(PollOutcome::Applied) => {
                        log::debug!("[noticeboard.poller] Applied remote changes")
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("[noticeboard.poller] Poll failed: {}", e),
                }
            }
        }));
    }

    /// Run a check now instead of waiting for the next tick.
    pub fn trigger(&self) {
        self.wake.notify_one();
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(true);
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardOptions;
    use crate::remote::{RemoteStoreClient, RemoteTransport};
    use crate::storage::local::LocalStorage;
    use crate::storage::NoticeStorage;
    use crate::test_support::{notice, FakeTransport};
    use tempfile::TempDir;

    async fn loaded_board(tmp: &TempDir, fake: &Arc<FakeTransport>) -> Arc<NoticeBoard> {
        let storage = Arc::new(LocalStorage::open(tmp.path()).unwrap());
        let client = RemoteStoreClient::new(fake.clone() as Arc<dyn RemoteTransport>, 500_000);
        let board = Arc::new(NoticeBoard::new(
            storage as Arc<dyn NoticeStorage>,
            Some(client),
            BoardOptions::default(),
        ));
        fake.publish(&[notice("a")], false);
        board.load().await;
        board
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_on_interval_and_adopts_changes() {
        let tmp = TempDir::new().unwrap();
        let fake = Arc::new(FakeTransport::new());
        let board = loaded_board(&tmp, &fake).await;
        let mut poller = Poller::new(board.clone(), Duration::from_secs(5));
        poller.start();

        fake.publish(&[notice("a"), notice("b")], false);
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(board.notices().len(), 2);
        assert!(poller.is_running());
        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_does_not_stack_loops() {
        let tmp = TempDir::new().unwrap();
        let fake = Arc::new(FakeTransport::new());
        let board = loaded_board(&tmp, &fake).await;
        let reads_after_load = fake.get_count();

        let mut poller = Poller::new(board, Duration::from_secs(5));
        poller.start();
        poller.start();
        poller.start();

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(fake.get_count() - reads_after_load, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_checks_immediately() {
        let tmp = TempDir::new().unwrap();
        let fake = Arc::new(FakeTransport::new());
        let board = loaded_board(&tmp, &fake).await;

        let mut poller = Poller::new(board.clone(), Duration::from_secs(60));
        poller.start();
        fake.publish(&[notice("z")], false);
        poller.trigger();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(board.get_notice("z").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_polling() {
        let tmp = TempDir::new().unwrap();
        let fake = Arc::new(FakeTransport::new());
        let board = loaded_board(&tmp, &fake).await;

        let mut poller = Poller::new(board, Duration::from_secs(5));
        poller.start();
        poller.stop();
        let reads = fake.get_count();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(fake.get_count(), reads);
        assert!(!poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_end_the_loop() {
        let tmp = TempDir::new().unwrap();
        let fake = Arc::new(FakeTransport::new());
        let board = loaded_board(&tmp, &fake).await;

        let mut poller = Poller::new(board.clone(), Duration::from_secs(5));
        poller.start();
        fake.set_failing(true);
        tokio::time::sleep(Duration::from_secs(11)).await;

        fake.set_failing(false);
        fake.publish(&[notice("back")], false);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(board.get_notice("back").is_some());
    }
}
