use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::WealthTracker;

/// Background price refresh loop.
///
/// One task runs every cycle in turn: one cycle right away, then one per
/// interval. Ticks that fall due while a cycle is still running are
/// skipped instead of queued, and each cycle is cut off after one interval
/// by [`WealthTracker::run_refresh_cycle`], so cycles never overlap or pile up.
pub struct RefreshService;

impl RefreshService {
    /// Start the loop for `tracker`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(tracker: WealthTracker) -> RefreshHandle {
        let interval = tracker.settings().refresh_interval();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(tracker, interval, shutdown_rx));
        RefreshHandle {
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }
}

async fn run(tracker: WealthTracker, interval: Duration, mut shutdown: watch::Receiver<bool>) {
    tracing::info!("Price refresh loop started (every {interval:?})");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        // A fetch still in flight at shutdown is dropped. Prices are only
        // written after the fetch returns, so nothing is left half-applied.
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = tracker.run_refresh_cycle() => {}
        }
    }

    tracing::info!("Price refresh loop stopped");
}

/// Owner of a running refresh loop. Dropping it stops the loop.
pub struct RefreshHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Stop the loop and wait for its task to finish.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Price refresh loop ended abnormally: {e}");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}
