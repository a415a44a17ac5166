// src/watch/runner.rs

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A periodically polled watcher.
///
/// `check()` is the only thing a concrete watcher implements: it must be safe
/// to call repeatedly, with no per-call setup or teardown. The poll loop,
/// sleeping, and stop handling live once in [`spawn_watch`].
pub trait Watch: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Interval between `check()` calls.
    fn period(&self) -> Duration;

    /// Poll the underlying signal once and fire any triggered actions.
    fn check(&mut self);
}

/// Create a stop signal pair: the handle requests the stop, every cloned
/// token observes it.
pub fn stop_channel() -> (StopHandle, StopToken) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopToken { rx })
}

/// Requests cooperative shutdown of all watcher loops.
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    pub fn stop(&self) {
        let _ = self.tx.send(true);
    }
}

/// Observes a stop request; one clone per watcher loop.
#[derive(Clone)]
pub struct StopToken {
    rx: watch::Receiver<bool>,
}

impl StopToken {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once stop has been requested (or the handle was dropped).
    pub async fn stopped(&mut self) {
        while !*self.rx.borrow() {
            if self.rx.changed().await.is_err() {
                break;
            }
        }
    }
}

/// Drive a watcher: call `check()`, then sleep one period, until stopped.
///
/// The sleep races the stop token, so stop latency is bounded by at most one
/// period; an in-flight `check()` is never interrupted.
pub fn spawn_watch<W: Watch + 'static>(mut watcher: W, mut stop: StopToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            watcher = watcher.name(),
            period = ?watcher.period(),
            "watcher started"
        );

        loop {
            watcher.check();
            if stop.is_stopped() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(watcher.period()) => {}
                _ = stop.stopped() => break,
            }
        }

        debug!(watcher = watcher.name(), "watcher loop ended");
    })
}
