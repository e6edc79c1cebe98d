//! Cooperative stop signal for background tasks.
//!
//! One `StopHandle` fans out to any number of `StopSignal` clones. Async
//! loops `select!` on [`StopSignal::stopped`]; blocking threads poll
//! [`StopSignal::is_stopped`] between rounds.

use tokio::sync::watch;

/// Owner side: flips every signal once.
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

/// Listener side, cheap to clone.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopHandle {
    pub fn new() -> (Self, StopSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, StopSignal { rx })
    }

    /// Ask every listener to stop. Idempotent.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

impl StopSignal {
    /// True once stop was requested or the handle is gone.
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolve once stop has been requested (or the handle dropped).
    pub async fn stopped(&mut self) {
        // Err means the handle is gone, which also ends the task.
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}
