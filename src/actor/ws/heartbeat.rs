//! Liveness probing and inbound frame polling.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval, sleep};

use super::Broadcaster;
use crate::core::StopSignal;
use crate::debug;

/// How often inbound frames (route changes, closes) are read.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Probe every session each `every`; evict those silent after `deadline`.
pub async fn run_heartbeat(
    broadcaster: Arc<Broadcaster>,
    every: Duration,
    deadline: Duration,
    mut stop: StopSignal,
) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = stop.stopped() => break,
            _ = ticker.tick() => {}
        }

        let registry = broadcaster.registry();
        if registry.probe() == 0 {
            continue;
        }
        tokio::select! {
            _ = stop.stopped() => break,
            _ = sleep(deadline) => {}
        }
        broadcaster.poll_inbound();
        let evicted = registry.reap_unresponsive();
        if evicted > 0 {
            debug!("ws"; "{} sessions evicted, {} live", evicted, registry.len());
        }
    }
    debug!("ws"; "heartbeat stopped");
}

/// Read session frames every [`POLL_INTERVAL`] until stopped.
pub async fn run_inbound(broadcaster: Arc<Broadcaster>, mut stop: StopSignal) {
    let mut ticker = interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = stop.stopped() => break,
            _ = ticker.tick() => broadcaster.poll_inbound(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ws::registry::tests::MockConnection;
    use crate::content::{ContentStore, Snapshot};
    use crate::core::StopHandle;

    const EVERY: Duration = Duration::from_secs(1);
    const DEADLINE: Duration = Duration::from_millis(100);

    fn broadcaster() -> Arc<Broadcaster> {
        let store = Arc::new(ContentStore::new(Snapshot::default()));
        Arc::new(Broadcaster::new(store, ""))
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_then_reap_after_deadline() {
        let broadcaster = broadcaster();
        let (alive, alive_state) = MockConnection::new();
        let (silent, silent_state) = MockConnection::new();
        alive_state.lock().answer_pings = true;
        broadcaster.connect(alive, None);
        broadcaster.connect(silent, None);

        let (handle, stop) = StopHandle::new();
        let task = tokio::spawn(run_heartbeat(Arc::clone(&broadcaster), EVERY, DEADLINE, stop));

        // Before the first beat nobody is probed.
        sleep(EVERY / 2).await;
        assert_eq!(alive_state.lock().pings, 0);

        sleep(EVERY / 2 + DEADLINE * 2).await;
        assert_eq!(alive_state.lock().pings, 1);
        assert_eq!(broadcaster.registry().len(), 1);
        assert!(silent_state.lock().closed);
        assert!(!alive_state.lock().closed);

        handle.stop();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_deadline_reaps_nothing() {
        let broadcaster = broadcaster();
        let (silent, silent_state) = MockConnection::new();
        broadcaster.connect(silent, None);

        let (handle, stop) = StopHandle::new();
        let task = tokio::spawn(run_heartbeat(Arc::clone(&broadcaster), EVERY, DEADLINE, stop));

        sleep(EVERY + DEADLINE / 2).await;
        assert_eq!(silent_state.lock().pings, 1);
        handle.stop();
        task.await.unwrap();

        assert_eq!(broadcaster.registry().len(), 1);
        assert!(!silent_state.lock().closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inbound_poller_stops() {
        let (handle, stop) = StopHandle::new();
        let task = tokio::spawn(run_inbound(broadcaster(), stop));

        sleep(POLL_INTERVAL * 3).await;
        assert!(!task.is_finished());
        handle.stop();
        task.await.unwrap();
    }
}
