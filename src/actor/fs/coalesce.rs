//! Tick-and-quiet-period coalescing of filesystem events.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::{MissedTickBehavior, interval, timeout};

use super::burst::Burst;
use crate::core::StopSignal;

/// Turn a stream of events into at most one `on_burst` call per tick.
///
/// On every `tick`, if anything arrived since the previous one, keep
/// draining until `quiet` passes without a new event, then hand the whole
/// burst over. Runs until stopped or the event source closes.
pub async fn coalesce<F, Fut>(
    mut events: mpsc::Receiver<notify::Event>,
    tick: Duration,
    quiet: Duration,
    mut stop: StopSignal,
    mut on_burst: F,
) where
    F: FnMut(Burst) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = stop.stopped() => break,
            _ = ticker.tick() => {}
        }

        let mut burst = Burst::default();
        let mut closed = false;
        loop {
            match events.try_recv() {
                Ok(event) => burst.add(&event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    closed = true;
                    break;
                }
            }
        }

        if !closed && !burst.is_empty() {
            loop {
                match timeout(quiet, events.recv()).await {
                    Ok(Some(event)) => burst.add(&event),
                    Ok(None) => {
                        closed = true;
                        break;
                    }
                    Err(_) => break,
                }
            }
        }

        if !burst.is_empty() {
            on_burst(burst).await;
        }
        if closed {
            crate::debug!("watch"; "event source closed");
            break;
        }
    }
}
