use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::Receiver;

use crate::actor::fs::FsActor;
use crate::actor::ws::{Broadcaster, run_heartbeat, run_inbound};
use crate::config::LiveConfig;
use crate::core::{StopHandle, StopSignal};

/// How long each task gets to wind down after stop.
const DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

pub(super) struct Actors {
    pub fs: Option<FsActor>,
    pub broadcaster: Arc<Broadcaster>,
    pub live: LiveConfig,
}

/// Run all actors concurrently until shutdown, then stop them.
pub(super) async fn run_actors(
    actors: Actors,
    stop: &StopHandle,
    signal: StopSignal,
    shutdown_rx: Option<Receiver<()>>,
) {
    let Actors {
        fs,
        broadcaster,
        live,
    } = actors;

    let mut handles = Vec::new();
    if let Some(fs) = fs {
        let signal = signal.clone();
        handles.push(tokio::spawn(async move { fs.run(signal).await }));
    }
    handles.push(tokio::spawn(run_heartbeat(
        Arc::clone(&broadcaster),
        live.heartbeat(),
        live.probe_timeout(),
        signal.clone(),
    )));
    handles.push(tokio::spawn(run_inbound(broadcaster, signal.clone())));

    match shutdown_rx {
        Some(rx) => loop {
            if rx.try_recv().is_ok() || crate::core::is_shutdown() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        },
        None => {
            let mut signal = signal;
            signal.stopped().await;
        }
    }

    stop.stop();
    for handle in handles {
        let _ = tokio::time::timeout(DRAIN_TIMEOUT, handle).await;
    }
}
