//! FileSystem Actor
//!
//! Watches the docroot and turns each burst of changes into one rebuild.
//!
//! ```text
//! notify --> bridge thread --> coalesce (tick + quiet) --> rebuild --> Broadcaster
//! ```

use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::messages::ContentUpdate;
use super::ws::Broadcaster;
use crate::config::WatchConfig;
use crate::content::{ContentStore, Scanner};
use crate::core::StopSignal;
use crate::{debug, log};

mod burst;
mod coalesce;

#[cfg(test)]
mod tests;

pub use burst::Burst;
pub use coalesce::coalesce;

const BRIDGE_BUFFER: usize = 256;

/// Keeps the snapshot in step with the docroot.
pub struct FsActor {
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Must stay alive for events to keep flowing.
    watcher: RecommendedWatcher,
    scanner: Arc<Scanner>,
    store: Arc<ContentStore>,
    broadcaster: Arc<Broadcaster>,
    config: WatchConfig,
}

impl FsActor {
    /// Start watching immediately so nothing written during startup is lost.
    pub fn new(
        scanner: Arc<Scanner>,
        store: Arc<ContentStore>,
        broadcaster: Arc<Broadcaster>,
        config: WatchConfig,
    ) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;
        watcher.watch(scanner.root(), RecursiveMode::Recursive)?;
        debug!("watch"; "watching {}", scanner.root().display());

        Ok(Self {
            notify_rx,
            watcher,
            scanner,
            store,
            broadcaster,
            config,
        })
    }

    pub async fn run(self, stop: StopSignal) {
        let Self {
            notify_rx,
            watcher,
            scanner,
            store,
            broadcaster,
            config,
        } = self;

        let (async_tx, async_rx) = mpsc::channel::<notify::Event>(BRIDGE_BUFFER);
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => log!("watch"; "notify error: {}", e),
                }
            }
        });

        coalesce(async_rx, config.tick(), config.quiet(), stop, |burst| {
            let scanner = Arc::clone(&scanner);
            let store = Arc::clone(&store);
            let broadcaster = Arc::clone(&broadcaster);
            async move { rebuild(burst, scanner, store, broadcaster).await }
        })
        .await;

        drop(watcher);
        debug!("watch"; "stopped");
    }
}

/// Rescan off the async workers and publish the outcome.
async fn rebuild(
    burst: Burst,
    scanner: Arc<Scanner>,
    store: Arc<ContentStore>,
    broadcaster: Arc<Broadcaster>,
) {
    let assets = burst.touches_assets(scanner.root());
    debug!("watch"; "{} paths changed, rescanning", burst.len());

    let scan_store = Arc::clone(&store);
    let scan = Arc::clone(&scanner);
    let result = tokio::task::spawn_blocking(move || scan_store.rebuild(&*scan)).await;

    let snapshot = match result {
        Ok(Ok(snapshot)) => snapshot,
        Ok(Err(e)) => {
            log!("watch"; "rescan failed, keeping previous snapshot: {:#}", e);
            return;
        }
        Err(e) => {
            log!("watch"; "rescan task failed: {}", e);
            return;
        }
    };

    log!("watch"; "reloaded {} documents", snapshot.len());
    let update = if assets {
        ContentUpdate::ContentChanged
    } else {
        ContentUpdate::SnapshotUpdated(snapshot)
    };
    broadcaster.publish(update);
}
