//! Actor Coordinator - Wires up the Live Update Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Starts the session acceptor on an already-bound listener
//! - Starts the watcher (unless disabled), heartbeat and inbound poller
//! - Stops all of them once shutdown is requested

mod runtime;

use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::Receiver;

use super::fs::FsActor;
use super::ws::Broadcaster;
use crate::config::WikiConfig;
use crate::content::{ContentStore, Scanner};
use crate::core::StopHandle;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<WikiConfig>,
    scanner: Arc<Scanner>,
    store: Arc<ContentStore>,
    broadcaster: Arc<Broadcaster>,
    listener: Option<TcpListener>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn new(
        config: Arc<WikiConfig>,
        scanner: Arc<Scanner>,
        store: Arc<ContentStore>,
        broadcaster: Arc<Broadcaster>,
    ) -> Self {
        Self {
            config,
            scanner,
            store,
            broadcaster,
            listener: None,
            shutdown_rx: None,
        }
    }

    /// Accept live-update sessions on this listener.
    pub fn with_listener(mut self, listener: TcpListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system until shutdown.
    ///
    /// The watcher is set up before any session is accepted; if it fails,
    /// nothing has been started.
    pub async fn run(mut self) -> Result<()> {
        let (stop, signal) = StopHandle::new();

        let fs_actor = if self.config.watch.enable {
            let actor = FsActor::new(
                Arc::clone(&self.scanner),
                Arc::clone(&self.store),
                Arc::clone(&self.broadcaster),
                self.config.watch.clone(),
            )
            .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;
            Some(actor)
        } else {
            crate::log!("watch"; "disabled, pages only change on restart");
            None
        };

        let acceptor = match self.listener.take() {
            Some(listener) => Some(crate::reload::server::spawn_acceptor(
                listener,
                Arc::clone(&self.broadcaster),
                format!("{}/front", self.config.serve.prefix),
                signal.clone(),
            )?),
            None => None,
        };

        crate::debug!("actor"; "start");
        runtime::run_actors(
            runtime::Actors {
                fs: fs_actor,
                broadcaster: Arc::clone(&self.broadcaster),
                live: self.config.live.clone(),
            },
            &stop,
            signal,
            self.shutdown_rx.take(),
        )
        .await;

        if let Some(acceptor) = acceptor {
            let _ = tokio::task::spawn_blocking(move || acceptor.join()).await;
        }
        self.broadcaster.registry().close_all();
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Snapshot;
    use std::net::TcpStream;

    #[tokio::test]
    async fn test_watcher_failure_starts_no_acceptor() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let mut config = WikiConfig::default();
        config.content.docroot = "/definitely/not/here".into();
        config.watch.enable = true;
        let scanner = Arc::new(Scanner::new(&config.content.docroot, "git"));
        let store = Arc::new(ContentStore::new(Snapshot::default()));
        let broadcaster = Arc::new(Broadcaster::new(Arc::clone(&store), ""));

        let result = Coordinator::new(Arc::new(config), scanner, store, broadcaster)
            .with_listener(listener)
            .run()
            .await;

        assert!(result.is_err());
        assert!(TcpStream::connect(addr).is_err());
    }
}
