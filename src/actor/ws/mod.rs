//! WebSocket fan-out to browser sessions.
//!
//! This actor is responsible for:
//! - Admitting new sessions with their initial page
//! - Pushing every content update to every live session
//! - Following each session's current route
//! - Probing liveness and evicting sessions that stop answering
//!
//! # Architecture
//!
//! ```text
//! FsActor --[ContentUpdate]--> Broadcaster --[page/refresh]--> Sessions
//!                                   ^                             |
//!                                   +--------[page path]----------+
//! ```

mod heartbeat;
mod registry;
mod session;

pub use heartbeat::{run_heartbeat, run_inbound};
pub use registry::SessionRegistry;
pub use session::Connection;
#[cfg(test)]
pub(crate) use registry::tests::{MockConnection, MockState};

use std::sync::Arc;

use super::messages::ContentUpdate;
use crate::content::{ContentStore, DocId, Snapshot};
use crate::reload::message::LiveMessage;
use crate::utils::path::last_segment;
use crate::{debug, log};

/// Renders snapshots for sessions and sends them.
pub struct Broadcaster {
    registry: SessionRegistry,
    store: Arc<ContentStore>,
    prefix: String,
}

impl Broadcaster {
    pub fn new(store: Arc<ContentStore>, prefix: impl Into<String>) -> Self {
        Self {
            registry: SessionRegistry::new(),
            store,
            prefix: prefix.into(),
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Register a freshly handshaken connection and send its first page.
    ///
    /// The snapshot is read under the registry lock. A rebuild installed
    /// before that point is in the first page; one installed after it is
    /// broadcast to this session too.
    pub fn connect(&self, conn: Box<dyn Connection>, route: Option<String>) {
        let peer = conn.peer();
        if let Err(e) = self
            .registry
            .admit(conn, route, |route| self.render(&self.store.load(), route))
        {
            log!("ws"; "initial push to {} failed: {}", peer, e);
        }
    }

    /// Deliver one update to every session.
    pub fn publish(&self, update: ContentUpdate) {
        let sent = match update {
            ContentUpdate::SnapshotUpdated(snapshot) => self
                .registry
                .send_each(|route| self.render(&snapshot, route)),
            ContentUpdate::ContentChanged => {
                let refresh = refresh_json("content changed");
                self.registry.send_each(|_| refresh.clone())
            }
        };
        debug!("ws"; "update sent to {} sessions", sent);
    }

    /// Read inbound frames; sessions that moved get their new page.
    pub fn poll_inbound(&self) {
        let moved = self.registry.poll_inbound();
        if moved.is_empty() {
            return;
        }
        for id in moved {
            self.registry
                .send_to(id, |route| self.render(&self.store.load(), route));
        }
    }

    /// JSON for a session showing `route`, or a refresh if that page is gone.
    fn render(&self, snapshot: &Snapshot, route: Option<&str>) -> Option<String> {
        let path = route.unwrap_or("/");
        let id = self.doc_for(path);
        let json = match snapshot.page_view(&id, &self.prefix) {
            Some(page) => LiveMessage::Page { path, page }.to_json(),
            None => LiveMessage::Refresh { reason: "page not found" }.to_json(),
        };
        match json {
            Ok(json) => Some(json),
            Err(e) => {
                log!("error"; "failed to encode live message: {}", e);
                None
            }
        }
    }

    /// Document identity for a browser path under the prefix.
    fn doc_for(&self, path: &str) -> DocId {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let local = path.strip_prefix(self.prefix.as_str()).unwrap_or(path);
        DocId::from_request(last_segment(local).unwrap_or_default())
    }
}

fn refresh_json(reason: &str) -> Option<String> {
    LiveMessage::Refresh { reason }.to_json().ok()
}
