//! Actor Message Definitions
//!
//! ```text
//! FsActor --ContentUpdate--> Broadcaster --page/refresh--> Sessions
//! ```

use std::sync::Arc;

use crate::content::Snapshot;

/// What changed after a burst of filesystem activity.
#[derive(Debug, Clone)]
pub enum ContentUpdate {
    /// A new snapshot is installed; sessions get their page re-rendered.
    SnapshotUpdated(Arc<Snapshot>),
    /// Something outside the documents changed (styles, scripts, images);
    /// sessions reload from the server.
    ContentChanged,
}
