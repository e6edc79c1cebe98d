//! Wiki content: documents, rendering, scanning and the live snapshot.
//!
//! ```text
//! docroot/*.md ──Scanner──▶ Snapshot ──install──▶ ContentStore ──load──▶ readers
//! ```

mod document;
mod links;
mod render;
mod scan;
mod snapshot;
mod store;

pub use document::{DocId, Document, FileKind};
pub use render::render_markdown;
pub use scan::Scanner;
pub use snapshot::{LastModified, PageView, Snapshot};
pub use store::ContentStore;
