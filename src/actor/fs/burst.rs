//! Accumulated changes between two rebuilds.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::content::FileKind;

/// Paths touched during one burst, after dropping noise.
#[derive(Debug, Default)]
pub struct Burst {
    paths: FxHashSet<PathBuf>,
}

impl Burst {
    /// Record a notify event. Access and metadata-only events are noise.
    pub fn add(&mut self, event: &notify::Event) {
        use notify::EventKind;
        use notify::event::ModifyKind;

        match event.kind {
            EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any | EventKind::Other => {}
            EventKind::Modify(ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => {}
            EventKind::Access(_) => return,
        }

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }
            crate::debug!("watch"; "{:?} {}", event.kind, path.display());
            self.paths.insert(path.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether a file the browser loads directly (style, script, image)
    /// changed, as opposed to documents or repository metadata only.
    pub fn touches_assets(&self, root: &Path) -> bool {
        self.paths.iter().any(|path| {
            let Ok(rel) = path.strip_prefix(root) else {
                return false;
            };
            let mut parts = rel.components();
            let (Some(first), None) = (parts.next(), parts.next()) else {
                return false;
            };
            let name = first.as_os_str().to_string_lossy();
            name != ".git"
                && !matches!(
                    FileKind::classify(&name),
                    FileKind::Document { .. }
                        | FileKind::Header
                        | FileKind::Footer
                        | FileKind::Sidebar
                )
        })
    }
}

/// Editor swap files and backups.
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bak" | "swp" | "swo" | "swx" | "tmp")
        || name.ends_with('~')
        || name.starts_with(".#")
        || name == "4913"
}
