//! Atomic holder of the current snapshot.

use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use parking_lot::Mutex;

use super::{Scanner, Snapshot};

/// The one current snapshot, swapped whole on every rebuild.
///
/// Readers never block and always see a complete scan.
pub struct ContentStore {
    current: ArcSwap<Snapshot>,
    /// Serializes scan + install so two rebuilds never interleave.
    rebuild: Mutex<()>,
}

impl ContentStore {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            rebuild: Mutex::new(()),
        }
    }

    /// The snapshot visible right now.
    #[inline]
    pub fn load(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Replace the current snapshot in one pointer swap.
    pub fn install(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let arc = Arc::new(snapshot);
        self.current.store(Arc::clone(&arc));
        arc
    }

    /// Scan and install. On error the previous snapshot stays current.
    pub fn rebuild(&self, scanner: &Scanner) -> Result<Arc<Snapshot>> {
        let _guard = self.rebuild.lock();
        let snapshot = scanner.scan()?;
        Ok(self.install(snapshot))
    }
}
