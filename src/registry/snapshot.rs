//! Synchronous mirror of the registry for the interception hook.

use arc_swap::ArcSwap;
use std::sync::Arc;

use super::types::{LockEntry, LockRegistry};
use crate::host::TabId;

/// In-memory, synchronously readable mirror of the persisted registry.
///
/// Published by the registry manager immediately after every committed
/// write, and read-only everywhere else. Readers see the result of the
/// most recently *completed* transaction; a transaction whose write is
/// still in flight is not yet visible. That staleness window is bounded by
/// one store round trip and is an accepted property of the interception
/// hook, which cannot wait.
#[derive(Debug, Default)]
pub struct Snapshot {
    current: ArcSwap<LockRegistry>,
}

impl Snapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the mirror with the registry just written to the store.
    pub fn publish(&self, registry: LockRegistry) {
        self.current.store(Arc::new(registry));
    }

    /// The current registry view. Lock-free and non-blocking.
    pub fn load(&self) -> Arc<LockRegistry> {
        self.current.load_full()
    }

    /// The lock entry for one tab, cloned out of the current view.
    pub fn entry(&self, tab: TabId) -> Option<LockEntry> {
        self.current.load().entry(tab).cloned()
    }
}
