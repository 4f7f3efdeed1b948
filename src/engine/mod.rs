//! The lock coordination engine.
//!
//! [`LockEngine`] is the coordinator object that owns every piece of
//! process-wide coordination state: the advisory lock, the navigation
//! snapshot, the options mirror, the pending-URL counter, and the
//! recorded active tab. Host events flow through it one of two ways:
//!
//! - **Transactions** (`on_tab_updated`, `on_tab_removed`, `toggle_lock`,
//!   `initialize`): acquire the advisory lock, read the persisted
//!   registry, compute the new state, write only if something changed,
//!   publish the snapshot from the written value, release, and re-derive
//!   the indicator.
//! - **Interception** ([`decide`](LockEngine::decide) /
//!   [`intercept`](LockEngine::intercept)): synchronous, reads only the
//!   snapshot, never the store or the lock; the host discards a verdict
//!   that does not come back within the same call.

mod intercept;
mod reflect;
mod transactions;


pub use intercept::Verdict;
pub use reflect::indicator_state;

use arc_swap::ArcSwap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use tracing::warn;

use crate::config::Options;
use crate::error::Result;
use crate::host::{
    ContentInjector, INSTALL_GUARD_SRC, IndicatorSurface, KeyValueStore, REMOVE_GUARD_SRC, TabId,
    TabProvider, scriptable_url,
};
use crate::lock::AdvisoryLock;
use crate::registry::{LockEntry, LockRegistry, RegistryStore, Snapshot};

/// Sentinel for "no active tab recorded yet".
const NO_ACTIVE_TAB: i64 = -1;

/// Coordinator for per-tab lock state.
pub struct LockEngine {
    tabs: Arc<dyn TabProvider>,
    injector: Arc<dyn ContentInjector>,
    indicator: Arc<dyn IndicatorSurface>,
    config_store: Arc<dyn KeyValueStore>,
    registry_store: RegistryStore,
    lock: AdvisoryLock,
    snapshot: Snapshot,
    options: ArcSwap<Options>,
    pending_urls: AtomicUsize,
    active_tab: AtomicI64,
}

impl LockEngine {
    /// Create an engine wired to the given host collaborators.
    ///
    /// The engine starts with default options and an empty registry; call
    /// [`initialize`](Self::initialize) before delivering events.
    pub fn new(
        tabs: Arc<dyn TabProvider>,
        store: Arc<dyn KeyValueStore>,
        injector: Arc<dyn ContentInjector>,
        indicator: Arc<dyn IndicatorSurface>,
    ) -> Arc<Self> {
        Arc::new(Self {
            tabs,
            injector,
            indicator,
            registry_store: RegistryStore::new(Arc::clone(&store)),
            config_store: store,
            lock: AdvisoryLock::new(),
            snapshot: Snapshot::new(),
            options: ArcSwap::from_pointee(Options::default()),
            pending_urls: AtomicUsize::new(0),
            active_tab: AtomicI64::new(NO_ACTIVE_TAB),
        })
    }

    /// Startup transaction. Runs once, before any event is delivered.
    ///
    /// Loads the options (persisting defaults for missing keys), then
    /// builds the session's registry: with auto-lock enabled every
    /// currently pinned tab is locked, otherwise the registry starts
    /// empty. The result is written unconditionally (the registry is
    /// session state and is not carried across restarts) and the snapshot
    /// and indicator follow.
    pub async fn initialize(&self) -> Result<()> {
        let options = Options::load(self.config_store.as_ref()).await?;
        self.options.store(Arc::new(options));

        let guard = self.lock.acquire("initialize").await?;
        let mut registry = LockRegistry::new();
        if options.auto_lock_pinned {
            for tab in self.tabs.list_tabs().await? {
                if tab.pinned {
                    self.lock_tab(&mut registry, tab.id, tab.url.as_deref()).await;
                }
            }
        }
        self.commit(registry).await?;
        guard.release();

        self.refresh_indicator().await
    }

    /// The current options.
    pub fn options(&self) -> Options {
        **self.options.load()
    }

    /// The current snapshot view, as the interception hook sees it.
    pub fn snapshot_view(&self) -> Arc<LockRegistry> {
        self.snapshot.load()
    }

    /// Number of locked tabs still awaiting URL resolution.
    pub fn pending_urls(&self) -> usize {
        self.pending_urls.load(Ordering::Relaxed)
    }

    pub(crate) fn active_tab(&self) -> Option<TabId> {
        TabId::from_raw(self.active_tab.load(Ordering::Relaxed))
    }

    pub(crate) fn set_active_tab(&self, tab: TabId) {
        self.active_tab.store(tab.raw(), Ordering::Relaxed);
    }

    /// Insert a lock entry for `tab`, installing the page guard when the
    /// URL is known and scriptable.
    pub(crate) async fn lock_tab(
        &self,
        registry: &mut LockRegistry,
        tab: TabId,
        url: Option<&str>,
    ) {
        registry.lock(tab, LockEntry::for_url(url));
        if let Some(url) = url {
            self.install_guard(tab, url).await;
        }
    }

    /// Remove `tab`'s entry and its page guard. Returns whether an entry
    /// existed.
    pub(crate) async fn unlock_tab(
        &self,
        registry: &mut LockRegistry,
        tab: TabId,
        url: Option<&str>,
    ) -> bool {
        match registry.discard(tab) {
            Some(entry) => {
                if let Some(url) = url.or_else(|| entry.url()) {
                    self.remove_guard(tab, url).await;
                }
                true
            }
            None => false,
        }
    }

    /// Persist `registry`, publish it to the snapshot, and refresh the
    /// pending-URL counter from the committed value.
    ///
    /// Must run inside an advisory-lock transaction. If the write fails,
    /// the snapshot and counter are left untouched, so both keep
    /// reflecting the last transaction that actually completed.
    pub(crate) async fn commit(&self, registry: LockRegistry) -> Result<()> {
        self.registry_store.save(&registry).await?;
        self.pending_urls
            .store(registry.pending_count(), Ordering::Relaxed);
        self.snapshot.publish(registry);
        Ok(())
    }

    pub(crate) async fn install_guard(&self, tab: TabId, url: &str) {
        if !scriptable_url(url) {
            return;
        }
        if let Err(err) = self.injector.run_in_tab(tab, INSTALL_GUARD_SRC).await {
            warn!(%tab, error = %err, "guard install failed");
        }
    }

    pub(crate) async fn remove_guard(&self, tab: TabId, url: &str) {
        if !scriptable_url(url) {
            return;
        }
        if let Err(err) = self.injector.run_in_tab(tab, REMOVE_GUARD_SRC).await {
            warn!(%tab, error = %err, "guard removal failed");
        }
    }
}
