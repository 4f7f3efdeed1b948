//! Shared test fixtures: in-memory host collaborators and an engine
//! wiring helper.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::engine::LockEngine;
use crate::error::{Result, TabLockError};
use crate::host::{
    ContentInjector, INSTALL_GUARD_SRC, IndicatorState, IndicatorSurface, KeyValueStore,
    REMOVE_GUARD_SRC, TabId, TabInfo, TabProvider,
};

/// In-memory key-value store with injectable write failures.
#[derive(Default)]
pub(crate) struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    failing_sets: AtomicUsize,
    set_calls: AtomicUsize,
}

impl MemoryStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn seed(&self, key: &str, value: &str) {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
    }

    pub(crate) async fn value(&self, key: &str) -> Option<String> {
        self.values.lock().await.get(key).cloned()
    }

    /// Make the next `n` writes fail.
    pub(crate) fn fail_next_sets(&self, n: usize) {
        self.failing_sets.store(n, Ordering::SeqCst);
    }

    /// Number of write attempts seen so far.
    pub(crate) fn sets(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing_sets.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_sets.store(failing - 1, Ordering::SeqCst);
            return Err(TabLockError::Storage(format!(
                "injected failure writing '{}'",
                key
            )));
        }
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Scripted tab surface: a mutable tab list plus recorded commands.
#[derive(Default)]
pub(crate) struct ScriptedTabs {
    tabs: Mutex<Vec<TabInfo>>,
    created: Mutex<Vec<(String, bool)>>,
    back_steps: Mutex<Vec<TabId>>,
    back_landings: Mutex<HashMap<TabId, VecDeque<String>>>,
    next_created_id: AtomicI64,
}

impl ScriptedTabs {
    pub(crate) fn new(tabs: Vec<TabInfo>) -> Arc<Self> {
        Arc::new(Self {
            tabs: Mutex::new(tabs),
            next_created_id: AtomicI64::new(1000),
            ..Default::default()
        })
    }

    /// `(url, active)` pairs passed to `create_tab`, in order.
    pub(crate) async fn created(&self) -> Vec<(String, bool)> {
        self.created.lock().await.clone()
    }

    /// How many back-navigations were issued for `tab`.
    pub(crate) async fn back_steps(&self, tab: TabId) -> usize {
        self.back_steps
            .lock()
            .await
            .iter()
            .filter(|stepped| **stepped == tab)
            .count()
    }

    /// Queue the URL the next back step lands `tab` on. With no queued
    /// landing, a back step leaves the tab's URL unchanged.
    pub(crate) async fn queue_back_landing(&self, tab: TabId, url: &str) {
        self.back_landings
            .lock()
            .await
            .entry(tab)
            .or_default()
            .push_back(url.to_string());
    }

    pub(crate) async fn set_tab_url(&self, tab: TabId, url: &str) {
        if let Some(info) = self.tabs.lock().await.iter_mut().find(|t| t.id == tab) {
            info.url = Some(url.to_string());
        }
    }

    pub(crate) async fn close_tab(&self, tab: TabId) {
        self.tabs.lock().await.retain(|t| t.id != tab);
    }
}

#[async_trait]
impl TabProvider for ScriptedTabs {
    async fn list_tabs(&self) -> Result<Vec<TabInfo>> {
        Ok(self.tabs.lock().await.clone())
    }

    async fn tab_info(&self, tab: TabId) -> Result<Option<TabInfo>> {
        Ok(self.tabs.lock().await.iter().find(|t| t.id == tab).cloned())
    }

    async fn create_tab(&self, url: &str, active: bool) -> Result<TabId> {
        self.created.lock().await.push((url.to_string(), active));
        let id = TabId::from_raw(self.next_created_id.fetch_add(1, Ordering::SeqCst))
            .expect("scripted ids are non-negative");
        self.tabs.lock().await.push(TabInfo {
            id,
            pinned: false,
            url: Some(url.to_string()),
            active,
        });
        Ok(id)
    }

    async fn navigate_back(&self, tab: TabId) -> Result<()> {
        self.back_steps.lock().await.push(tab);
        let landing = self
            .back_landings
            .lock()
            .await
            .get_mut(&tab)
            .and_then(VecDeque::pop_front);
        if let Some(url) = landing {
            self.set_tab_url(tab, &url).await;
        }
        Ok(())
    }
}

/// Records every injection, keyed by guard source.
#[derive(Default)]
pub(crate) struct RecordingInjector {
    runs: Mutex<Vec<(TabId, String)>>,
}

impl RecordingInjector {
    pub(crate) async fn installs(&self, tab: TabId) -> usize {
        self.count(tab, INSTALL_GUARD_SRC).await
    }

    pub(crate) async fn removals(&self, tab: TabId) -> usize {
        self.count(tab, REMOVE_GUARD_SRC).await
    }

    async fn count(&self, tab: TabId, source: &str) -> usize {
        self.runs
            .lock()
            .await
            .iter()
            .filter(|(ran, src)| *ran == tab && src == source)
            .count()
    }
}

#[async_trait]
impl ContentInjector for RecordingInjector {
    async fn run_in_tab(&self, tab: TabId, source: &str) -> Result<()> {
        self.runs.lock().await.push((tab, source.to_string()));
        Ok(())
    }
}

/// Records every indicator state pushed to the host.
#[derive(Default)]
pub(crate) struct RecordingIndicator {
    states: Mutex<Vec<IndicatorState>>,
}

impl RecordingIndicator {
    pub(crate) async fn states(&self) -> Vec<IndicatorState> {
        self.states.lock().await.clone()
    }

    pub(crate) async fn last(&self) -> Option<IndicatorState> {
        self.states.lock().await.last().copied()
    }
}

#[async_trait]
impl IndicatorSurface for RecordingIndicator {
    async fn set_indicator(&self, state: IndicatorState) -> Result<()> {
        self.states.lock().await.push(state);
        Ok(())
    }
}

/// An engine wired to fresh in-memory collaborators.
pub(crate) struct Fixture {
    pub(crate) engine: Arc<LockEngine>,
    pub(crate) store: Arc<MemoryStore>,
    pub(crate) tabs: Arc<ScriptedTabs>,
    pub(crate) injector: Arc<RecordingInjector>,
    pub(crate) indicator: Arc<RecordingIndicator>,
}

pub(crate) fn fixture(tabs: Vec<TabInfo>) -> Fixture {
    let store = MemoryStore::new();
    let tabs = ScriptedTabs::new(tabs);
    let injector = Arc::new(RecordingInjector::default());
    let indicator = Arc::new(RecordingIndicator::default());
    let engine = LockEngine::new(
        Arc::clone(&tabs) as Arc<dyn TabProvider>,
        Arc::clone(&store) as Arc<dyn KeyValueStore>,
        Arc::clone(&injector) as Arc<dyn ContentInjector>,
        Arc::clone(&indicator) as Arc<dyn IndicatorSurface>,
    );
    Fixture {
        engine,
        store,
        tabs,
        injector,
        indicator,
    }
}

/// Shorthand for building a [`TabInfo`].
pub(crate) fn tab(id: i64, pinned: bool, url: Option<&str>, active: bool) -> TabInfo {
    TabInfo {
        id: tab_id(id),
        pinned,
        url: url.map(str::to_string),
        active,
    }
}

/// Shorthand for a known-valid [`TabId`].
pub(crate) fn tab_id(id: i64) -> TabId {
    TabId::from_raw(id).expect("test tab ids are non-negative")
}
