//! Lock entry and registry data model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::host::TabId;

/// Lock state stored for one tab.
///
/// An unlocked tab has no entry at all, so the registry only ever holds
/// the two locked variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LockEntry {
    /// Locked before the tab's URL is known. Transient: resolves once the
    /// tab finishes loading, or is discarded if the tab unlocks or closes
    /// first.
    UrlPending,

    /// Locked to a specific page.
    UrlKnown {
        /// The URL the tab is locked to.
        url: String,
    },
}

impl LockEntry {
    /// Build the entry for a tab whose URL may not be known yet.
    pub fn for_url(url: Option<&str>) -> Self {
        match url {
            Some(url) => Self::UrlKnown {
                url: url.to_string(),
            },
            None => Self::UrlPending,
        }
    }

    /// The locked URL, if resolved.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::UrlKnown { url } => Some(url),
            Self::UrlPending => None,
        }
    }

    /// Whether this entry is still awaiting URL resolution.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::UrlPending)
    }
}

/// The full tab-to-lock mapping, persisted as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockRegistry {
    entries: BTreeMap<TabId, LockEntry>,
}

impl LockRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for one tab.
    pub fn entry(&self, tab: TabId) -> Option<&LockEntry> {
        self.entries.get(&tab)
    }

    /// Whether the tab has any locked entry.
    pub fn is_locked(&self, tab: TabId) -> bool {
        self.entries.contains_key(&tab)
    }

    /// Insert or replace a tab's entry.
    pub fn lock(&mut self, tab: TabId, entry: LockEntry) {
        self.entries.insert(tab, entry);
    }

    /// Remove a tab's entry, returning it when one existed.
    pub fn discard(&mut self, tab: TabId) -> Option<LockEntry> {
        self.entries.remove(&tab)
    }

    /// Number of entries still awaiting URL resolution.
    pub fn pending_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_pending()).count()
    }

    /// Number of locked tabs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tab is locked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (TabId, &LockEntry)> {
        self.entries.iter().map(|(tab, entry)| (*tab, entry))
    }
}
