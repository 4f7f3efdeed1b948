//! Tab identity, metadata, and the tab command surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Identifier of a tab, assigned by the host.
///
/// Ids are small non-negative integers, unique only while the tab exists;
/// the host may reuse an id after the tab closes. Host-internal requests
/// (prefetches, requests not associated with a visible tab) carry negative
/// ids and never refer to a tab, so construction goes through
/// [`from_raw`](TabId::from_raw).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(i64);

impl TabId {
    /// Validate a raw host identifier.
    ///
    /// Returns `None` for ids that do not refer to a visible tab.
    pub fn from_raw(raw: i64) -> Option<Self> {
        (raw >= 0).then_some(Self(raw))
    }

    /// The raw host identifier.
    pub fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One open tab as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    /// The tab's identifier.
    pub id: TabId,

    /// Whether the tab is pinned.
    pub pinned: bool,

    /// The tab's URL, absent while its first page is still loading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Whether the tab is the active one in its window.
    pub active: bool,
}

/// Load status carried by a tab-updated event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// The tab started loading a page.
    Loading,
    /// The tab finished loading; its URL is final for this load.
    Complete,
}

/// The delta reported by a tab-updated event.
///
/// Each field is present only when that aspect changed. A single event may
/// carry a pin transition, a load-status change, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabChange {
    /// New pin state, if it changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,

    /// URL associated with the change, if the event carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// New load status, if it changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LoadStatus>,
}

/// Commands the engine issues to the host's tab surface.
#[async_trait]
pub trait TabProvider: Send + Sync {
    /// Enumerate all currently open tabs.
    async fn list_tabs(&self) -> Result<Vec<TabInfo>>;

    /// Look up one tab. `None` if the id is no longer open.
    async fn tab_info(&self, tab: TabId) -> Result<Option<TabInfo>>;

    /// Open a new tab showing `url`; `active` gives it focus.
    async fn create_tab(&self, url: &str, active: bool) -> Result<TabId>;

    /// Navigate the tab one step back in its history.
    async fn navigate_back(&self, tab: TabId) -> Result<()>;
}
