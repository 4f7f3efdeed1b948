//! Engine options and their persistence.
//!
//! Four independent boolean flags control icon decoration and veto
//! behavior. They are loaded once at startup (a flag with no stored entry
//! takes its default and is written back, so a fresh profile ends up fully
//! populated) and mutated afterward only by single-field patches from the
//! settings surface.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabLockError};
use crate::host::{KeyValueStore, OptionPatch};

/// Storage key for the icon decoration flag.
pub const LOCK_ICON_KEY: &str = "lockIcon";

/// Storage key for the suppress-compensating-tab flag.
pub const BLOCK_OPEN_KEY: &str = "blockOpen";

/// Storage key for the background-open flag.
pub const BACKGROUND_OPEN_KEY: &str = "backgroundOpen";

/// Storage key for the auto-lock-on-pin flag.
pub const AUTO_LOCK_KEY: &str = "autoLock";

/// Engine options.
///
/// Each field persists under its own storage key as a JSON boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Decorate the toolbar icon with the active tab's lock state.
    #[serde(default = "default_true")]
    pub show_lock_icon: bool,

    /// Drop vetoed navigations instead of opening them in a new tab.
    #[serde(default)]
    pub block_external_open: bool,

    /// Open the compensating tab without giving it focus.
    #[serde(default)]
    pub open_in_background: bool,

    /// Lock tabs when they are pinned and unlock them when unpinned.
    #[serde(default)]
    pub auto_lock_pinned: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Options {
    fn default() -> Self {
        Self {
            show_lock_icon: true,
            block_external_open: false,
            open_in_background: false,
            auto_lock_pinned: false,
        }
    }
}

impl Options {
    /// Load all four flags from the store.
    ///
    /// A flag with no stored entry takes its default and is written back,
    /// so the settings surface always finds populated entries.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            show_lock_icon: load_flag(store, LOCK_ICON_KEY, defaults.show_lock_icon).await?,
            block_external_open: load_flag(store, BLOCK_OPEN_KEY, defaults.block_external_open)
                .await?,
            open_in_background: load_flag(store, BACKGROUND_OPEN_KEY, defaults.open_in_background)
                .await?,
            auto_lock_pinned: load_flag(store, AUTO_LOCK_KEY, defaults.auto_lock_pinned).await?,
        })
    }

    /// Apply a single-field patch.
    ///
    /// Returns the storage key and new value for the caller to persist.
    pub fn apply(&mut self, patch: OptionPatch) -> (&'static str, bool) {
        match patch {
            OptionPatch::LockIcon(value) => {
                self.show_lock_icon = value;
                (LOCK_ICON_KEY, value)
            }
            OptionPatch::BlockOpen(value) => {
                self.block_external_open = value;
                (BLOCK_OPEN_KEY, value)
            }
            OptionPatch::BackgroundOpen(value) => {
                self.open_in_background = value;
                (BACKGROUND_OPEN_KEY, value)
            }
            OptionPatch::AutoLock(value) => {
                self.auto_lock_pinned = value;
                (AUTO_LOCK_KEY, value)
            }
        }
    }
}

/// Persist one flag as a JSON boolean.
pub(crate) async fn persist_flag(store: &dyn KeyValueStore, key: &str, value: bool) -> Result<()> {
    store.set(key, if value { "true" } else { "false" }).await
}

async fn load_flag(store: &dyn KeyValueStore, key: &str, default: bool) -> Result<bool> {
    match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| {
            TabLockError::Storage(format!("failed to parse option '{}': {}", key, e))
        }),
        None => {
            persist_flag(store, key, default).await?;
            Ok(default)
        }
    }
}
