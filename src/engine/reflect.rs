//! Deriving the visible lock indicator from the registry.

use super::LockEngine;
use crate::error::Result;
use crate::host::{IndicatorState, TabId};
use crate::registry::LockRegistry;

/// Indicator state for one tab: any locked variant shows locked.
pub fn indicator_state(registry: &LockRegistry, tab: TabId) -> IndicatorState {
    if registry.is_locked(tab) {
        IndicatorState::Locked
    } else {
        IndicatorState::Unlocked
    }
}

impl LockEngine {
    /// Re-derive and apply the indicator for the recorded active tab.
    pub(crate) async fn refresh_indicator(&self) -> Result<()> {
        let Some(active) = self.active_tab() else {
            return Ok(());
        };
        let state = indicator_state(&self.snapshot.load(), active);
        self.apply_indicator(state).await
    }

    /// Push an indicator state to the host, unless decoration is off.
    pub(crate) async fn apply_indicator(&self, state: IndicatorState) -> Result<()> {
        if !self.options().show_lock_icon {
            return Ok(());
        }
        self.indicator.set_indicator(state).await
    }
}
