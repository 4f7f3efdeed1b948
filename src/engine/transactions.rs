//! Registry transactions driven by host tab events.

use std::sync::Arc;
use tracing::debug;

use super::LockEngine;
use crate::config;
use crate::error::Result;
use crate::host::{
    InboundMessage, IndicatorState, LoadStatus, OptionPatch, TabChange, TabId, TabInfo,
};
use crate::registry::LockEntry;

impl LockEngine {
    /// A tab was created.
    ///
    /// New tabs are never pre-locked, so no transaction is needed; an
    /// active newcomer just forces the indicator to unlocked.
    pub async fn on_tab_created(&self, tab: &TabInfo) -> Result<()> {
        if tab.active {
            self.set_active_tab(tab.id);
            self.apply_indicator(IndicatorState::Unlocked).await?;
        }
        Ok(())
    }

    /// A tab's pin state and/or load status changed.
    ///
    /// One transaction covers both concerns: the pin transition (when
    /// auto-lock is enabled) and load completion resolving a pending URL.
    /// The registry is persisted only when one of them actually mutated
    /// it.
    pub async fn on_tab_updated(
        &self,
        tab_id: TabId,
        change: &TabChange,
        tab: &TabInfo,
    ) -> Result<()> {
        let options = self.options();
        let guard = self.lock.acquire("tab_update").await?;
        let mut registry = self.registry_store.load().await?;
        let mut changed = false;

        if options.auto_lock_pinned
            && let Some(pinned) = change.pinned
        {
            if pinned {
                // Pinning an already-locked tab stays a no-op so the page
                // guard is not injected twice.
                if !registry.is_locked(tab_id) {
                    self.lock_tab(&mut registry, tab_id, tab.url.as_deref()).await;
                    changed = true;
                }
            } else if self.unlock_tab(&mut registry, tab_id, tab.url.as_deref()).await {
                changed = true;
            }
        }

        if change.status == Some(LoadStatus::Complete)
            && let Some(url) = change.url.as_deref().or(tab.url.as_deref())
        {
            // The counter is the committed fast path; `changed` covers an
            // entry this same transaction just inserted.
            if (self.pending_urls() > 0 || changed)
                && registry.entry(tab_id).is_some_and(LockEntry::is_pending)
            {
                registry.lock(tab_id, LockEntry::for_url(Some(url)));
                self.install_guard(tab_id, url).await;
                changed = true;
            } else if registry.is_locked(tab_id) {
                // A locked page finished loading again (e.g. a refresh).
                // Page loads shed injected scripts, so reinstall the guard.
                self.install_guard(tab_id, url).await;
            }
        }

        if changed {
            debug!(%tab_id, "tab update committed");
            self.commit(registry).await?;
        }
        drop(guard);

        if changed {
            self.refresh_indicator().await?;
        }
        Ok(())
    }

    /// A tab closed. Its entry is discarded unconditionally; discarding a
    /// tab that was never locked is a no-op.
    pub async fn on_tab_removed(&self, tab_id: TabId) -> Result<()> {
        let guard = self.lock.acquire("tab_removed").await?;
        let mut registry = self.registry_store.load().await?;

        let changed = registry.discard(tab_id).is_some();

        if changed {
            debug!(%tab_id, "removed tab's entry cleared");
            self.commit(registry).await?;
        }
        drop(guard);

        if changed {
            self.refresh_indicator().await?;
        }
        Ok(())
    }

    /// Toggle the lock on the given tab (the user-invoked action).
    ///
    /// The caller already knows the outcome, so the indicator is set
    /// directly instead of waiting for a full reflector pass.
    pub async fn toggle_lock(&self, tab: &TabInfo) -> Result<()> {
        let guard = self.lock.acquire("toggle_lock").await?;
        let mut registry = self.registry_store.load().await?;

        let state = if registry.is_locked(tab.id) {
            self.unlock_tab(&mut registry, tab.id, tab.url.as_deref()).await;
            IndicatorState::Unlocked
        } else {
            self.lock_tab(&mut registry, tab.id, tab.url.as_deref()).await;
            IndicatorState::Locked
        };

        self.commit(registry).await?;
        drop(guard);

        self.apply_indicator(state).await
    }

    /// The active tab changed.
    pub async fn on_active_tab_changed(&self, tab_id: TabId) -> Result<()> {
        self.set_active_tab(tab_id);
        self.refresh_indicator().await
    }

    /// Window focus moved. `active` is the focused window's active tab,
    /// or `None` when focus left the browser entirely.
    pub async fn on_window_focus_changed(&self, active: Option<TabId>) -> Result<()> {
        if let Some(tab_id) = active {
            self.set_active_tab(tab_id);
            self.refresh_indicator().await?;
        }
        Ok(())
    }

    /// Dispatch an inbound message from a page or the settings surface.
    pub async fn handle_message(&self, message: InboundMessage) -> Result<()> {
        match message {
            InboundMessage::LinkClicked { tab, url } => self.on_link_clicked(tab, &url).await,
            InboundMessage::OptionChanged(patch) => self.apply_option(patch).await,
        }
    }

    async fn apply_option(&self, patch: OptionPatch) -> Result<()> {
        let mut options = self.options();
        let (key, value) = options.apply(patch);
        self.options.store(Arc::new(options));
        config::persist_flag(self.config_store.as_ref(), key, value).await?;

        // Icon decoration switching off resets the indicator to neutral;
        // switching on re-derives it for the active tab.
        if let OptionPatch::LockIcon(enabled) = patch {
            if enabled {
                self.refresh_indicator().await?;
            } else {
                self.indicator
                    .set_indicator(IndicatorState::Unlocked)
                    .await?;
            }
        }
        Ok(())
    }
}
