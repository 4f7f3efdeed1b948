//! Navigation interception: the synchronous verdict and the compensating
//! sequence that follows a veto.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::LockEngine;
use crate::error::{Result, TabLockError};
use crate::host::TabId;
use crate::registry::LockEntry;

/// Outcome of a navigation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Let the navigation proceed.
    Allow,
    /// Veto the navigation; the tab stays on its locked page.
    Cancel,
}

/// Settle delay before recovery: the host needs a beat to surface the
/// canceled load before a history step lands reliably.
pub(crate) const RECOVERY_DELAY: Duration = Duration::from_millis(200);

/// Back-navigation attempts before recovery is declared failed.
pub(crate) const RECOVERY_ATTEMPTS: u32 = 3;

/// Delay between a back-navigation and its verification probe.
pub(crate) const RECOVERY_PROBE_DELAY: Duration = Duration::from_millis(100);

impl LockEngine {
    /// Decide a navigation attempt.
    ///
    /// Invoked synchronously by the host on every top-level navigation;
    /// the verdict must come back within the same call, so this consults
    /// only the snapshot, never the store, and never the advisory lock.
    /// The snapshot may trail an in-flight transaction by one store round
    /// trip; the worst outcome is a single navigation judged against the
    /// previous state.
    pub fn decide(&self, raw_tab_id: i64, url: &str) -> Verdict {
        let Some(tab) = TabId::from_raw(raw_tab_id) else {
            // Host-internal request with no visible tab.
            return Verdict::Allow;
        };
        match self.snapshot.entry(tab) {
            None => Verdict::Allow,
            // Not yet enforceable: no resolved URL to mismatch against.
            Some(LockEntry::UrlPending) => Verdict::Allow,
            // In-place refresh of the locked page.
            Some(LockEntry::UrlKnown { url: locked }) if locked == url => Verdict::Allow,
            Some(LockEntry::UrlKnown { .. }) => Verdict::Cancel,
        }
    }

    /// Render a verdict and, on a veto, schedule the compensating
    /// sequence before returning.
    ///
    /// Takes a clone of the engine handle so the compensation task can
    /// outlive the host's interception call.
    pub fn intercept(self: Arc<Self>, raw_tab_id: i64, url: &str) -> Verdict {
        let verdict = self.decide(raw_tab_id, url);
        if verdict == Verdict::Cancel
            && let Some(tab) = TabId::from_raw(raw_tab_id)
        {
            debug!(%tab, url, "navigation vetoed");
            let url = url.to_string();
            tokio::spawn(async move {
                if let Err(err) = self.compensate(tab, &url).await {
                    error!(%tab, error = %err, "post-veto compensation failed");
                }
            });
        }
        verdict
    }

    /// A locked page's guard suppressed a link activation and reported
    /// the target.
    ///
    /// The page never navigated, so a veto here compensates without the
    /// history-recovery step. An unlocked reporter is a stale guard
    /// script and is ignored.
    pub(crate) async fn on_link_clicked(&self, tab: TabId, url: &str) -> Result<()> {
        match self.decide(tab.raw(), url) {
            Verdict::Cancel => self.open_elsewhere(url).await,
            Verdict::Allow => {
                debug!(%tab, url, "ignoring link report from unlocked tab");
                Ok(())
            }
        }
    }

    /// Compensation after a vetoed navigation: hand the URL to a new tab
    /// (unless configured not to) and restore the locked tab.
    pub(crate) async fn compensate(&self, tab: TabId, url: &str) -> Result<()> {
        self.open_elsewhere(url).await?;
        self.recover(tab).await
    }

    /// Open a vetoed URL in a new tab, honoring the open flags.
    async fn open_elsewhere(&self, url: &str) -> Result<()> {
        let options = self.options();
        if options.block_external_open {
            debug!(url, "vetoed navigation dropped");
            return Ok(());
        }
        self.tabs.create_tab(url, !options.open_in_background).await?;
        Ok(())
    }

    /// Restore a locked tab after its navigation was canceled.
    ///
    /// A canceled top-level load can leave the tab showing a failed or
    /// blank page, so after a settle delay the tab is stepped back through
    /// its history and its URL verified against the locked URL. The back
    /// step is retried a bounded number of times; a tab that disappeared
    /// mid-recovery counts as recovered (removal cleanup owns it).
    ///
    /// # Errors
    ///
    /// [`TabLockError::Recovery`] when the tab never returns to its
    /// locked URL. The compensating tab, if any, has already been opened.
    pub(crate) async fn recover(&self, tab: TabId) -> Result<()> {
        let Some(LockEntry::UrlKnown { url: expected }) = self.snapshot.entry(tab) else {
            // Unlocked or still pending by the time recovery ran.
            return Ok(());
        };

        tokio::time::sleep(RECOVERY_DELAY).await;
        for attempt in 1..=RECOVERY_ATTEMPTS {
            self.tabs.navigate_back(tab).await?;
            tokio::time::sleep(RECOVERY_PROBE_DELAY).await;

            match self.tabs.tab_info(tab).await? {
                None => return Ok(()),
                Some(info) if info.url.as_deref() == Some(expected.as_str()) => {
                    if attempt > 1 {
                        debug!(%tab, attempt, "recovery converged");
                    }
                    return Ok(());
                }
                Some(info) => {
                    warn!(
                        %tab,
                        attempt,
                        shows = info.url.as_deref().unwrap_or("<none>"),
                        "recovery probe mismatch"
                    );
                }
            }
        }

        Err(TabLockError::Recovery(format!(
            "tab {} did not return to {} after {} attempts",
            tab, expected, RECOVERY_ATTEMPTS
        )))
    }
}
