//! Content-script injection contract and the navigation guard sources.
//!
//! Locked pages carry a small in-page guard that captures link activations
//! and reports them to the engine instead of letting the page navigate.
//! Only the call contract matters here; the page-side mechanics belong to
//! the host shell.

use async_trait::async_trait;
use url::Url;

use super::tabs::TabId;
use crate::error::Result;

/// Page-side source installed in a locked tab.
///
/// Captures link clicks in the capture phase and reports the target
/// instead of navigating. Idempotent: reinstalling over a live guard is a
/// no-op.
pub const INSTALL_GUARD_SRC: &str = r#"(() => {
  if (window.__tablockGuard) { return; }
  window.__tablockGuard = (event) => {
    const anchor = event.target.closest && event.target.closest('a[href]');
    if (!anchor) { return; }
    event.preventDefault();
    event.stopPropagation();
    chrome.runtime.sendMessage({ linkClicked: anchor.href });
  };
  document.addEventListener('click', window.__tablockGuard, true);
})();"#;

/// Page-side source that removes a previously installed guard.
pub const REMOVE_GUARD_SRC: &str = r#"(() => {
  if (!window.__tablockGuard) { return; }
  document.removeEventListener('click', window.__tablockGuard, true);
  delete window.__tablockGuard;
})();"#;

/// Runs source text in a tab's page context.
#[async_trait]
pub trait ContentInjector: Send + Sync {
    /// Execute `source` in the page belonging to `tab`.
    async fn run_in_tab(&self, tab: TabId, source: &str) -> Result<()>;
}

/// Whether a page can host the navigation guard.
///
/// Internal and browser-owned pages are not scriptable and are never
/// injected into.
pub fn scriptable_url(url: &str) -> bool {
    matches!(Url::parse(url), Ok(parsed) if matches!(parsed.scheme(), "http" | "https"))
}
