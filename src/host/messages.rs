//! Inbound messages from pages and the settings surface.

use serde::{Deserialize, Serialize};

use super::tabs::TabId;

/// One settings flag changing value.
///
/// The settings surface broadcasts a single field per message, mirroring
/// the single-key write it makes to the store. The wire names match the
/// storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionPatch {
    /// Icon decoration on or off.
    LockIcon(bool),
    /// Suppress the compensating new tab after a veto.
    BlockOpen(bool),
    /// Open the compensating tab without focus.
    BackgroundOpen(bool),
    /// Lock tabs on pin, unlock on unpin.
    AutoLock(bool),
}

/// A message delivered to the engine over the host's message channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InboundMessage {
    /// A locked page's guard suppressed a link activation and reports the
    /// target URL. The host shell fills in the sender's tab id.
    LinkClicked { tab: TabId, url: String },

    /// A settings flag changed.
    OptionChanged(OptionPatch),
}
