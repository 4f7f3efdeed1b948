//! tablock: a coordination engine that keeps locked browser tabs from
//! navigating away.
//!
//! The engine maintains a per-tab lock registry for a browsing session and
//! reconciles it across two very different consumers: an asynchronous,
//! eventually-consistent key-value store (the registry's persistence), and
//! a synchronous navigation-interception hook that must answer within the
//! same call and therefore can never wait on the store.
//!
//! # Architecture
//!
//! - [`lock`]: an advisory mutual-exclusion primitive built from polling,
//!   with RAII release (the store offers no locking of its own).
//! - [`registry`]: the per-tab lock model, its whole-blob persistence, and
//!   the synchronous snapshot mirror.
//! - [`engine`]: the coordinator. Tab events run read-modify-write
//!   transactions under the advisory lock; the interception hook renders
//!   its verdict against the snapshot and, on a veto, compensates by
//!   re-homing the navigation and restoring the locked tab.
//! - [`host`]: contracts for everything the engine needs from the host
//!   shell (tabs, store, injection, indicator, messages).
//! - [`config`]: the four option flags and their persistence.
//!
//! The host shell owns the event loop: it delivers tab events to the
//! engine's `on_*` handlers, routes messages into
//! [`engine::LockEngine::handle_message`], and calls
//! [`engine::LockEngine::intercept`] from its navigation hook.

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod lock;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;
