//! Advisory locking for registry transactions.
//!
//! The persistent store offers no locking primitive, so mutual exclusion
//! over the registry is emulated in process: one [`AdvisoryLock`]
//! serializes every read-modify-write transaction. Acquisition polls
//! `try_lock` every [`RETRY_DELAY`] rather than queueing, so the lock is
//! advisory (no fairness between contenders), while the RAII
//! [`LockGuard`] guarantees release on every exit path, errors included.
//!
//! # Holder Metadata
//!
//! Each successful acquisition records [`HoldInfo`]: the action being
//! performed and when it started. A contender that exhausts its retry
//! ceiling fails with a starvation error naming the holder and its age.

mod guard;
mod metadata;

#[cfg(test)]
mod tests;

pub use guard::LockGuard;
pub use metadata::HoldInfo;

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;

use crate::error::{Result, TabLockError};

/// Delay between acquisition attempts.
pub const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Acquisition attempts before starvation is reported.
pub const MAX_ATTEMPTS: u32 = 50;

/// Cooperative mutual exclusion for registry transactions.
///
/// Clones share the same lock.
#[derive(Debug, Clone)]
pub struct AdvisoryLock {
    inner: Arc<AsyncMutex<()>>,
    holder: Arc<Mutex<Option<HoldInfo>>>,
}

impl AdvisoryLock {
    /// Create a free lock.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AsyncMutex::new(())),
            holder: Arc::new(Mutex::new(None)),
        }
    }

    /// Acquire the lock on behalf of `action`.
    ///
    /// Polls every [`RETRY_DELAY`] while another transaction holds the
    /// lock. Contenders are not queued: under contention, acquisition
    /// order is unrelated to request order.
    ///
    /// # Errors
    ///
    /// [`TabLockError::LockStarved`] after [`MAX_ATTEMPTS`] failed polls,
    /// naming the current holder.
    pub async fn acquire(&self, action: &str) -> Result<LockGuard> {
        for attempt in 0..MAX_ATTEMPTS {
            if let Ok(permit) = Arc::clone(&self.inner).try_lock_owned() {
                let holder = Arc::clone(&self.holder);
                *holder.lock().unwrap_or_else(|poison| poison.into_inner()) =
                    Some(HoldInfo::new(action));
                return Ok(LockGuard::new(permit, holder));
            }
            if attempt + 1 < MAX_ATTEMPTS {
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }

        let held_by = match self.holder() {
            Some(info) => format!("held by {}", info),
            None => "contended".to_string(),
        };
        Err(TabLockError::LockStarved(format!(
            "'{}' gave up after {} attempts ({})",
            action, MAX_ATTEMPTS, held_by
        )))
    }

    /// Metadata for the current holder, if the lock is held.
    pub fn holder(&self) -> Option<HoldInfo> {
        self.holder
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }
}

impl Default for AdvisoryLock {
    fn default() -> Self {
        Self::new()
    }
}
