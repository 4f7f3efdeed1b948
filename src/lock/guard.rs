//! RAII guard for the advisory lock.

use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

use super::metadata::HoldInfo;

/// Guard for a held advisory lock.
///
/// Dropping the guard releases the lock and clears the holder record, on
/// every exit path including panics and early error returns. An explicit
/// [`release`](LockGuard::release) exists for call sites that want the
/// release to happen at a named point rather than at scope end.
#[derive(Debug)]
pub struct LockGuard {
    permit: Option<OwnedMutexGuard<()>>,
    holder: Arc<Mutex<Option<HoldInfo>>>,
}

impl LockGuard {
    pub(super) fn new(permit: OwnedMutexGuard<()>, holder: Arc<Mutex<Option<HoldInfo>>>) -> Self {
        Self {
            permit: Some(permit),
            holder,
        }
    }

    /// Release the lock now.
    pub fn release(mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        if let Some(permit) = self.permit.take() {
            *self
                .holder
                .lock()
                .unwrap_or_else(|poison| poison.into_inner()) = None;
            drop(permit);
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.clear();
    }
}
