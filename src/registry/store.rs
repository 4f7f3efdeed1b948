//! Persistence adapter for the registry blob.

use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use super::types::LockRegistry;
use crate::error::{Result, TabLockError};
use crate::host::KeyValueStore;

/// Storage key for the registry blob.
pub const REGISTRY_KEY: &str = "lockedTabs";

/// Write attempts before a storage failure surfaces to the caller.
const WRITE_ATTEMPTS: u32 = 3;

/// Delay between write attempts.
const WRITE_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Reads and writes the registry as one blob value.
///
/// Always used from inside an advisory-lock transaction; the adapter
/// itself performs no locking.
#[derive(Clone)]
pub struct RegistryStore {
    store: Arc<dyn KeyValueStore>,
}

impl RegistryStore {
    /// Wrap the host's key-value store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the persisted registry.
    ///
    /// A missing value is the empty registry. A value that fails to parse
    /// is also treated as empty: the registry is session state, not a
    /// source of truth worth refusing to start over.
    pub async fn load(&self) -> Result<LockRegistry> {
        match self.store.get(REGISTRY_KEY).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(registry) => Ok(registry),
                Err(err) => {
                    warn!(error = %err, "discarding unparseable registry blob");
                    Ok(LockRegistry::new())
                }
            },
            None => Ok(LockRegistry::new()),
        }
    }

    /// Persist the registry, retrying transient store failures.
    ///
    /// Each failed attempt is logged; after [`WRITE_ATTEMPTS`] the last
    /// error surfaces to the caller, whose lock guard still releases
    /// normally.
    pub async fn save(&self, registry: &LockRegistry) -> Result<()> {
        let blob = serde_json::to_string(registry).map_err(|e| {
            TabLockError::Storage(format!("failed to serialize registry: {}", e))
        })?;

        let mut last_err = None;
        for attempt in 1..=WRITE_ATTEMPTS {
            match self.store.set(REGISTRY_KEY, &blob).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!(attempt, error = %err, "registry write failed");
                    last_err = Some(err);
                    if attempt < WRITE_ATTEMPTS {
                        tokio::time::sleep(WRITE_RETRY_DELAY).await;
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            TabLockError::Storage("registry write failed with no attempts made".to_string())
        }))
    }
}
