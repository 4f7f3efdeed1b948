//! The persistent key-value store contract.

use async_trait::async_trait;

use crate::error::Result;

/// Asynchronous key-value service backing the registry and the options.
///
/// Values are JSON documents stored as strings. Writes are acknowledged
/// asynchronously and become visible to later reads once the ack arrives;
/// no multi-key atomicity is assumed, which is why the registry travels as
/// a single blob value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read one value.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write one value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
