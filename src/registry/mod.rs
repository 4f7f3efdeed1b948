//! The lock registry: per-tab lock state, its persistence, and the
//! synchronous snapshot consumed by navigation interception.
//!
//! The registry is a whole-value unit: it is read and written as one JSON
//! blob under [`REGISTRY_KEY`], never per tab. Mutations happen only
//! inside advisory-lock transactions (see [`crate::engine`]); after every
//! committed write the [`Snapshot`] is republished so the interception
//! hook always sees the result of the most recently completed transaction.

mod snapshot;
mod store;
mod types;


pub use snapshot::Snapshot;
pub use store::{REGISTRY_KEY, RegistryStore};
pub use types::{LockEntry, LockRegistry};
