//! The two-state visual lock indicator.

use async_trait::async_trait;

use crate::error::Result;

/// State of the lock indicator for the active tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    /// The active tab is locked.
    Locked,
    /// The active tab is not locked.
    Unlocked,
}

/// Host surface showing the lock indicator.
#[async_trait]
pub trait IndicatorSurface: Send + Sync {
    /// Set the indicator for the currently active tab.
    async fn set_indicator(&self, state: IndicatorState) -> Result<()>;
}
