//! Holder metadata for the advisory lock.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata about the transaction currently holding the advisory lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldInfo {
    /// The action being performed (initialize, tab_update, toggle_lock, ...).
    pub action: String,

    /// When the lock was acquired.
    pub acquired_at: DateTime<Utc>,
}

impl HoldInfo {
    /// Record a holder starting now.
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_string(),
            acquired_at: Utc::now(),
        }
    }

    /// How long the holder has held the lock.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.acquired_at)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let millis = self.age().num_milliseconds();
        if millis < 1_000 {
            format!("{}ms", millis.max(0))
        } else if millis < 60_000 {
            format!("{}s", millis / 1_000)
        } else {
            format!("{}m", millis / 60_000)
        }
    }
}

impl fmt::Display for HoldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' for {}", self.action, self.age_string())
    }
}
