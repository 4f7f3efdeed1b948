//! Error types for the tablock engine.
//!
//! Uses thiserror for derive macros and provides actionable error messages.

use thiserror::Error;

/// Main error type for tablock operations.
///
/// The variants mirror the failure taxonomy of the coordination engine:
/// storage round trips, advisory-lock starvation, host command failures,
/// and post-veto recovery that could not be confirmed.
#[derive(Error, Debug)]
pub enum TabLockError {
    /// The persistent key-value store rejected a read or write.
    #[error("storage operation failed: {0}")]
    Storage(String),

    /// The advisory lock could not be acquired within the retry ceiling.
    #[error("lock acquisition failed: {0}")]
    LockStarved(String),

    /// A host command (tab, injector, or indicator surface) failed.
    #[error("host command failed: {0}")]
    Host(String),

    /// A vetoed navigation's recovery step did not restore the locked page.
    #[error("navigation recovery failed: {0}")]
    Recovery(String),
}

/// Result type alias for tablock operations.
pub type Result<T> = std::result::Result<T, TabLockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = TabLockError::Storage("set of 'lockedTabs' rejected".to_string());
        assert_eq!(
            err.to_string(),
            "storage operation failed: set of 'lockedTabs' rejected"
        );

        let err = TabLockError::LockStarved("held by 'pin_transition' for 5s".to_string());
        assert_eq!(
            err.to_string(),
            "lock acquisition failed: held by 'pin_transition' for 5s"
        );
    }

    #[test]
    fn recovery_error_names_the_failure() {
        let err = TabLockError::Recovery("tab 9 still shows https://b.test".to_string());
        assert!(err.to_string().contains("recovery failed"));
        assert!(err.to_string().contains("tab 9"));
    }
}
