//! Tests for the advisory lock.

use super::*;
use chrono::Utc;

#[tokio::test(start_paused = true)]
async fn acquire_when_free_succeeds_immediately() {
    let lock = AdvisoryLock::new();

    let guard = lock.acquire("first").await.unwrap();
    assert_eq!(lock.holder().unwrap().action, "first");

    drop(guard);
    assert!(lock.holder().is_none());
}

#[tokio::test(start_paused = true)]
async fn manual_release_frees_the_lock() {
    let lock = AdvisoryLock::new();

    let guard = lock.acquire("toggle_lock").await.unwrap();
    guard.release();

    assert!(lock.holder().is_none());
    lock.acquire("next").await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn contender_waits_until_release() {
    let lock = AdvisoryLock::new();
    let guard = lock.acquire("holder").await.unwrap();

    let contender = {
        let lock = lock.clone();
        tokio::spawn(async move { lock.acquire("contender").await })
    };

    // Let the contender poll a few times against the held lock.
    tokio::time::sleep(RETRY_DELAY * 3).await;
    assert!(!contender.is_finished());

    drop(guard);
    let guard = contender.await.unwrap().unwrap();
    assert_eq!(lock.holder().unwrap().action, "contender");
    drop(guard);
}

#[tokio::test(start_paused = true)]
async fn starvation_surfaces_after_the_retry_ceiling() {
    let lock = AdvisoryLock::new();
    let _guard = lock.acquire("long_transaction").await.unwrap();

    let err = lock.acquire("starved").await.unwrap_err();
    assert!(matches!(err, crate::error::TabLockError::LockStarved(_)));
    assert!(err.to_string().contains("long_transaction"));
    assert!(err.to_string().contains(&MAX_ATTEMPTS.to_string()));
}

#[tokio::test(start_paused = true)]
async fn guard_releases_on_error_paths() {
    async fn failing_transaction(lock: &AdvisoryLock) -> crate::error::Result<()> {
        let _guard = lock.acquire("failing").await?;
        Err(crate::error::TabLockError::Storage(
            "write rejected".to_string(),
        ))
    }

    let lock = AdvisoryLock::new();
    assert!(failing_transaction(&lock).await.is_err());

    assert!(lock.holder().is_none());
    lock.acquire("after_failure").await.unwrap();
}

#[test]
fn hold_info_age_string_scales_with_age() {
    let mut info = HoldInfo::new("test");
    assert!(info.age_string().ends_with("ms"));

    info.acquired_at = Utc::now() - chrono::Duration::seconds(5);
    assert_eq!(info.age_string(), "5s");

    info.acquired_at = Utc::now() - chrono::Duration::minutes(3);
    assert_eq!(info.age_string(), "3m");
}

#[test]
fn hold_info_display_names_the_action() {
    let info = HoldInfo::new("pin_transition");
    let rendered = format!("{}", info);
    assert!(rendered.contains("pin_transition"));
}
