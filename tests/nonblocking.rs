#![allow(clippy::unwrap_used)]

//! The async entry points against the blocking ones.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bcrypt_kit::{compare_async, hash, hash_async};

const SALT: &str = "$2a$06$DCq7YPn5Rq63x1Lad4cll.";
const EXPECTED: &str = "$2a$06$DCq7YPn5Rq63x1Lad4cll.TV4S6ytwfsfvkgY8jIucDrjc8deX1s.";

#[tokio::test]
async fn async_hash_matches_published_vector() {
    let mut progress = Vec::new();
    let hashed = hash_async("", SALT, |p| progress.push(p)).await.unwrap();

    assert_eq!(hashed, EXPECTED);
    assert_eq!(progress.first(), Some(&0.0));
    assert_eq!(progress.last(), Some(&1.0));
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn async_and_blocking_agree() {
    let salt = bcrypt_kit::generate_salt(5).unwrap();
    let blocking = hash("same input", salt.as_str()).unwrap();
    let nonblocking = hash_async("same input", salt.as_str(), |_| {}).await.unwrap();
    assert_eq!(blocking, nonblocking);
}

#[tokio::test]
async fn async_errors_surface_through_the_future() {
    let err = hash_async("x", "$2b$40$sRGA4TWhH5mDd1NLjcD5E.", |_| {})
        .await
        .unwrap_err();
    assert_eq!(err, bcrypt_kit::BcryptError::RoundsOutOfRange(40));
}

#[tokio::test]
async fn async_compare() {
    assert!(compare_async("", EXPECTED, |_| {}).await.unwrap());
    assert!(!compare_async("x", EXPECTED, |_| {}).await.unwrap());
}

#[tokio::test(flavor = "current_thread")]
async fn other_tasks_run_while_hashing() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ticks);
    let ticker = tokio::spawn(async move {
        loop {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    });

    // Cost 12 runs for several slices on any realistic machine.
    let salt = "$2b$12$sRGA4TWhH5mDd1NLjcD5E.";
    hash_async("cooperative", salt, |_| {}).await.unwrap();
    ticker.abort();

    assert!(ticks.load(Ordering::SeqCst) > 0);
}
