//! Cooperative async hashing for tokio.
//!
//! The work runs on the calling task in 100ms slices with a `yield_now` between them, so a
//! current-thread runtime keeps serving other tasks while a high-cost hash is in flight.
//! Dropping the future abandons the computation.

use crate::error::Result;
use crate::hash::{comparable_salt, start_job, SaltSource};
use crate::password::secure_compare;
use crate::rounds::{Digest, RoundJob, Step, SLICE_BUDGET};

async fn drive<F>(mut job: RoundJob, mut progress: F) -> Digest
where
    F: FnMut(f64),
{
    loop {
        progress(job.progress());
        match job.resume(SLICE_BUDGET) {
            Step::Done(digest) => return digest,
            Step::InProgress(_) => tokio::task::yield_now().await,
        }
    }
}

/// Hashes `password`, yielding to the scheduler between slices.
///
/// `progress` receives `0.0` before any work and `1.0` once the last iteration is done.
pub async fn hash_async<'a, F>(
    password: &str,
    salt: impl Into<SaltSource<'a>>,
    progress: F,
) -> Result<String>
where
    F: FnMut(f64),
{
    let (descriptor, job) = start_job(password, salt.into())?;
    let digest = drive(job, progress).await;
    Ok(descriptor.render_hash(digest.as_bytes()))
}

/// Checks `password` against a stored hash without blocking the runtime.
///
/// As with [`crate::compare`], a hash that is not 60 characters long never matches.
pub async fn compare_async<F>(password: &str, hash: &str, progress: F) -> Result<bool>
where
    F: FnMut(f64),
{
    let Some(salt) = comparable_salt(hash)? else {
        return Ok(false);
    };
    let computed = hash_async(password, SaltSource::Text(salt), progress).await?;
    Ok(secure_compare(&computed, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = "$2b$04$sRGA4TWhH5mDd1NLjcD5E.fugCHhjb5jUh36MD0KhS8mN8F/bG4Tm";

    #[tokio::test]
    async fn test_hash_async_matches_blocking() {
        let hashed = hash_async("hello", "$2b$04$sRGA4TWhH5mDd1NLjcD5E.", |_| {})
            .await
            .unwrap();
        assert_eq!(hashed, HELLO);
    }

    #[tokio::test]
    async fn test_compare_async() {
        assert!(compare_async("hello", HELLO, |_| {}).await.unwrap());
        assert!(!compare_async("world", HELLO, |_| {}).await.unwrap());
        assert!(!compare_async("hello", "short", |_| {}).await.unwrap());
    }
}
