//! Blocking hash and compare entry points.

use crate::error::{BcryptError, Result};
use crate::password::{secure_compare, PasswordBytes};
use crate::rounds::{RoundJob, SLICE_BUDGET};
use crate::salt::{self, SaltDescriptor, DEFAULT_COST, HASH_LEN, SALT_TEXT_LEN};

/// Where the salt for a hash comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaltSource<'a> {
    /// Generate a fresh `$2b$` salt with this cost (clamped to 4..=31).
    Cost(u32),
    /// Use an existing salt or hash string; its cost must lie in 4..=31.
    Text(&'a str),
}

impl Default for SaltSource<'_> {
    fn default() -> Self {
        SaltSource::Cost(DEFAULT_COST)
    }
}

impl From<u32> for SaltSource<'_> {
    fn from(cost: u32) -> Self {
        SaltSource::Cost(cost)
    }
}

impl<'a> From<&'a str> for SaltSource<'a> {
    fn from(text: &'a str) -> Self {
        SaltSource::Text(text)
    }
}

/// Resolves the salt, prepares the password and seeds the key schedule.
pub(crate) fn start_job(
    password: &str,
    source: SaltSource<'_>,
) -> Result<(SaltDescriptor, RoundJob)> {
    let descriptor = match source {
        SaltSource::Cost(cost) => SaltDescriptor::parse(&salt::generate_salt(cost)?)?,
        SaltSource::Text(text) => SaltDescriptor::parse(text)?,
    };
    let password = PasswordBytes::prepare(password, descriptor.revision);
    let job = RoundJob::new(&password, &descriptor.salt, descriptor.cost)?;
    Ok((descriptor, job))
}

/// The salt prefix `compare` re-hashes with, or `None` if `hash` cannot match anything.
pub(crate) fn comparable_salt(hash: &str) -> Result<Option<&str>> {
    if hash.len() != HASH_LEN {
        return Ok(None);
    }
    hash.get(..SALT_TEXT_LEN).map(Some).ok_or_else(|| {
        BcryptError::InvalidSaltFormat("salt prefix contains non-ASCII characters".to_string())
    })
}

/// Hashes `password`, blocking until all `2^cost` iterations are done.
pub fn hash<'a>(password: &str, salt: impl Into<SaltSource<'a>>) -> Result<String> {
    let (descriptor, job) = start_job(password, salt.into())?;
    let digest = job.run_to_completion();
    Ok(descriptor.render_hash(digest.as_bytes()))
}

/// Like [`hash`], calling `progress` with the completed fraction between 100ms slices.
pub fn hash_with_progress<'a, F>(
    password: &str,
    salt: impl Into<SaltSource<'a>>,
    progress: F,
) -> Result<String>
where
    F: FnMut(f64),
{
    let (descriptor, job) = start_job(password, salt.into())?;
    let digest = job.run_with_progress(SLICE_BUDGET, progress);
    Ok(descriptor.render_hash(digest.as_bytes()))
}

/// Checks `password` against a stored hash.
///
/// Anything that is not 60 bytes long is reported as a mismatch rather than an error. A
/// 60-byte hash whose salt prefix is not ASCII fails with `InvalidSaltFormat`.
pub fn compare(password: &str, hash: &str) -> Result<bool> {
    let Some(salt) = comparable_salt(hash)? else {
        return Ok(false);
    };
    let computed = self::hash(password, SaltSource::Text(salt))?;
    Ok(secure_compare(&computed, hash))
}

/// Like [`compare`], reporting progress as [`hash_with_progress`] does.
pub fn compare_with_progress<F>(password: &str, hash: &str, progress: F) -> Result<bool>
where
    F: FnMut(f64),
{
    let Some(salt) = comparable_salt(hash)? else {
        return Ok(false);
    };
    let computed = hash_with_progress(password, SaltSource::Text(salt), progress)?;
    Ok(secure_compare(&computed, hash))
}
