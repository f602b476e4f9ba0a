//! Entropy for salt generation.
//!
//! The OS generator is always tried first. When it fails, the process-wide fallback set with
//! [`set_random_fallback`] is consulted at that moment; with neither available, salt
//! generation fails with [`BcryptError::NoRandomSource`]. Hashing with an existing salt never
//! touches this module.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{BcryptError, Result};

/// Fills buffers with random bytes.
pub trait RandomSource: Send + Sync {
    fn fill(&self, dest: &mut [u8]) -> Result<()>;
}

/// The operating system's CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| BcryptError::RandomSource(e.to_string()))
    }
}

/// Any `rand` generator used as a source, e.g. a seeded PRNG on hosts without OS entropy.
///
/// Whether the generator is fit for producing salts is the caller's call.
pub struct RngSource<R>(Mutex<R>);

impl<R: RngCore + Send> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource(Mutex::new(rng))
    }
}

impl<R: RngCore + Send> RandomSource for RngSource<R> {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        let mut rng = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        rng.try_fill_bytes(dest)
            .map_err(|e| BcryptError::RandomSource(e.to_string()))
    }
}

/// A plain `bytes(n)` function used as a source.
pub struct FnSource<F>(F);

impl<F> FnSource<F>
where
    F: Fn(usize) -> Vec<u8> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        FnSource(f)
    }
}

impl<F> RandomSource for FnSource<F>
where
    F: Fn(usize) -> Vec<u8> + Send + Sync,
{
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        let bytes = (self.0)(dest.len());
        if bytes.len() != dest.len() {
            return Err(BcryptError::RandomSource(format!(
                "expected {} bytes, got {}",
                dest.len(),
                bytes.len()
            )));
        }
        dest.copy_from_slice(&bytes);
        Ok(())
    }
}

static RANDOM_FALLBACK: RwLock<Option<Arc<dyn RandomSource>>> = RwLock::new(None);

/// Installs the source used when the OS generator is unavailable. Last writer wins.
pub fn set_random_fallback<S: RandomSource + 'static>(source: S) {
    *RANDOM_FALLBACK
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(source));
}

/// Removes any installed fallback.
pub fn clear_random_fallback() {
    *RANDOM_FALLBACK
        .write()
        .unwrap_or_else(PoisonError::into_inner) = None;
}

/// The fallback currently installed, if any.
pub fn random_fallback() -> Option<Arc<dyn RandomSource>> {
    RANDOM_FALLBACK
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Draws `len` bytes from the OS generator, falling back to the configured source.
pub fn random_bytes(len: usize) -> Result<Vec<u8>> {
    random_bytes_from(&OsRandom, len)
}

/// Like [`random_bytes`] with `primary` standing in for the OS generator.
pub(crate) fn random_bytes_from(primary: &dyn RandomSource, len: usize) -> Result<Vec<u8>> {
    draw(primary, random_fallback().as_deref(), len)
}

fn draw(
    primary: &dyn RandomSource,
    fallback: Option<&dyn RandomSource>,
    len: usize,
) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; len];
    match primary.fill(&mut bytes) {
        Ok(()) => Ok(bytes),
        Err(err) => {
            let fallback = fallback.ok_or(BcryptError::NoRandomSource)?;
            tracing::warn!(error = %err, "OS random source failed, using fallback");
            fallback.fill(&mut bytes)?;
            Ok(bytes)
        }
    }
}
