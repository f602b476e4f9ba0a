//! bcrypt password hashing.
//!
//! bcrypt is a password hashing function designed by Niels Provos and David Mazières, based on
//! the Blowfish cipher. A hash records its own version, cost and salt:
//!
//! ```text
//! $2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy
//!  \/ \/ \____________________/\_____________________________/
//!  |  cost        salt                     digest
//!  revision
//! ```
//!
//! [`hash`] and [`compare`] block until the `2^cost` key schedule iterations are done. The
//! `*_with_progress` variants report progress between 100ms slices, and [`nonblocking`]
//! yields to a tokio runtime between slices. All of them produce identical output.
//!
//! ```no_run
//! let hashed = bcrypt_kit::hash("correct horse", 10u32)?;
//! assert!(bcrypt_kit::compare("correct horse", &hashed)?);
//! # Ok::<(), bcrypt_kit::BcryptError>(())
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod base64;
pub mod blowfish;
pub mod error;
pub mod hash;
pub mod nonblocking;
pub mod password;
pub mod random;
pub mod rounds;
pub mod salt;

pub use error::{BcryptError, Result};
pub use hash::{compare, compare_with_progress, hash, hash_with_progress, SaltSource};
pub use nonblocking::{compare_async, hash_async};
pub use password::{secure_compare, truncates, PasswordBytes, MAX_PASSWORD_LEN};
pub use random::{
    clear_random_fallback, random_fallback, set_random_fallback, FnSource, OsRandom,
    RandomSource, RngSource,
};
pub use rounds::{Digest, RoundJob, Step, SLICE_BUDGET};
pub use salt::{
    generate_salt, generate_salt_with, get_rounds, get_salt, BcryptHash, RawSalt, Revision,
    SaltDescriptor, DEFAULT_COST, HASH_LEN, MAX_COST, MIN_COST, SALT_LEN,
};

/// Encodes the first `len` bytes of `bytes` with the bcrypt base64 alphabet.
pub fn encode_base64(bytes: &[u8], len: usize) -> Result<String> {
    base64::encode(bytes, len)
}

/// Decodes at most `len` bytes of bcrypt base64, stopping at the first foreign symbol.
pub fn decode_base64(text: &str, len: usize) -> Result<Vec<u8>> {
    base64::decode(text, len)
}
