//! Error type shared by every bcrypt operation.

use thiserror::Error;

/// Errors produced while generating salts, parsing hash strings or hashing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BcryptError {
    /// An argument had a shape the operation cannot work with (e.g. a zero base64 length).
    #[error("invalid argument: {0}")]
    InvalidArgumentType(String),

    /// Bad version marker, bad minor revision, or missing/malformed cost digits.
    #[error("invalid salt format: {0}")]
    InvalidSaltFormat(String),

    /// Cost parsed from salt text lies outside 4..=31.
    #[error("illegal number of rounds (4-31): {0}")]
    RoundsOutOfRange(u32),

    /// The decoded salt did not yield exactly 16 bytes.
    #[error("illegal salt length: {actual} != {expected}")]
    SaltLengthMismatch { expected: usize, actual: usize },

    /// A salt was needed but neither the OS source nor a fallback could provide bytes.
    #[error("no random source available, set a fallback with set_random_fallback")]
    NoRandomSource,

    /// A configured random source failed.
    #[error("random source failed: {0}")]
    RandomSource(String),

    /// A full hash record was expected.
    #[error("illegal hash length: {0} != 60")]
    InvalidHashLength(usize),
}

pub type Result<T> = std::result::Result<T, BcryptError>;
