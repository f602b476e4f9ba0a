//! Salt and hash text: `$2<minor>$<cost>$<22-char salt>[<31-char digest>]`.

use std::fmt;

use crate::base64;
use crate::error::{BcryptError, Result};
use crate::random::{self, RandomSource};

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;
pub const DEFAULT_COST: u32 = 10;

/// Raw salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Digest bytes kept in the hash text.
pub const HASH_DIGEST_LEN: usize = 23;

/// Length of a `$2x$cc$` + salt prefix.
pub const SALT_TEXT_LEN: usize = 29;

/// Length of a full `$2x$` hash record.
pub const HASH_LEN: usize = 60;

const ENCODED_SALT_LEN: usize = 22;
const ENCODED_DIGEST_LEN: usize = 31;

/// The minor revision letter following `$2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Revision {
    /// `$2$`: the original format, no trailing NUL on the password.
    Legacy,
    /// `$2a$`
    A,
    /// `$2b$`
    #[default]
    B,
    /// `$2y$`
    Y,
}

impl Revision {
    fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            b'a' => Some(Revision::A),
            b'b' => Some(Revision::B),
            b'y' => Some(Revision::Y),
            _ => None,
        }
    }

    /// Whether password preparation appends a NUL byte.
    pub fn appends_nul(self) -> bool {
        self != Revision::Legacy
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Revision::Legacy => "2",
            Revision::A => "2a",
            Revision::B => "2b",
            Revision::Y => "2y",
        })
    }
}

/// Exactly 16 bytes of salt entropy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawSalt([u8; SALT_LEN]);

impl RawSalt {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let salt: [u8; SALT_LEN] = bytes.try_into().map_err(|_| BcryptError::SaltLengthMismatch {
            expected: SALT_LEN,
            actual: bytes.len(),
        })?;
        Ok(RawSalt(salt))
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

impl From<[u8; SALT_LEN]> for RawSalt {
    fn from(bytes: [u8; SALT_LEN]) -> Self {
        RawSalt(bytes)
    }
}

/// Version, cost and salt: everything needed to hash a password.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaltDescriptor {
    pub revision: Revision,
    pub cost: u32,
    pub salt: RawSalt,
}

/// Revision, cost and the byte offset where the encoded salt starts.
fn parse_header(text: &str) -> Result<(Revision, u32, usize)> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'$') || bytes.get(1) != Some(&b'2') {
        return Err(BcryptError::InvalidSaltFormat(format!(
            "invalid salt version: {}",
            text.chars().take(2).collect::<String>()
        )));
    }

    let (revision, offset) = match bytes.get(2) {
        Some(b'$') => (Revision::Legacy, 3),
        marker => {
            let revision = marker
                .and_then(|&m| Revision::from_marker(m))
                .filter(|_| bytes.get(3) == Some(&b'$'))
                .ok_or_else(|| {
                    BcryptError::InvalidSaltFormat(format!(
                        "invalid salt revision: {}",
                        text.chars().skip(2).take(2).collect::<String>()
                    ))
                })?;
            (revision, 4)
        }
    };

    if bytes.get(offset + 2) != Some(&b'$') {
        return Err(BcryptError::InvalidSaltFormat(
            "missing salt rounds".to_string(),
        ));
    }
    let cost = match (bytes[offset], bytes[offset + 1]) {
        (d1 @ b'0'..=b'9', d2 @ b'0'..=b'9') => u32::from(d1 - b'0') * 10 + u32::from(d2 - b'0'),
        _ => {
            return Err(BcryptError::InvalidSaltFormat(
                "salt rounds must be two decimal digits".to_string(),
            ))
        }
    };

    Ok((revision, cost, offset + 3))
}

impl SaltDescriptor {
    pub fn new(revision: Revision, cost: u32, salt: RawSalt) -> Self {
        SaltDescriptor {
            revision,
            cost,
            salt,
        }
    }

    /// Parses a salt string or the salt prefix of a full hash; anything after the
    /// 22 salt characters is ignored. The cost is not range-checked here.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_prefix(text).map(|(descriptor, _)| descriptor)
    }

    fn parse_prefix(text: &str) -> Result<(Self, usize)> {
        let (revision, cost, start) = parse_header(text)?;
        let bytes = text.as_bytes();
        let end = bytes.len().min(start + ENCODED_SALT_LEN);
        let decoded = base64::decode_bytes(&bytes[start..end], SALT_LEN);
        let salt = RawSalt::from_slice(&decoded)?;
        Ok((SaltDescriptor::new(revision, cost, salt), start + ENCODED_SALT_LEN))
    }

    /// Renders the full hash record for `digest` under this descriptor.
    pub fn render_hash(&self, digest: &[u8]) -> String {
        let kept = &digest[..digest.len().min(HASH_DIGEST_LEN)];
        format!("{self}{}", base64::encode_all(kept))
    }
}

impl fmt::Display for SaltDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}${:02}${}",
            self.revision,
            self.cost,
            base64::encode_all(self.salt.as_bytes())
        )
    }
}

/// A parsed hash record: descriptor plus the 23 stored digest bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BcryptHash {
    pub descriptor: SaltDescriptor,
    pub digest: [u8; HASH_DIGEST_LEN],
}

impl BcryptHash {
    pub fn parse(text: &str) -> Result<Self> {
        let (descriptor, digest_start) = SaltDescriptor::parse_prefix(text)?;
        let encoded = &text.as_bytes()[digest_start..];
        if encoded.len() != ENCODED_DIGEST_LEN {
            return Err(BcryptError::InvalidSaltFormat(format!(
                "digest must be {ENCODED_DIGEST_LEN} characters, got {}",
                encoded.len()
            )));
        }
        let decoded = base64::decode_bytes(encoded, HASH_DIGEST_LEN);
        let digest = decoded.as_slice().try_into().map_err(|_| {
            BcryptError::InvalidSaltFormat("digest contains invalid characters".to_string())
        })?;
        Ok(BcryptHash { descriptor, digest })
    }
}

impl fmt::Display for BcryptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor.render_hash(&self.digest))
    }
}

/// Brings a requested cost into `MIN_COST..=MAX_COST`.
pub fn clamp_cost(cost: u32) -> u32 {
    cost.clamp(MIN_COST, MAX_COST)
}

/// Generates a `$2b$` salt from the process random source. Out-of-range costs are clamped.
pub fn generate_salt(cost: u32) -> Result<String> {
    generate_salt_from(cost, &random::OsRandom)
}

/// Salt generation with `primary` in place of the OS generator; the fallback still applies.
pub(crate) fn generate_salt_from(cost: u32, primary: &dyn RandomSource) -> Result<String> {
    let bytes = random::random_bytes_from(primary, SALT_LEN)?;
    let salt = RawSalt::from_slice(&bytes)?;
    Ok(SaltDescriptor::new(Revision::B, clamp_cost(cost), salt).to_string())
}

/// Generates a `$2b$` salt drawing entropy from `source`.
pub fn generate_salt_with(cost: u32, source: &dyn RandomSource) -> Result<String> {
    let mut bytes = [0u8; SALT_LEN];
    source.fill(&mut bytes)?;
    Ok(SaltDescriptor::new(Revision::B, clamp_cost(cost), RawSalt(bytes)).to_string())
}

/// The cost recorded in a salt or hash string.
pub fn get_rounds(hash: &str) -> Result<u32> {
    parse_header(hash).map(|(_, cost, _)| cost)
}

/// The first 29 characters of a 60-character hash. The salt itself is not validated.
pub fn get_salt(hash: &str) -> Result<String> {
    if hash.len() != HASH_LEN {
        return Err(BcryptError::InvalidHashLength(hash.len()));
    }
    hash.get(..SALT_TEXT_LEN)
        .map(str::to_string)
        .ok_or_else(|| BcryptError::InvalidSaltFormat("hash is not ASCII".to_string()))
}
