//! Password byte preparation and constant-time comparison.

use std::hint::black_box;

use zeroize::Zeroizing;

use crate::salt::Revision;

/// Maximum number of password bytes that reach the key schedule.
pub const MAX_PASSWORD_LEN: usize = 72;

/// UTF-8 password bytes ready for the key schedule, wiped on drop.
pub struct PasswordBytes(Zeroizing<Vec<u8>>);

impl PasswordBytes {
    /// Encodes `password` as UTF-8, keeps at most 72 bytes and, for the `a`/`b`/`y`
    /// revisions, appends a single NUL after truncation.
    pub fn prepare(password: &str, revision: Revision) -> Self {
        let bytes = password.as_bytes();
        let kept = &bytes[..bytes.len().min(MAX_PASSWORD_LEN)];

        let mut prepared = Zeroizing::new(Vec::with_capacity(kept.len() + 1));
        prepared.extend_from_slice(kept);
        if revision.appends_nul() {
            prepared.push(0);
        }
        PasswordBytes(prepared)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for PasswordBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordBytes(***)")
    }
}

/// Whether hashing `password` would ignore some of its bytes (UTF-8 length above 72).
pub fn truncates(password: &str) -> bool {
    password.len() > MAX_PASSWORD_LEN
}

/// Compares two strings without exiting early on the first difference.
///
/// The length mismatch is folded into the running difference and every index of the
/// longer string is visited.
pub fn secure_compare(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut diff = u8::from(a.len() != b.len());

    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= black_box(x ^ y);
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_appends_nul_for_minor_revisions() {
        for revision in [Revision::A, Revision::B, Revision::Y] {
            assert_eq!(PasswordBytes::prepare("abc", revision).as_bytes(), b"abc\0");
        }
        assert_eq!(PasswordBytes::prepare("abc", Revision::Legacy).as_bytes(), b"abc");
    }

    #[test]
    fn test_prepare_truncates_before_nul() {
        let long = "x".repeat(100);
        let prepared = PasswordBytes::prepare(&long, Revision::B);
        assert_eq!(prepared.len(), MAX_PASSWORD_LEN + 1);
        assert_eq!(prepared.as_bytes()[MAX_PASSWORD_LEN], 0);

        let legacy = PasswordBytes::prepare(&long, Revision::Legacy);
        assert_eq!(legacy.len(), MAX_PASSWORD_LEN);
    }

    #[test]
    fn test_prepare_empty_password() {
        assert!(PasswordBytes::prepare("", Revision::Legacy).is_empty());
        assert_eq!(PasswordBytes::prepare("", Revision::A).as_bytes(), b"\0");
    }

    #[test]
    fn test_prepare_counts_utf8_bytes() {
        // Each snowman is three bytes; 25 of them exceed the cap by three bytes.
        let snowmen = "☃".repeat(25);
        let prepared = PasswordBytes::prepare(&snowmen, Revision::Legacy);
        assert_eq!(prepared.len(), MAX_PASSWORD_LEN);
        assert_eq!(&prepared.as_bytes()[..3], "☃".as_bytes());
    }

    #[test]
    fn test_truncates() {
        assert!(!truncates(&"a".repeat(72)));
        assert!(truncates(&"a".repeat(73)));
        assert!(!truncates(&"☃".repeat(24)));
        assert!(truncates(&"☃".repeat(25)));
        assert!(!truncates(""));
    }

    #[test]
    fn test_secure_compare() {
        assert!(secure_compare("", ""));
        assert!(secure_compare("abc", "abc"));
        assert!(!secure_compare("abc", "abd"));
        assert!(!secure_compare("abc", "abcd"));
        assert!(!secure_compare("abc\0", "abc"));
        assert!(!secure_compare("", "a"));
    }

    #[test]
    fn test_debug_is_masked() {
        let prepared = PasswordBytes::prepare("secret", Revision::B);
        assert_eq!(format!("{prepared:?}"), "PasswordBytes(***)");
    }
}
