#![allow(clippy::unwrap_used)]

//! Property-based tests for the codec, salts and hash/compare.

use bcrypt_kit::{
    compare, decode_base64, encode_base64, get_rounds, get_salt, hash, RawSalt, Revision,
    SaltDescriptor, MAX_PASSWORD_LEN,
};
use proptest::prelude::*;

fn salt_text(bytes: [u8; 16]) -> String {
    SaltDescriptor::new(Revision::B, 4, RawSalt::from(bytes)).to_string()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Decoding what was encoded gives back the same prefix.
    #[test]
    fn base64_round_trip(bytes in proptest::collection::vec(any::<u8>(), 1..=16)) {
        let encoded = encode_base64(&bytes, bytes.len()).unwrap();
        prop_assert_eq!(encoded.len(), (bytes.len() * 4).div_ceil(3));
        prop_assert_eq!(decode_base64(&encoded, bytes.len()).unwrap(), bytes);
    }

    /// Decoding never produces more than asked for, whatever the input.
    #[test]
    fn base64_decode_respects_len(text in "\\PC{0,40}", len in 1usize..=32) {
        prop_assert!(decode_base64(&text, len).unwrap().len() <= len);
    }

    /// Rendered salts re-parse to the same descriptor.
    #[test]
    fn salt_text_parses_back(bytes in any::<[u8; 16]>()) {
        let text = salt_text(bytes);
        prop_assert_eq!(text.len(), 29);
        let parsed = SaltDescriptor::parse(&text).unwrap();
        prop_assert_eq!(parsed.salt, RawSalt::from(bytes));
        prop_assert_eq!(parsed.cost, 4);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// A hash verifies against its own password, is deterministic, and keeps its header.
    #[test]
    fn hash_then_compare(password in "\\PC{0,24}", bytes in any::<[u8; 16]>()) {
        let salt = salt_text(bytes);
        let hashed = hash(&password, salt.as_str()).unwrap();

        prop_assert_eq!(hashed.len(), 60);
        prop_assert_eq!(&hashed, &hash(&password, salt.as_str()).unwrap());
        prop_assert_eq!(get_rounds(&hashed).unwrap(), 4);
        prop_assert_eq!(get_salt(&hashed).unwrap(), salt);
        prop_assert!(compare(&password, &hashed).unwrap());
    }

    /// Changing the password changes the verdict.
    #[test]
    fn other_passwords_do_not_match(password in "[a-z]{1,16}", bytes in any::<[u8; 16]>()) {
        let hashed = hash(&password, salt_text(bytes).as_str()).unwrap();
        let other = format!("{password}!");
        prop_assert!(!compare(&other, &hashed).unwrap());
    }

    /// Bytes past the 72nd never influence the hash.
    #[test]
    fn tail_past_limit_is_ignored(tail in "[a-z]{1,16}", bytes in any::<[u8; 16]>()) {
        let salt = salt_text(bytes);
        let base = "p".repeat(MAX_PASSWORD_LEN);
        let extended = format!("{base}{tail}");
        prop_assert_eq!(
            hash(&base, salt.as_str()).unwrap(),
            hash(&extended, salt.as_str()).unwrap()
        );
    }
}
