#![allow(clippy::unwrap_used)]

//! The process-wide fallback cell. Kept in its own test binary because it mutates global state.

use bcrypt_kit::{
    clear_random_fallback, generate_salt_with, random_fallback, set_random_fallback, FnSource,
    RandomSource, RngSource,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn fallback_can_be_set_read_and_cleared() {
    clear_random_fallback();
    assert!(random_fallback().is_none());

    set_random_fallback(FnSource::new(|len| vec![0xaa; len]));
    let fallback = random_fallback().unwrap();
    let mut bytes = [0u8; 4];
    fallback.fill(&mut bytes).unwrap();
    assert_eq!(bytes, [0xaa; 4]);

    // Last writer wins.
    set_random_fallback(FnSource::new(|len| vec![0x55; len]));
    random_fallback().unwrap().fill(&mut bytes).unwrap();
    assert_eq!(bytes, [0x55; 4]);

    clear_random_fallback();
    assert!(random_fallback().is_none());

    // Salt generation still works off the OS source.
    assert!(bcrypt_kit::generate_salt(4).unwrap().starts_with("$2b$04$"));
}

#[test]
fn seeded_generator_gives_reproducible_salts() {
    let a = generate_salt_with(6, &RngSource::new(StdRng::seed_from_u64(7))).unwrap();
    let b = generate_salt_with(6, &RngSource::new(StdRng::seed_from_u64(7))).unwrap();
    let c = generate_salt_with(6, &RngSource::new(StdRng::seed_from_u64(8))).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(bcrypt_kit::get_rounds(&a).unwrap(), 6);
}
