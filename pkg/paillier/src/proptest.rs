use num_bigint::BigUint;
use ::proptest::prelude::*;
use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
use test_strategy::proptest;

use crate::{KeyPair, PaillierError, Randomness};

fn keys() -> KeyPair {
    KeyPair::from_primes(&BigUint::from(65_519u32), &BigUint::from(65_521u32)).unwrap()
}

/// `65_519 * 65_521`, the modulus of [`keys`]
const N: u64 = 4_292_870_399;

#[proptest(cases = 128)]
fn encrypt_decrypt_round_trip(#[strategy(0..N)] value: u64, seed: u64) {
    let keys = keys();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let (c, _) = keys.public_key().encrypt(&value.into(), &mut rng).unwrap();

    prop_assert_eq!(keys.private_key().decrypt(&c).unwrap(), BigUint::from(value));
}

#[proptest(cases = 128)]
fn addition_is_homomorphic(#[strategy(0..N)] a: u64, #[strategy(0..N)] b: u64, seed: u64) {
    let keys = keys();
    let pk = keys.public_key();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let (ca, _) = pk.encrypt(&a.into(), &mut rng).unwrap();
    let (cb, _) = pk.encrypt(&b.into(), &mut rng).unwrap();

    let sum = keys.private_key().decrypt(&pk.add(&ca, &cb)).unwrap();

    prop_assert_eq!(sum, (BigUint::from(a) + b) % pk.n());
}

#[test]
fn modulus_bound_is_exact() {
    let keys = keys();
    let pk = keys.public_key();
    let mut rng = ChaCha20Rng::seed_from_u64(0);

    assert_eq!(pk.n(), &BigUint::from(N));
    assert!(pk.encrypt(&(N - 1).into(), &mut rng).is_ok());
    assert!(matches!(
        pk.encrypt(&u32::MAX.into(), &mut rng),
        Err(PaillierError::PlaintextOutOfRange { .. })
    ));
}

#[proptest(cases = 128)]
fn negated_encryption_debits(
    #[strategy(0..1_000_000u64)] balance: u64,
    #[strategy(0..=#balance)] debit: u64,
    seed: u64,
) {
    let keys = keys();
    let pk = keys.public_key();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let (cb, _) = pk.encrypt(&balance.into(), &mut rng).unwrap();
    let (cd, _) = pk.encrypt_negated(&debit.into(), &mut rng).unwrap();

    let remaining = keys.private_key().decrypt(&pk.add(&cb, &cd)).unwrap();

    prop_assert_eq!(remaining, BigUint::from(balance - debit));
}

#[proptest(cases = 64)]
fn distinct_randomness_gives_distinct_ciphertexts(
    #[strategy(0..N)] value: u64,
    #[strategy(1..1_000_000u64)] r1: u64,
    #[strategy(1..1_000_000u64)] r2: u64,
) {
    prop_assume!(r1 != r2);

    let keys = keys();
    let pk = keys.public_key();

    // multiples of either prime factor of n are not units
    let r1 = Randomness::new(pk, r1.into());
    let r2 = Randomness::new(pk, r2.into());
    prop_assume!(r1.is_ok() && r2.is_ok());
    let (r1, r2) = (r1.unwrap(), r2.unwrap());

    let c1 = pk.encrypt_with(&value.into(), &r1).unwrap();
    let c2 = pk.encrypt_with(&value.into(), &r2).unwrap();

    prop_assert_ne!(&c1, &c2);
    prop_assert_eq!(keys.private_key().decrypt(&c1).unwrap(), BigUint::from(value));
    prop_assert_eq!(keys.private_key().decrypt(&c2).unwrap(), BigUint::from(value));
}
