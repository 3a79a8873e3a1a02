//! Deterministic fixtures shared by the workspace's tests

use num_bigint::BigUint;
use once_cell::sync::Lazy;
use paillier::KeyPair;
use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};

/// 61-bit primes, paired up into the keys returned by [`key_pair`]
///
/// Each modulus is about 122 bits, so ciphertexts (which live modulo `n^2`) fit in the BN254
/// scalar field with room to spare.
const PRIMES: [u64; 8] = [
    2_305_843_009_213_693_951,
    2_305_843_009_213_693_921,
    2_305_843_009_213_693_907,
    2_305_843_009_213_693_723,
    2_305_843_009_213_693_693,
    2_305_843_009_213_693_669,
    2_305_843_009_213_693_613,
    2_305_843_009_213_693_561,
];

static KEY_PAIRS: Lazy<Vec<KeyPair>> = Lazy::new(|| {
    PRIMES
        .chunks_exact(2)
        .map(|pair| {
            KeyPair::from_primes(&BigUint::from(pair[0]), &BigUint::from(pair[1]))
                .expect("fixture primes make a valid key")
        })
        .collect()
});

/// The number of distinct keys [`key_pair`] can return
pub const KEY_PAIR_COUNT: usize = PRIMES.len() / 2;

/// A seeded RNG, so that tests are reproducible
#[must_use]
pub fn rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// The `i`th fixture key pair
///
/// # Panics
///
/// If `i >= KEY_PAIR_COUNT`
#[must_use]
pub fn key_pair(i: usize) -> KeyPair {
    assert!(i < KEY_PAIR_COUNT, "only {KEY_PAIR_COUNT} fixture keys");
    KEY_PAIRS[i].clone()
}

/// A valid key whose ciphertexts don't fit in the scalar field
///
/// Built from the Mersenne primes `2^127 - 1` and `2^89 - 1`, so `n^2` is about 432 bits
#[must_use]
pub fn oversized_key_pair() -> KeyPair {
    let one = BigUint::from(1u32);
    let p = (&one << 127u32) - &one;
    let q = (&one << 89u32) - &one;

    KeyPair::from_primes(&p, &q).expect("fixture primes make a valid key")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_keys_are_distinct() {
        let moduli: Vec<_> = (0..KEY_PAIR_COUNT)
            .map(|i| key_pair(i).public_key().n().clone())
            .collect();

        for (i, a) in moduli.iter().enumerate() {
            for b in &moduli[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn oversized_key_overflows_the_field() {
        assert!(oversized_key_pair().public_key().n_squared().bits() > 254);
        assert!(key_pair(0).public_key().n_squared().bits() < 254);
    }
}
