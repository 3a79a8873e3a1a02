use num_bigint::{BigUint, RandBigInt};
use rand::{CryptoRng, RngCore};

use crate::{math::is_unit, PaillierError, PublicKey};

/// The encryption randomness `r`, an element of `Z*_n`
///
/// The circuits take `r` as a witness and recompute the ciphertext from it, so every ciphertext
/// needs its own freshly sampled [`Randomness`], and the value has to be kept until the proof
/// is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Randomness(#[cfg_attr(feature = "serde", serde(with = "crate::decimal"))] BigUint);

impl Randomness {
    /// Use a known value as randomness for `pk`
    pub fn new(pk: &PublicKey, r: BigUint) -> Result<Self, PaillierError> {
        if !is_unit(&r, pk.n()) {
            return Err(PaillierError::InvalidRandomness);
        }

        Ok(Self(r))
    }

    /// Sample uniformly from `Z*_n`
    ///
    /// Values in `[1, n)` are drawn uniformly, and the (vanishingly rare) ones that share a
    /// factor with `n` are rejected.
    pub fn sample<R: RngCore + CryptoRng>(pk: &PublicKey, rng: &mut R) -> Self {
        let one = BigUint::from(1u32);

        loop {
            let r = rng.gen_biguint_range(&one, pk.n());
            if is_unit(&r, pk.n()) {
                return Self(r);
            }
        }
    }

    /// The underlying integer
    #[must_use]
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Whether this randomness can be used with `pk`
    #[must_use]
    pub fn is_valid_for(&self, pk: &PublicKey) -> bool {
        is_unit(&self.0, pk.n())
    }
}
