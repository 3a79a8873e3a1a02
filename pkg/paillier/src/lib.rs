#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![deny(missing_docs)]

//! Paillier encryption, used to keep account balances and allowances confidential
//!
//! The scheme is additively homomorphic: multiplying two ciphertexts gives an encryption of the
//! sum of their plaintexts. Debits are expressed as additions of `n - value`, so every balance
//! update is a single ciphertext multiplication.
//!
//! ```rust
//! # use paillier::*;
//! # use num_bigint::BigUint;
//! # use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
//! let mut rng = ChaCha20Rng::seed_from_u64(1);
//! let keys = KeyPair::from_primes(&BigUint::from(65_519u32), &BigUint::from(65_521u32)).unwrap();
//! let pk = keys.public_key();
//!
//! let (balance, _) = pk.encrypt(&BigUint::from(100u32), &mut rng).unwrap();
//! let (debit, _) = pk.encrypt_negated(&BigUint::from(20u32), &mut rng).unwrap();
//!
//! let remaining = pk.add(&balance, &debit);
//! assert_eq!(keys.private_key().decrypt(&remaining).unwrap(), BigUint::from(80u32));
//! ```

mod ciphertext;
mod error;
mod key;
mod math;
mod randomness;
#[cfg(feature = "serde")]
mod decimal;

#[cfg(test)]
mod proptest;

pub use ciphertext::Ciphertext;
pub use error::PaillierError;
pub use key::{KeyPair, PrivateKey, PublicKey};
pub use randomness::Randomness;
