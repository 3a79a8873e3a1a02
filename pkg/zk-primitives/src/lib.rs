#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::match_bool)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![deny(missing_docs)]

//! Field elements and the MiMC hash domain shared by the zkTips circuits
//!
//! Everything that ends up inside a proof is an [`Element`]: commitments, nullifiers, tree nodes,
//! and the Paillier ciphertexts that are passed to the circuits as public signals. Hashing is
//! done with the MiMC sponge (220 rounds, exponent 5) used by circomlib, so digests produced here
//! match the ones computed inside the circuits and by the on-chain hasher bit-for-bit.

mod commitment;
mod element;
mod hash;
mod path;

pub use commitment::{auth_commitment, commitment, nullifier_hash, ZERO_VALUE};
pub use element::{Element, ParseElementError};
pub use hash::{hash_merge, mimc_sponge, multi_hash, MIMC_ROUNDS};
pub use path::compute_merkle_root;

/// The base element used by the cryptographic operations in this crate
///
/// This is (roughly) an integer modulo `p` where `p` is [`Element::MODULUS`]
pub type Base = halo2curves::bn256::Fr;
