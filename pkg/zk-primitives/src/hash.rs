use std::sync::OnceLock;

use ff::Field;
use sha3::{Digest, Keccak256};

use crate::{Base, Element};

/// The number of Feistel rounds in one application of the sponge permutation
pub const MIMC_ROUNDS: usize = 220;

const SEED: &[u8] = b"mimcsponge";

/// The round constants, derived by repeatedly hashing the seed with keccak256
///
/// The first and last constants are zero
fn round_constants() -> &'static [Base; MIMC_ROUNDS] {
    static CONSTANTS: OnceLock<[Base; MIMC_ROUNDS]> = OnceLock::new();

    CONSTANTS.get_or_init(|| {
        let mut constants = [Base::zero(); MIMC_ROUNDS];
        let mut digest = keccak256(SEED);

        for constant in constants.iter_mut().take(MIMC_ROUNDS - 1).skip(1) {
            digest = keccak256(&digest);
            *constant = Element::from_be_bytes(digest).to_base();
        }

        constants
    })
}

pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut out = [0; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

/// Apply the MiMC-Feistel permutation to `(xl, xr)` with key `k`
///
/// This is circomlib's `MiMCFeistel(220)`: on every round but the last, `t = xl + k + c_i` and
/// the halves become `(xr + t^5, xl)`. The last round only adds `t^5` to `xr`.
#[must_use]
pub fn mimc_sponge(mut xl: Base, mut xr: Base, k: Base) -> (Base, Base) {
    let constants = round_constants();

    for (i, c) in constants.iter().enumerate() {
        let t = xl + k + *c;
        let t2 = t.square();
        let t5 = t2.square() * t;

        if i < MIMC_ROUNDS - 1 {
            let next = xr + t5;
            xr = xl;
            xl = next;
        } else {
            xr += t5;
        }
    }

    (xl, xr)
}

/// Absorb `inputs` into the sponge one element at a time and squeeze a single output
///
/// This matches circomlib's `MiMCSponge(n, 220, 1)` with a zero key, which is the hash used for
/// every commitment, nullifier hash, and tree node in the protocol. Non-canonical inputs are
/// reduced modulo the field prime.
///
/// ```rust
/// # use zk_primitives::*;
/// // a sponge with nothing absorbed never runs the permutation
/// assert_eq!(multi_hash([]), Element::ZERO);
///
/// let a = multi_hash([Element::new(1), Element::new(2)]);
/// let b = multi_hash([Element::new(2), Element::new(1)]);
/// assert_ne!(a, b);
/// ```
pub fn multi_hash<I: IntoIterator<Item = Element>>(inputs: I) -> Element {
    let key = Base::zero();
    let mut r = Base::zero();
    let mut c = Base::zero();

    for input in inputs {
        r += input.to_base();
        (r, c) = mimc_sponge(r, c, key);
    }

    Element::from_base(r)
}

/// Hash `N` elements together
///
/// For `N == 2` this is the node combination function of the commitment tree, with the left
/// child first.
#[inline]
#[must_use]
pub fn hash_merge<const N: usize>(elements: [Element; N]) -> Element {
    multi_hash(elements)
}
