use ethnum::uint;

use crate::{multi_hash, Element};

/// The canonical empty leaf of the commitment tree, `keccak256("tornado") mod p`
///
/// Every empty-subtree digest is derived from this value by repeated self-hashing
pub const ZERO_VALUE: Element = Element(uint!(
    "0x2fe54c60d3acabf3343a35b6eba15db4821b340f76e741e2249685ed4899af6c"
));

/// The commitment published as a tree leaf when a deposit or withdrawal is created
///
/// ```rust
/// # use zk_primitives::*;
/// let c = commitment(Element::new(100), Element::new(0x1234), Element::ZERO);
/// assert_eq!(c, multi_hash([Element::new(100), Element::new(0x1234), Element::ZERO]));
/// ```
#[inline]
#[must_use]
pub fn commitment(value: Element, secret: Element, nullifier: Element) -> Element {
    multi_hash([value, secret, nullifier])
}

/// The value recorded by the ledger to bind an account to its auth secret
#[inline]
#[must_use]
pub fn auth_commitment(auth_secret: Element) -> Element {
    multi_hash([auth_secret])
}

/// The value revealed when a commitment is nullified, checked against the ledger's spent set
#[inline]
#[must_use]
pub fn nullifier_hash(nullifier: Element) -> Element {
    multi_hash([nullifier])
}
