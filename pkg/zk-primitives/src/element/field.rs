use ethnum::{uint, U256};
use ff::PrimeField;

use crate::{hash_merge, Base, Element};

impl Element {
    /// The modulus of the BN254 scalar field
    pub const MODULUS: Element = Element(uint!(
        "0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001"
    ));

    /// Return the result of hash-merging this value with `other`
    ///
    /// This element is considered to be on the left:
    /// ```rust
    /// # use zk_primitives::*;
    /// let a = Element::new(1);
    /// let b = Element::new(2);
    ///
    /// assert_eq!(a.hashed_with(b), hash_merge([a, b]));
    /// ```
    #[inline]
    #[must_use = "this function doesn't modify self"]
    pub fn hashed_with(self, other: Element) -> Self {
        hash_merge([self, other])
    }

    /// Convert this [`Element`] to its equivalent [`Base`] representation
    ///
    /// Non-canonical values are reduced modulo [`Element::MODULUS`] first
    #[inline]
    #[must_use]
    pub fn to_base(self) -> Base {
        let reduced = self.0 % Self::MODULUS.0;
        Base::from_raw(le_limbs(reduced.to_le_bytes()))
    }

    /// Create an [`Element`] from a [`Base`]
    #[inline]
    #[must_use]
    pub fn from_base(base: Base) -> Element {
        Self(U256::from_le_bytes(base.to_repr()))
    }

    /// Reduce this element to its canonical form
    ///
    /// Elements in canonical form are guaranteed to be unchanged when converting to/from a [`Base`]
    #[inline]
    pub fn canonicalize(&mut self) {
        self.0 %= Self::MODULUS.0;
    }

    /// Whether this [`Element`] is strictly less than [`Element::MODULUS`]
    #[inline]
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.0 < Self::MODULUS.0
    }
}

impl From<Base> for Element {
    fn from(value: Base) -> Self {
        Element::from_base(value)
    }
}

impl From<Element> for Base {
    fn from(value: Element) -> Self {
        value.to_base()
    }
}

fn le_limbs(bytes: [u8; 32]) -> [u64; 4] {
    core::array::from_fn(|i| {
        let mut limb = [0; 8];
        limb.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
        u64::from_le_bytes(limb)
    })
}

#[cfg(test)]
mod tests {
    use ff::Field;
    use test_strategy::proptest;

    use super::*;

    #[proptest]
    fn to_from_base_biject(element: Element) {
        let base = element.to_base();
        let element_again = Element::from_base(base);

        assert_eq!(element, element_again);
    }

    #[test]
    fn modulus_reduces_to_zero() {
        assert_eq!(Element::from_base(Element::MODULUS.to_base()), Element::ZERO);
        assert_eq!(
            Element::from_base(Element::from(Element::MODULUS.0 + 5).to_base()),
            Element::new(5)
        );
        assert!(!Element::MODULUS.is_canonical());
        assert!(Element::from_base(-Base::one()).is_canonical());
    }
}
