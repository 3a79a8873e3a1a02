use ethnum::U256;

mod convert;
mod field;
mod fmt;

#[cfg(feature = "serde")]
mod serde;

pub use convert::ParseElementError;

/// A 256-bit unsigned integer
///
/// This type is a wrapper around a [`U256`], so can represent any value in the range `0..=(2^256 -
/// 1)`. Values that go into a circuit are converted to a [`Base`], which is an integer modulo the
/// BN254 scalar field prime, so anything used as a witness or public signal must be canonical
/// (see [`Element::is_canonical`]).
///
/// Groth16 proof coordinates live in the BN254 *base* field, which is slightly larger than the
/// scalar field, so an [`Element`] holding a proof coordinate is not necessarily canonical.
///
/// [`Base`]: crate::Base
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Element(#[cfg_attr(feature = "serde", serde(with = "serde"))] pub(crate) U256);

impl Element {
    /// The zero element of the field (the additive identity)
    pub const ZERO: Self = Self(U256::ZERO);

    /// The one element of the field (the multiplicative identity)
    pub const ONE: Self = Self(U256::ONE);

    /// The largest possible element (note that this is not canonical)
    pub const MAX: Self = Self(U256::MAX);

    /// Create a new [`Element`] from a u64
    ///
    /// This is largely provided to help type inference in simple cases
    #[inline]
    #[must_use]
    pub fn new(i: u64) -> Self {
        Self(U256::from(i))
    }

    /// Convert this [`Element`] to a U256
    #[inline]
    #[must_use]
    pub fn to_u256(self) -> U256 {
        self.0
    }

    /// Convert this [`Element`] to a 0x-prefixed, zero-padded hex string
    #[inline]
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("0x{}", hex::encode(self.to_be_bytes()))
    }

    /// Convert this [`Element`] to a decimal string, which is the format snarkjs uses for
    /// inputs and public signals
    #[inline]
    #[must_use]
    pub fn to_decimal(self) -> String {
        self.0.to_string()
    }

    /// If this element is zero, returns true
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Generate a uniformly random canonical [`Element`]
    #[cfg(feature = "rand")]
    pub fn secure_random<R: rand::RngCore + rand::CryptoRng>(rng: &mut R) -> Self {
        // mask down to 254 bits, then reject anything at or above the modulus
        loop {
            let mut bytes = [0; 32];
            rng.fill_bytes(&mut bytes);
            bytes[0] &= 0x3f;

            let candidate = Self::from_be_bytes(bytes);
            if candidate.is_canonical() {
                return candidate;
            }
        }
    }
}

macro_rules! partial_eq_impl {
    ($int:ty) => {
        impl PartialEq<$int> for Element {
            fn eq(&self, other: &$int) -> bool {
                *self == Element::from(*other)
            }
        }
    };
}

partial_eq_impl!(bool);
partial_eq_impl!(u8);
partial_eq_impl!(u16);
partial_eq_impl!(u32);
partial_eq_impl!(u64);
partial_eq_impl!(u128);

#[cfg(feature = "borsh")]
impl borsh::BorshSerialize for Element {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.to_be_bytes())
    }
}

#[cfg(feature = "borsh")]
impl borsh::BorshDeserialize for Element {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut bytes = [0; 32];
        reader.read_exact(&mut bytes)?;
        Ok(Self::from_be_bytes(bytes))
    }
}

#[cfg(any(test, feature = "proptest"))]
pub mod proptest {
    use super::Element;
    use ::proptest::{arbitrary::StrategyFor, prelude::*, strategy::Map};
    use ethnum::U256;

    /// Arbitrary elements are always canonical, since that is all a circuit can consume
    impl Arbitrary for Element {
        type Strategy = Map<StrategyFor<[u8; 32]>, fn([u8; 32]) -> Self>;
        type Parameters = ();

        fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
            any::<[u8; 32]>().prop_map(|array| {
                let mut element = Self(U256::from_be_bytes(array));
                element.canonicalize();
                element
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Element;
    use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};

    #[test]
    fn formatting() {
        let element = Element::new(123);

        assert_eq!(element.to_string(), "123");
        assert_eq!(element.to_decimal(), "123");
        assert_eq!(
            element.to_hex(),
            "0x000000000000000000000000000000000000000000000000000000000000007b"
        );
        assert_eq!(format!("{element:x}"), "7b");
        assert_eq!(element, 123u64);
    }

    #[test]
    fn secure_random_is_canonical() {
        let mut rng = ChaCha20Rng::from_seed([7; 32]);

        for _ in 0..1000 {
            assert!(Element::secure_random(&mut rng).is_canonical());
        }
    }

    #[test]
    fn borsh_is_big_endian() {
        let bytes = borsh::to_vec(&Element::new(258)).unwrap();

        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[30..], &[1, 2]);
        assert_eq!(borsh::from_slice::<Element>(&bytes).unwrap(), Element::new(258));
    }
}
