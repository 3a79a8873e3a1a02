use crate::Element;
use core::num::TryFromIntError;
use ethnum::U256;
use num_bigint::BigUint;
use std::str::FromStr;

macro_rules! from_int_impls {
    ($t:ty) => {
        impl From<$t> for Element {
            #[inline]
            fn from(value: $t) -> Self {
                Element(U256::from(value))
            }
        }

        impl TryFrom<Element> for $t {
            type Error = TryFromIntError;

            #[inline]
            fn try_from(value: Element) -> Result<Self, Self::Error> {
                <$t>::try_from(value.0)
            }
        }
    };
}

from_int_impls!(u8);
from_int_impls!(u16);
from_int_impls!(u32);
from_int_impls!(u64);
from_int_impls!(u128);

impl From<bool> for Element {
    #[inline]
    fn from(value: bool) -> Self {
        match value {
            false => Self::ZERO,
            true => Self::ONE,
        }
    }
}

/// An error produced when a value can't be represented as an [`Element`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseElementError {
    /// The string was not a valid decimal or `0x`-prefixed hex integer
    Invalid(String),
    /// The value does not fit in 256 bits
    TooLarge,
}

impl core::fmt::Display for ParseElementError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Invalid(s) => write!(f, "invalid integer literal: {s:?}"),
            Self::TooLarge => f.write_str("value does not fit in 256 bits"),
        }
    }
}

impl std::error::Error for ParseElementError {}

/// Parses decimal by default, or hex when prefixed with `0x`
///
/// An empty string parses as zero, which is how secrets and nullifiers that were never set are
/// encoded in circuit inputs:
/// ```rust
/// # use zk_primitives::*;
/// assert_eq!("".parse::<Element>().unwrap(), Element::ZERO);
/// assert_eq!("100".parse::<Element>().unwrap(), Element::new(100));
/// assert_eq!("0x64".parse::<Element>().unwrap(), Element::new(100));
/// ```
impl FromStr for Element {
    type Err = ParseElementError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::ZERO);
        }

        let parsed = match s.strip_prefix("0x") {
            Some(hex) => U256::from_str_radix(hex, 16),
            None => U256::from_str_radix(s, 10),
        };

        parsed
            .map(Self)
            .map_err(|_| ParseElementError::Invalid(s.to_owned()))
    }
}

impl From<U256> for Element {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<Element> for U256 {
    fn from(value: Element) -> Self {
        value.0
    }
}

impl From<Element> for BigUint {
    fn from(value: Element) -> Self {
        BigUint::from_bytes_be(&value.to_be_bytes())
    }
}

impl TryFrom<&BigUint> for Element {
    type Error = ParseElementError;

    fn try_from(value: &BigUint) -> Result<Self, Self::Error> {
        let bytes = value.to_bytes_be();
        if bytes.len() > 32 {
            return Err(ParseElementError::TooLarge);
        }

        let mut padded = [0; 32];
        padded[32 - bytes.len()..].copy_from_slice(&bytes);
        Ok(Self::from_be_bytes(padded))
    }
}

impl Element {
    /// Convert the [`Element`] to its bytes in big-endian format
    ///
    /// ```rust
    /// # use zk_primitives::*;
    /// let element = Element::ONE;
    /// assert_eq!(element.to_be_bytes(), {
    ///     let mut temp = [0; 32];
    ///     temp[31] = 1;
    ///     temp
    /// });
    /// ```
    #[inline]
    #[must_use]
    pub fn to_be_bytes(self) -> [u8; 32] {
        self.0.to_be_bytes()
    }

    /// Convert the [`Element`] to its bytes in little-endian format
    #[inline]
    #[must_use]
    pub fn to_le_bytes(self) -> [u8; 32] {
        self.0.to_le_bytes()
    }

    /// Convert big-endian bytes into an [`Element`]
    #[inline]
    #[must_use]
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(U256::from_be_bytes(bytes))
    }

    /// Convert little-endian bytes into an [`Element`]
    #[inline]
    #[must_use]
    pub fn from_le_bytes(bytes: [u8; 32]) -> Self {
        Self(U256::from_le_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[test]
    fn test_from_str() {
        assert_eq!(Element::from_str("0").unwrap(), Element::ZERO);
        assert_eq!(Element::from_str("0x0").unwrap(), Element::ZERO);
        assert_eq!(Element::from_str("0x1").unwrap(), Element::ONE);
        assert_eq!(Element::from_str("0xB").unwrap(), Element::from(11u64));
        assert_eq!(Element::from_str(" 11 ").unwrap(), Element::from(11u64));
        assert_eq!(
            Element::from_str(
                "21663839004416932945382355908790599225266501822907911457504978515578255421292"
            )
            .unwrap(),
            crate::ZERO_VALUE
        );

        assert!(matches!(
            Element::from_str("abc"),
            Err(ParseElementError::Invalid(_))
        ));
    }

    #[test]
    fn biguint_too_large() {
        let big = BigUint::from(1u8) << 256;
        assert_eq!(Element::try_from(&big), Err(ParseElementError::TooLarge));

        let max = big - 1u8;
        assert_eq!(Element::try_from(&max), Ok(Element::MAX));
    }

    #[proptest]
    fn biguint_conversion_preserves_value(element: Element) {
        let big = BigUint::from(element);

        assert_eq!(big.to_string(), element.to_decimal());
        assert_eq!(Element::try_from(&big).unwrap(), element);
    }
}
