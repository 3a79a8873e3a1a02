use std::{fmt, str::FromStr};

use num_bigint::{BigUint, ParseBigIntError};

/// A Paillier ciphertext, an element of `Z*_{n^2}` for the key it was encrypted under
///
/// A ciphertext doesn't know which key it belongs to. Operations on a [`PublicKey`] assume the
/// ciphertext came from that key.
///
/// [`PublicKey`]: crate::PublicKey
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Ciphertext(#[cfg_attr(feature = "serde", serde(with = "crate::decimal"))] BigUint);

impl Ciphertext {
    /// Wrap a raw integer, for example one read back from the ledger
    #[must_use]
    pub fn new(value: BigUint) -> Self {
        Self(value)
    }

    /// The underlying integer
    #[must_use]
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Unwrap into the underlying integer
    #[must_use]
    pub fn into_value(self) -> BigUint {
        self.0
    }
}

impl From<BigUint> for Ciphertext {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<Ciphertext> for BigUint {
    fn from(ciphertext: Ciphertext) -> Self {
        ciphertext.0
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Ciphertext {
    type Err = ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}
