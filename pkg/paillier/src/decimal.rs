//! Big integers are exchanged as decimal strings, which is what snarkjs and the ledger expect

use std::borrow::Cow;

use num_bigint::BigUint;
use serde::{de::Error, Deserialize, Deserializer, Serializer};

pub(crate) fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
    let s = Cow::<str>::deserialize(deserializer)?;

    s.trim()
        .parse()
        .map_err(|_| D::Error::custom(format!("invalid decimal integer: {s:?}")))
}
