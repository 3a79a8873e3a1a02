use ethnum::U256;
use serde::{Deserialize, Deserializer, Serializer};

use crate::Element;

/// Elements are written as decimal strings, which is what snarkjs expects in an input file
pub(super) fn serialize<S>(u: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(u)
}

/// Accepts decimal strings, `0x`-prefixed hex strings, or plain JSON integers
pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Str(String),
        Int(u64),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Str(s) => s
            .parse::<Element>()
            .map(Element::to_u256)
            .map_err(serde::de::Error::custom),
        Repr::Int(i) => Ok(U256::from(i)),
    }
}
