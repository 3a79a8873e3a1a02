use borsh::{BorshDeserialize, BorshSerialize};
use zk_primitives::Element;

use super::Error;

/// Keys are the tag followed by the big-endian leaf index, so rocksdb's lexicographic order is
/// the leaf order
const LEAF_TAG: u8 = b'l';

pub(super) fn leaf_key(index: u32) -> [u8; 5] {
    let [a, b, c, d] = index.to_be_bytes();
    [LEAF_TAG, a, b, c, d]
}

pub(super) fn leaf_prefix() -> [u8; 1] {
    [LEAF_TAG]
}

/// Decode a leaf key, or return `None` if the key belongs to some other record type
pub(super) fn parse_leaf_key(key: &[u8]) -> Option<u32> {
    match *key {
        [LEAF_TAG, a, b, c, d] => Some(u32::from_be_bytes([a, b, c, d])),
        _ => None,
    }
}

/// The stored representation of a single leaf
///
/// New versions are added as new variants, so that old databases keep loading
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub(super) enum LeafRecord {
    V1 {
        commitment: Element,
        /// The ledger timestamp of the `Commit` event, when the leaf came from one
        timestamp: Option<u64>,
    },
}

impl LeafRecord {
    pub(super) fn commitment(&self) -> Element {
        match self {
            Self::V1 { commitment, .. } => *commitment,
        }
    }

    pub(super) fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(borsh::to_vec(self)?)
    }

    pub(super) fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(borsh::from_slice(bytes)?)
    }
}
