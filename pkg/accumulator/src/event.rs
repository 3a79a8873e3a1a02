use zk_primitives::Element;

/// A `Commit(commitment, leafIndex, timestamp)` event emitted by the ledger whenever it appends a
/// leaf to its commitment tree
///
/// Replaying these in `leaf_index` order reproduces the ledger's tree exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, borsh::BorshSerialize, borsh::BorshDeserialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CommitEvent {
    /// The inserted commitment
    pub commitment: Element,
    /// The index the commitment was inserted at
    pub leaf_index: u32,
    /// The ledger's timestamp at insertion, in seconds
    pub timestamp: u64,
}
