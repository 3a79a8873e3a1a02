use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// The circuits of the protocol
///
/// The name of each circuit (its [`Display`](std::fmt::Display) form) is also the name of its
/// artifact directory and files.
///
/// ```rust
/// # use zk_circuits::*;
/// assert_eq!(CircuitKind::TransferFrom.to_string(), "transferFrom");
/// assert_eq!("approve".parse(), Ok(CircuitKind::Approve));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum CircuitKind {
    /// Bind `(value, secret, nullifier)` into a deposit commitment
    CreateDepositCommitment,
    /// Spend a deposit commitment into an encrypted balance
    NullifyDepositCommitment,
    /// Move an encrypted amount between two accounts
    Transfer,
    /// Set an encrypted allowance for a spender
    Approve,
    /// Spend from an allowance
    TransferFrom,
    /// Debit a balance into a withdrawal commitment
    CreateWithdrawalCommitment,
    /// Spend a withdrawal commitment, releasing its plaintext value
    NullifyWithdrawalCommitment,
}

impl CircuitKind {
    /// The number of public signals the circuit's verifier checks
    #[must_use]
    pub fn public_signal_count(self) -> usize {
        match self {
            Self::CreateDepositCommitment => 1,
            Self::CreateWithdrawalCommitment | Self::NullifyWithdrawalCommitment => 3,
            Self::NullifyDepositCommitment
            | Self::Transfer
            | Self::Approve
            | Self::TransferFrom => 5,
        }
    }

    /// Every circuit
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}
