use std::fmt;

use paillier::{Ciphertext, PublicKey};
use serde::{Deserialize, Serialize};
use zk_primitives::Element;

/// An account on the ledger
///
/// On a deployed ledger this is the caller's address. Accounts are created by their first
/// deposit, which also fixes the account's key and auth commitment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "account#{}", self.0)
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// What the ledger stores for an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The key the balance is encrypted under
    pub public_key: PublicKey,
    /// The current balance
    pub balance: Ciphertext,
    /// `H(authSecret)`, which every spend from this account must reproduce
    pub auth_commitment: Element,
}

/// An allowance, published under both the holder's and the spender's key
///
/// The two ciphertexts always encrypt the same amount, so either party can read what is left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allowance {
    /// The allowance under the holder's key
    pub holder: Ciphertext,
    /// The allowance under the spender's key
    pub spender: Ciphertext,
}
