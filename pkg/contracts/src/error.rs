use paillier::PaillierError;
use zk_circuits::{CircuitKind, ProverError};
use zk_primitives::Element;

use crate::AccountId;

/// A ledger operation was rejected
///
/// Rejections leave the ledger's state untouched.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The proof was made against a root that is no longer the ledger's last root
    ///
    /// Recompute the path against the new root and prove again
    #[error("stale root {found}, the ledger's last root is {current}")]
    StaleRoot {
        /// The ledger's last root
        current: Element,
        /// The root in the public signals
        found: Element,
    },

    /// The nullifier hash has already been spent
    #[error("nullifier hash {0} has already been spent")]
    NullifierReuse(Element),

    /// The proof was made against a balance or allowance that has since changed
    #[error("the encrypted balance of {account} has changed since the proof was made")]
    StaleBalance {
        /// The account whose balance didn't match
        account: AccountId,
    },

    /// The public signals don't authorize a spend from this account
    #[error("{account} did not authorize this operation")]
    Unauthorized {
        /// The account being spent from
        account: AccountId,
    },

    /// The account has never deposited
    #[error("unknown account: {0}")]
    UnknownAccount(AccountId),

    /// No account has the auth commitment the public signals spend with
    #[error("no account has auth commitment {0}")]
    UnknownAuthCommitment(Element),

    /// No account has the key the public signals credit
    #[error("no account has the public key with modulus {0}")]
    UnknownPublicKey(Element),

    /// The holder never approved the spender
    #[error("{holder} has no allowance for {spender}")]
    NoAllowance {
        /// The account that would have approved
        holder: AccountId,
        /// The account that would spend
        spender: AccountId,
    },

    /// The verifier rejected the proof
    #[error("the {kind} verifier rejected the proof")]
    ProofVerificationFailure {
        /// The circuit whose verifier was used
        kind: CircuitKind,
    },

    /// The operation was called with the wrong number of public signals
    #[error("{kind} takes {expected} public signals, got {found}")]
    WrongSignalCount {
        /// The circuit of the operation
        kind: CircuitKind,
        /// The number of public signals the circuit has
        expected: usize,
        /// The number of public signals passed
        found: usize,
    },

    /// The tree couldn't be updated
    #[error("commitment tree error: {0}")]
    Tree(#[from] accumulator::Error),

    /// The verifier couldn't be run
    #[error("verifier error: {0}")]
    Prover(#[from] ProverError),

    /// A key in the public signals is malformed
    #[error("invalid key in public signals: {0}")]
    InvalidKey(#[from] PaillierError),
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
