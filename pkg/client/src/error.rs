use contracts::{AccountId, LedgerError};
use paillier::PaillierError;
use zk_circuits::{ProverError, WitnessError};
use zk_primitives::Element;

/// The client operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    /// Committing to a deposit note
    CreateDeposit,
    /// Spending a deposit note into a balance
    NullifyDeposit,
    /// A confidential transfer
    Transfer,
    /// Setting an allowance
    Approve,
    /// Spending from an allowance
    TransferFrom,
    /// Debiting a balance into a withdrawal note
    CreateWithdrawal,
    /// Spending a withdrawal note
    NullifyWithdrawal,
    /// Bringing the local tree up to date with the ledger
    Sync,
    /// Reading ledger state
    Read,
}

/// An error from a [`Client`](crate::Client) operation
///
/// Errors carry the operation and, where there is one, the account and the public signals that
/// were submitted. They never carry witness inputs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The ledger rejected the operation
    #[error("{operation} rejected by the ledger: {source}")]
    Ledger {
        /// The operation that was rejected
        operation: Operation,
        /// The account the operation was for
        account: Option<AccountId>,
        /// The public signals that were submitted
        public_signals: Vec<Element>,
        /// The ledger's reason
        #[source]
        source: LedgerError,
    },

    /// The witness couldn't be built from the given keys and state
    #[error("{operation}: invalid witness: {source}")]
    Witness {
        /// The operation the witness was for
        operation: Operation,
        /// Why the witness is invalid
        #[source]
        source: WitnessError,
    },

    /// The proof couldn't be generated
    #[error("{operation}: proving failed: {source}")]
    Prover {
        /// The operation the proof was for
        operation: Operation,
        /// Why proving failed
        #[source]
        source: ProverError,
    },

    /// The local tree couldn't be updated, or doesn't hold the commitment
    #[error("commitment tree error: {0}")]
    Tree(#[from] accumulator::Error),

    /// The local tree couldn't be persisted
    #[error("tree storage error: {0}")]
    Storage(#[from] accumulator::storage::Error),

    /// A ledger ciphertext couldn't be decrypted
    #[error("decryption failed: {0}")]
    Decrypt(#[from] PaillierError),
}

impl Error {
    pub(crate) fn ledger(
        operation: Operation,
        account: Option<AccountId>,
        public_signals: Vec<Element>,
        source: LedgerError,
    ) -> Self {
        Self::Ledger {
            operation,
            account,
            public_signals,
            source,
        }
    }

    pub(crate) fn read(source: LedgerError) -> Self {
        Self::ledger(Operation::Read, None, Vec::new(), source)
    }

    /// Whether retrying the operation against a re-synced tree may succeed
    ///
    /// Only a stale root is retryable. Everything else is either deterministic or means the
    /// caller's view of the ledger is wrong.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Ledger {
                source: LedgerError::StaleRoot { .. },
                ..
            }
        )
    }

    /// The operation that failed, if the error came from one
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Ledger { operation, .. }
            | Self::Witness { operation, .. }
            | Self::Prover { operation, .. } => Some(*operation),
            Self::Tree(_) | Self::Storage(_) | Self::Decrypt(_) => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
