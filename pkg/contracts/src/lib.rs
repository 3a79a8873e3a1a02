#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![deny(clippy::disallowed_methods)]

//! The zkTips ledger contract, as seen from off-chain
//!
//! [`Ledger`] is the contract's interface. [`InMemoryLedger`] implements the contract's rules
//! in process, verifying proofs with any [`Prover`](zk_circuits::Prover).

mod account;
mod error;
mod ledger;
mod memory;

pub use account::{Account, AccountId, Allowance};
pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use memory::InMemoryLedger;

pub use accumulator::CommitEvent;
