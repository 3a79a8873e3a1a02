#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Client-side orchestration of the zkTips operations
//!
//! A [`Client`] keeps a local copy of the ledger's commitment tree, assembles witnesses from it
//! and from the ledger's encrypted state, proves them, and submits the proofs. Nullifications are
//! made against a path into the tree, which goes stale if another commitment lands first: the
//! client notices the ledger's [`StaleRoot`](contracts::LedgerError::StaleRoot) rejection,
//! re-syncs the tree, and proves again.

mod client;
pub mod config;
mod error;
pub mod logging;
pub mod pool;

pub use client::{Client, ProtocolStorage};
pub use config::Config;
pub use error::{Error, Operation, Result};
