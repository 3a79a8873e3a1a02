#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::similar_names)]

//! Witness assembly and proving for the zkTips circuits
//!
//! Each circuit has an inputs type (for example [`TransferInputs`]) that holds exactly the
//! fields of the circuit's `input.json`. The inputs types know how to build themselves from
//! keys and balances, and how to evaluate the circuit's relation natively, which gives the
//! public signals in the order the verifier expects them.
//!
//! A [`Witness`] is the type-erased form that a [`Prover`] consumes.

mod approve;
mod deposit;
mod error;
mod keys;
mod kind;
mod proof;
pub mod prover;
mod transfer;
mod transfer_from;
mod witness;
mod withdrawal;

pub use approve::ApproveInputs;
pub use deposit::{CreateDepositInputs, NullifyDepositInputs};
pub use error::{ProverError, WitnessError};
pub use kind::CircuitKind;
pub use proof::{Proof, ProofOutput, VerifierProof};
pub use prover::Prover;
pub use transfer::TransferInputs;
pub use transfer_from::TransferFromInputs;
pub use withdrawal::{CreateWithdrawalInputs, NullifyWithdrawalInputs};
pub use witness::{Circuit, Note, Witness};

pub use accumulator::PROTOCOL_DEPTH;
pub use zk_primitives::Element;
