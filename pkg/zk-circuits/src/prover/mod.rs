//! Proving backends
//!
//! [`SnarkjsProver`] drives the snarkjs CLI against the compiled circuits. [`MockProver`]
//! evaluates the circuits natively and produces proofs that only it can verify, which is enough
//! for a ledger and a client to be exercised without the circuit artifacts.

use std::sync::Arc;

use async_trait::async_trait;
use zk_primitives::Element;

use crate::{CircuitKind, ProofOutput, ProverError, VerifierProof, Witness};

mod mock;
mod snarkjs;

pub use mock::MockProver;
pub use snarkjs::SnarkjsProver;

/// Something that can prove and verify the protocol's circuits
#[async_trait]
pub trait Prover: Send + Sync {
    /// Generate a proof that `witness` satisfies its circuit
    ///
    /// The returned public signals are the ones the proof is bound to, in verifier order
    async fn prove(&self, witness: &Witness) -> Result<ProofOutput, ProverError>;

    /// Check `proof` against the verification key of `kind`
    ///
    /// `Ok(false)` means the proof was checked and rejected. `Err` means it couldn't be checked
    async fn verify(
        &self,
        kind: CircuitKind,
        public_signals: &[Element],
        proof: &VerifierProof,
    ) -> Result<bool, ProverError>;
}

#[async_trait]
impl<P: Prover + ?Sized> Prover for Arc<P> {
    async fn prove(&self, witness: &Witness) -> Result<ProofOutput, ProverError> {
        (**self).prove(witness).await
    }

    async fn verify(
        &self,
        kind: CircuitKind,
        public_signals: &[Element],
        proof: &VerifierProof,
    ) -> Result<bool, ProverError> {
        (**self).verify(kind, public_signals, proof).await
    }
}
