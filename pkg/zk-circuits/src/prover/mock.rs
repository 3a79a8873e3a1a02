use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use sha3::{Digest, Keccak256};
use zk_primitives::Element;

use crate::{CircuitKind, Proof, ProofOutput, Prover, ProverError, VerifierProof, Witness};

/// A [`Prover`] that checks witnesses by evaluating the circuits natively
///
/// A mock proof is a keccak digest of the circuit name and the public signals, laid out in the
/// shape of a Groth16 proof. It is only accepted by [`MockProver::verify`], and only for the
/// exact signals it was made for, so a ledger using this prover still rejects proofs that are
/// replayed against different signals.
///
/// Clones share the count of proofs generated.
#[derive(Debug, Clone, Default)]
pub struct MockProver {
    proofs: Arc<AtomicUsize>,
}

impl MockProver {
    /// Create a new [`MockProver`]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many proofs have been generated by this prover and its clones
    #[must_use]
    pub fn proof_count(&self) -> usize {
        self.proofs.load(Ordering::SeqCst)
    }
}

fn mock_proof(kind: CircuitKind, public_signals: &[Element]) -> Proof {
    let coordinate = |i: u8| {
        let mut hasher = Keccak256::new();
        hasher.update(kind.to_string().as_bytes());
        for signal in public_signals {
            hasher.update(signal.to_be_bytes());
        }
        hasher.update([i]);

        let mut element = Element::from_be_bytes(hasher.finalize().into());
        element.canonicalize();
        element
    };

    Proof {
        pi_a: [coordinate(0), coordinate(1), Element::ONE],
        pi_b: [
            [coordinate(2), coordinate(3)],
            [coordinate(4), coordinate(5)],
            [Element::ONE, Element::ZERO],
        ],
        pi_c: [coordinate(6), coordinate(7), Element::ONE],
        protocol: "groth16".to_owned(),
        curve: "bn128".to_owned(),
    }
}

#[async_trait]
impl Prover for MockProver {
    #[tracing::instrument(skip_all, fields(circuit = %witness.kind()))]
    async fn prove(&self, witness: &Witness) -> Result<ProofOutput, ProverError> {
        let public_signals = witness.evaluate()?;
        if public_signals != witness.public_signals() {
            return Err(ProverError::PublicSignalMismatch {
                kind: witness.kind(),
                expected: witness.public_signals().to_vec(),
                found: public_signals,
            });
        }

        self.proofs.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("generated mock proof");

        Ok(ProofOutput {
            proof: mock_proof(witness.kind(), &public_signals),
            public_signals,
        })
    }

    async fn verify(
        &self,
        kind: CircuitKind,
        public_signals: &[Element],
        proof: &VerifierProof,
    ) -> Result<bool, ProverError> {
        if public_signals.len() != kind.public_signal_count() {
            return Ok(false);
        }

        Ok(&mock_proof(kind, public_signals).to_verifier_format() == proof)
    }
}
