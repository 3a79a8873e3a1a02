use std::path::PathBuf;

use paillier::PaillierError;
use zk_primitives::Element;

use crate::CircuitKind;

/// The inputs for a circuit couldn't be assembled, or don't satisfy the circuit
///
/// These errors are deterministic: retrying with the same inputs fails in the same way
#[derive(Debug, thiserror::Error)]
pub enum WitnessError {
    /// A value doesn't fit in the BN254 scalar field
    ///
    /// This usually means the Paillier modulus is too large for the circuits: ciphertexts live
    /// modulo `n^2`, which has to stay below the field modulus
    #[error("{field} does not fit in the scalar field")]
    OutOfField {
        /// The input that overflowed
        field: &'static str,
    },

    /// The value being moved is larger than the decrypted balance or allowance
    #[error("insufficient balance")]
    InsufficientBalance,

    /// The authentication path is for a different leaf
    #[error("the merkle path is for leaf {path_leaf}, not commitment {commitment}")]
    PathMismatch {
        /// The commitment of the note being nullified
        commitment: Element,
        /// The leaf the path starts from
        path_leaf: Element,
    },

    /// The private key doesn't belong to the public key it is used with
    #[error("the private key does not match the public key for {field}")]
    KeyMismatch {
        /// The input holding the private key
        field: &'static str,
    },

    /// The inputs don't satisfy one of the circuit's constraints
    #[error("constraint not satisfied: {0}")]
    Constraint(&'static str),

    /// The witness is for a different circuit
    #[error("expected a witness for {expected}, found one for {found}")]
    WrongCircuit {
        /// The circuit that was asked for
        expected: CircuitKind,
        /// The circuit of the witness
        found: CircuitKind,
    },

    /// A Paillier operation failed
    #[error("paillier error: {0}")]
    Paillier(#[from] PaillierError),

    /// The inputs didn't have the shape of the circuit's `input.json`
    #[error("malformed inputs: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Proof generation or verification failed
#[derive(Debug, thiserror::Error)]
pub enum ProverError {
    /// The witness doesn't satisfy the circuit, so no proof can be generated
    #[error("invalid witness: {0}")]
    InvalidWitness(#[from] WitnessError),

    /// A compiled circuit artifact is missing
    #[error("missing circuit artifact: {}", .0.display())]
    MissingArtifact(PathBuf),

    /// The proving backend exited with an error
    #[error("`{command}` failed: {stderr}")]
    Command {
        /// The command that was run
        command: String,
        /// What the command wrote to stderr
        stderr: String,
    },

    /// The proving backend produced different public signals than the witness expected
    #[error("{kind} produced public signals {found:?}, expected {expected:?}")]
    PublicSignalMismatch {
        /// The circuit that was proved
        kind: CircuitKind,
        /// The public signals computed when the witness was built
        expected: Vec<Element>,
        /// The public signals the backend produced
        found: Vec<Element>,
    },

    /// IO error while talking to the proving backend
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The proving backend's output couldn't be parsed
    #[error("malformed prover output: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProverError {
    /// Whether the proof couldn't be generated because the witness is malformed
    ///
    /// These failures indicate a bug in the caller and are never worth retrying
    #[must_use]
    pub fn is_invalid_witness(&self) -> bool {
        matches!(
            self,
            Self::InvalidWitness(_) | Self::PublicSignalMismatch { .. }
        )
    }
}
