use serde::{Deserialize, Serialize};
use zk_primitives::Element;

/// A Groth16 proof as snarkjs writes it to `proof.json`
///
/// The points are in projective coordinates, so each has a trailing `z` coordinate (which is
/// always `1` for proofs produced by snarkjs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// `A`, in G1
    pub pi_a: [Element; 3],
    /// `B`, in G2, each coordinate an `Fp2` element `[c0, c1]`
    pub pi_b: [[Element; 2]; 3],
    /// `C`, in G1
    pub pi_c: [Element; 3],
    /// Always `groth16`
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Always `bn128`
    #[serde(default = "default_curve")]
    pub curve: String,
}

fn default_protocol() -> String {
    "groth16".to_owned()
}

fn default_curve() -> String {
    "bn128".to_owned()
}

/// A proof in the form the ledger's pairing check takes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierProof {
    /// `A`, affine
    pub a: [Element; 2],
    /// `B`, affine, with the two halves of each `Fp2` coordinate swapped
    pub b: [[Element; 2]; 2],
    /// `C`, affine
    pub c: [Element; 2],
}

/// A proof together with the public signals it proves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofOutput {
    /// The proof, as the prover produced it
    pub proof: Proof,
    /// The public signals, in verifier order
    pub public_signals: Vec<Element>,
}

impl Proof {
    /// Convert to the form the verifier contract expects
    ///
    /// The verifier's pairing precompile orders `Fp2` coordinates `[c1, c0]`, while snarkjs
    /// writes them `[c0, c1]`, so the halves of both `B` coordinates are swapped. The projective
    /// `z` coordinates are dropped.
    ///
    /// ```rust
    /// # use zk_circuits::*;
    /// let e = Element::new;
    /// let proof = Proof {
    ///     pi_a: [e(1), e(2), e(1)],
    ///     pi_b: [[e(3), e(4)], [e(5), e(6)], [e(1), e(0)]],
    ///     pi_c: [e(7), e(8), e(1)],
    ///     protocol: "groth16".into(),
    ///     curve: "bn128".into(),
    /// };
    ///
    /// let verifier = proof.to_verifier_format();
    /// assert_eq!(verifier.a, [e(1), e(2)]);
    /// assert_eq!(verifier.b, [[e(4), e(3)], [e(6), e(5)]]);
    /// assert_eq!(verifier.c, [e(7), e(8)]);
    /// ```
    #[must_use]
    pub fn to_verifier_format(&self) -> VerifierProof {
        let [[b00, b01], [b10, b11], _] = self.pi_b;

        VerifierProof {
            a: [self.pi_a[0], self.pi_a[1]],
            b: [[b01, b00], [b11, b10]],
            c: [self.pi_c[0], self.pi_c[1]],
        }
    }
}

impl VerifierProof {
    /// The inverse of [`Proof::to_verifier_format`]
    #[must_use]
    pub fn to_snarkjs_format(&self) -> Proof {
        let [[b01, b00], [b11, b10]] = self.b;

        Proof {
            pi_a: [self.a[0], self.a[1], Element::ONE],
            pi_b: [[b00, b01], [b10, b11], [Element::ONE, Element::ZERO]],
            pi_c: [self.c[0], self.c[1], Element::ONE],
            protocol: default_protocol(),
            curve: default_curve(),
        }
    }
}
