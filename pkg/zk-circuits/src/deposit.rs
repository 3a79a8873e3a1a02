use accumulator::{Path, PROTOCOL_DEPTH};
use paillier::PublicKey;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zk_primitives::{commitment, nullifier_hash, Element};

use crate::{
    keys::{ciphertext_input, parse_public_key, public_key_input},
    witness::{fold_path, to_big},
    Circuit, CircuitKind, Note, WitnessError,
};

/// Inputs for [`CircuitKind::CreateDepositCommitment`]
///
/// Public signals: `[commitment]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepositInputs {
    /// The deposited amount
    pub value: Element,
    /// The note's blinding secret
    pub secret: Element,
    /// The note's nullifier
    pub nullifier: Element,
    /// `H(value, secret, nullifier)`
    pub commitment: Element,
}

impl CreateDepositInputs {
    /// The inputs proving that `note` opens its commitment
    #[must_use]
    pub fn new(note: Note) -> Self {
        Self {
            value: note.value,
            secret: note.secret,
            nullifier: note.nullifier,
            commitment: note.commitment(),
        }
    }
}

impl Circuit for CreateDepositInputs {
    const KIND: CircuitKind = CircuitKind::CreateDepositCommitment;

    fn public_signals(&self) -> Result<Vec<Element>, WitnessError> {
        if commitment(self.value, self.secret, self.nullifier) != self.commitment {
            return Err(WitnessError::Constraint(
                "commitment is not H(value, secret, nullifier)",
            ));
        }

        Ok(vec![self.commitment])
    }
}

/// Inputs for [`CircuitKind::NullifyDepositCommitment`]
///
/// Public signals: `[root, nullifierHash, encryptedBalance, g, n]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NullifyDepositInputs {
    /// The note's nullifier
    pub nullifier: Element,
    /// The note's blinding secret
    pub secret: Element,
    /// The deposited amount
    pub value: Element,
    /// The siblings of the commitment's path, leaf level first
    pub path_elements: [Element; PROTOCOL_DEPTH],
    /// The side bits of the commitment's path, leaf level first
    pub path_indices: [Element; PROTOCOL_DEPTH],
    /// The new account balance, `value` encrypted under `pubKey`
    pub encrypted_balance: Element,
    /// `[g, r, n]` of the account's key, with the randomness of `encryptedBalance`
    pub pub_key: [Element; 3],
}

impl NullifyDepositInputs {
    /// Spend `note`, whose commitment is at the start of `path`, into a fresh balance under `pk`
    ///
    /// ```rust
    /// # use accumulator::ProtocolTree;
    /// # use zk_circuits::*;
    /// # use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
    /// let mut rng = ChaCha20Rng::seed_from_u64(0);
    /// let keys = testutil::key_pair(0);
    ///
    /// let note = Note::random(Element::new(100), &mut rng);
    /// let mut tree = ProtocolTree::new();
    /// tree.insert(note.commitment()).unwrap();
    ///
    /// let path = tree.proof(note.commitment()).unwrap();
    /// let inputs = NullifyDepositInputs::build(note, &path, keys.public_key(), &mut rng).unwrap();
    ///
    /// let witness = Witness::new(&inputs).unwrap();
    /// assert_eq!(witness.public_signals()[0], tree.root());
    /// ```
    pub fn build<R: RngCore + CryptoRng>(
        note: Note,
        path: &Path<PROTOCOL_DEPTH>,
        pk: &PublicKey,
        rng: &mut R,
    ) -> Result<Self, WitnessError> {
        let commitment = note.commitment();
        if path.leaf != commitment {
            return Err(WitnessError::PathMismatch {
                commitment,
                path_leaf: path.leaf,
            });
        }

        let (balance, r) = pk.encrypt(&to_big(note.value), rng)?;

        Ok(Self {
            nullifier: note.nullifier,
            secret: note.secret,
            value: note.value,
            path_elements: path.siblings,
            path_indices: path.index_elements(),
            encrypted_balance: ciphertext_input(&balance, "encryptedBalance")?,
            pub_key: public_key_input(pk, &r, "pubKey")?,
        })
    }
}

impl Circuit for NullifyDepositInputs {
    const KIND: CircuitKind = CircuitKind::NullifyDepositCommitment;

    fn public_signals(&self) -> Result<Vec<Element>, WitnessError> {
        let leaf = commitment(self.value, self.secret, self.nullifier);
        let root = fold_path(leaf, &self.path_elements, &self.path_indices)?;

        let (pk, r) = parse_public_key(self.pub_key)?;
        let expected = pk.encrypt_with(&to_big(self.value), &r)?;
        if to_big(self.encrypted_balance) != *expected.value() {
            return Err(WitnessError::Constraint(
                "encryptedBalance is not value encrypted under pubKey",
            ));
        }

        let [g, _, n] = self.pub_key;

        Ok(vec![
            root,
            nullifier_hash(self.nullifier),
            self.encrypted_balance,
            g,
            n,
        ])
    }
}

#[cfg(test)]
mod tests {
    use accumulator::ProtocolTree;
    use expect_test::expect;

    use super::*;
    use crate::Witness;

    fn scenario_note() -> Note {
        Note {
            value: Element::new(100),
            secret: Element::new(0x1234),
            nullifier: "".parse().unwrap(),
        }
    }

    #[test]
    fn create_deposit_signals() {
        let witness = Witness::new(&CreateDepositInputs::new(scenario_note())).unwrap();

        expect![[r#"
            [
                0x10ba666ce22c9d9081f1a67d31609d01086d0ea7598d49240aa2d37eb676e82f,
            ]
        "#]]
        .assert_debug_eq(&witness.public_signals());

        expect![[r#"{"commitment":"7566346045001586052637368386039894568693100313116851486302774481435091200047","nullifier":"0","secret":"4660","value":"100"}"#]]
            .assert_eq(&serde_json::to_string(witness.inputs()).unwrap());
    }

    #[test]
    fn tampered_commitment_is_rejected() {
        let mut inputs = CreateDepositInputs::new(scenario_note());
        inputs.value = Element::new(101);

        assert!(matches!(
            inputs.public_signals(),
            Err(WitnessError::Constraint(_))
        ));
    }

    #[test]
    fn nullify_deposit_signals() {
        let mut rng = testutil::rng(1);
        let keys = testutil::key_pair(0);
        let note = scenario_note();

        let mut tree = ProtocolTree::new();
        tree.insert(note.commitment()).unwrap();
        let path = tree.proof(note.commitment()).unwrap();

        let inputs =
            NullifyDepositInputs::build(note, &path, keys.public_key(), &mut rng).unwrap();
        let signals = inputs.public_signals().unwrap();

        expect!["0x056ed104553786e05588c47cd5a52f7e081830a17bdd46ad3e9fb5494eb41b19"]
            .assert_eq(&signals[0].to_hex());
        assert_eq!(signals[1], note.nullifier_hash());
        assert_eq!(
            keys.private_key()
                .decrypt(&crate::keys::ciphertext(signals[2]))
                .unwrap(),
            100u32.into()
        );
        assert_eq!(to_big(signals[3]), *keys.public_key().g());
        assert_eq!(to_big(signals[4]), *keys.public_key().n());
    }

    #[test]
    fn path_for_another_leaf_is_rejected() {
        let mut rng = testutil::rng(2);
        let keys = testutil::key_pair(0);

        let mut tree = ProtocolTree::new();
        tree.insert(Element::new(5)).unwrap();
        let path = tree.proof(Element::new(5)).unwrap();

        let result = NullifyDepositInputs::build(scenario_note(), &path, keys.public_key(), &mut rng);
        assert!(matches!(result, Err(WitnessError::PathMismatch { .. })));
    }

    #[test]
    fn wrong_balance_ciphertext_is_rejected() {
        let mut rng = testutil::rng(3);
        let keys = testutil::key_pair(0);
        let note = scenario_note();

        let mut tree = ProtocolTree::new();
        tree.insert(note.commitment()).unwrap();
        let path = tree.proof(note.commitment()).unwrap();

        let mut inputs =
            NullifyDepositInputs::build(note, &path, keys.public_key(), &mut rng).unwrap();
        inputs.value = Element::new(1_000);

        assert!(matches!(
            inputs.public_signals(),
            Err(WitnessError::Constraint(_))
        ));
    }

    #[test]
    fn oversized_key_does_not_fit_the_field() {
        let mut rng = testutil::rng(4);
        let keys = testutil::oversized_key_pair();
        let note = scenario_note();

        let mut tree = ProtocolTree::new();
        tree.insert(note.commitment()).unwrap();
        let path = tree.proof(note.commitment()).unwrap();

        let result = NullifyDepositInputs::build(note, &path, keys.public_key(), &mut rng);
        assert!(matches!(
            result,
            Err(WitnessError::OutOfField {
                field: "encryptedBalance"
            })
        ));
    }
}
