use accumulator::{Path, PROTOCOL_DEPTH};
use paillier::{Ciphertext, KeyPair, Randomness};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zk_primitives::{commitment, nullifier_hash, Element};

use crate::{
    keys::{
        check_sufficient, ciphertext, ciphertext_input, parse_private_key, parse_public_key,
        private_key_input, public_key_input,
    },
    witness::{fold_path, to_big},
    Circuit, CircuitKind, Note, WitnessError,
};

/// Inputs for [`CircuitKind::CreateWithdrawalCommitment`]
///
/// Public signals: `[encryptedSenderBalance, encryptedSenderValue, commitment]`
///
/// The sender's balance is debited by `value`, and a commitment to the same value is added to
/// the tree, to be spent with [`NullifyWithdrawalInputs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWithdrawalInputs {
    /// The sender's current balance, as stored on the ledger
    pub encrypted_sender_balance: Element,
    /// The amount being withdrawn
    pub value: Element,
    /// The withdrawal note's blinding secret
    pub secret: Element,
    /// The withdrawal note's nullifier
    pub nullifier: Element,
    /// The sender's spend-authorizing secret
    pub auth_secret: Element,
    /// `[g, r, n]` of the sender, with the randomness of the debit
    pub sender_pub_key: [Element; 3],
    /// `[λ, μ, n]` of the sender
    pub sender_priv_key: [Element; 3],
}

impl CreateWithdrawalInputs {
    /// Move `note.value` out of `sender`'s balance and into a commitment to `note`
    pub fn build<R: RngCore + CryptoRng>(
        sender: &KeyPair,
        note: Note,
        encrypted_sender_balance: &Ciphertext,
        auth_secret: Element,
        rng: &mut R,
    ) -> Result<Self, WitnessError> {
        check_sufficient(
            sender.private_key(),
            encrypted_sender_balance,
            &to_big(note.value),
        )?;

        let r = Randomness::sample(sender.public_key(), rng);

        Ok(Self {
            encrypted_sender_balance: ciphertext_input(
                encrypted_sender_balance,
                "encryptedSenderBalance",
            )?,
            value: note.value,
            secret: note.secret,
            nullifier: note.nullifier,
            auth_secret,
            sender_pub_key: public_key_input(sender.public_key(), &r, "senderPubKey")?,
            sender_priv_key: private_key_input(sender.private_key(), "senderPrivKey")?,
        })
    }
}

impl Circuit for CreateWithdrawalInputs {
    const KIND: CircuitKind = CircuitKind::CreateWithdrawalCommitment;

    fn public_signals(&self) -> Result<Vec<Element>, WitnessError> {
        let value = to_big(self.value);

        let (pk, r) = parse_public_key(self.sender_pub_key)?;
        let sk = parse_private_key(self.sender_priv_key, &pk, "senderPrivKey")?;
        check_sufficient(&sk, &ciphertext(self.encrypted_sender_balance), &value)?;

        let debit = pk.encrypt_negated_with(&value, &r)?;

        Ok(vec![
            self.encrypted_sender_balance,
            ciphertext_input(&debit, "encryptedSenderValue")?,
            commitment(self.value, self.secret, self.nullifier),
        ])
    }
}

/// Inputs for [`CircuitKind::NullifyWithdrawalCommitment`]
///
/// Public signals: `[root, nullifierHash, value]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NullifyWithdrawalInputs {
    /// The note's nullifier
    pub nullifier: Element,
    /// The note's blinding secret
    pub secret: Element,
    /// The withdrawn amount, released in plaintext
    pub value: Element,
    /// The siblings of the commitment's path, leaf level first
    pub path_elements: [Element; PROTOCOL_DEPTH],
    /// The side bits of the commitment's path, leaf level first
    pub path_indices: [Element; PROTOCOL_DEPTH],
}

impl NullifyWithdrawalInputs {
    /// Spend the withdrawal `note`, whose commitment is at the start of `path`
    pub fn build(note: Note, path: &Path<PROTOCOL_DEPTH>) -> Result<Self, WitnessError> {
        let commitment = note.commitment();
        if path.leaf != commitment {
            return Err(WitnessError::PathMismatch {
                commitment,
                path_leaf: path.leaf,
            });
        }

        Ok(Self {
            nullifier: note.nullifier,
            secret: note.secret,
            value: note.value,
            path_elements: path.siblings,
            path_indices: path.index_elements(),
        })
    }
}

impl Circuit for NullifyWithdrawalInputs {
    const KIND: CircuitKind = CircuitKind::NullifyWithdrawalCommitment;

    fn public_signals(&self) -> Result<Vec<Element>, WitnessError> {
        let leaf = commitment(self.value, self.secret, self.nullifier);
        let root = fold_path(leaf, &self.path_elements, &self.path_indices)?;

        Ok(vec![root, nullifier_hash(self.nullifier), self.value])
    }
}
