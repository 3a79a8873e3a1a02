use paillier::{Ciphertext, KeyPair, PublicKey, Randomness};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zk_primitives::{auth_commitment, Element};

use crate::{
    keys::{
        check_sufficient, ciphertext, ciphertext_input, parse_private_key, parse_public_key,
        private_key_input, public_key_input,
    },
    witness::to_big,
    Circuit, CircuitKind, WitnessError,
};

/// Inputs for [`CircuitKind::TransferFrom`]
///
/// Public signals:
/// `[encryptedSpenderBalance, encryptedHolderAllowanceDebit, encryptedSpenderAllowanceDebit,
/// encryptedReceiverValue, authCommitment]`
///
/// `encryptedSpenderBalance` is the spender's view of the allowance. Both views of the
/// allowance are debited by `value`, and `value` is credited to the receiver. The holder's own
/// balance was already debited when the allowance was approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFromInputs {
    /// The allowance under the spender's key, as stored on the ledger
    pub encrypted_spender_balance: Element,
    /// The amount being moved
    pub value: Element,
    /// The spender's spend-authorizing secret
    pub auth_secret: Element,
    /// `[g, r, n]` of the holder, with the randomness of the holder's allowance debit
    pub holder_pub_key: [Element; 3],
    /// `[g, r, n]` of the spender, with the randomness of the spender's allowance debit
    pub spender_pub_key: [Element; 3],
    /// `[g, r, n]` of the receiver, with the randomness of `encryptedReceiverValue`
    pub receiver_pub_key: [Element; 3],
    /// `[λ, μ, n]` of the spender
    pub spender_priv_key: [Element; 3],
}

impl TransferFromInputs {
    /// Spend `value` of the allowance `holder` gave to the holder of `spender`
    pub fn build<R: RngCore + CryptoRng>(
        holder: &PublicKey,
        spender: &KeyPair,
        receiver: &PublicKey,
        value: Element,
        encrypted_spender_allowance: &Ciphertext,
        auth_secret: Element,
        rng: &mut R,
    ) -> Result<Self, WitnessError> {
        check_sufficient(
            spender.private_key(),
            encrypted_spender_allowance,
            &to_big(value),
        )?;

        let holder_r = Randomness::sample(holder, rng);
        let spender_r = Randomness::sample(spender.public_key(), rng);
        let receiver_r = Randomness::sample(receiver, rng);

        Ok(Self {
            encrypted_spender_balance: ciphertext_input(
                encrypted_spender_allowance,
                "encryptedSpenderBalance",
            )?,
            value,
            auth_secret,
            holder_pub_key: public_key_input(holder, &holder_r, "holderPubKey")?,
            spender_pub_key: public_key_input(spender.public_key(), &spender_r, "spenderPubKey")?,
            receiver_pub_key: public_key_input(receiver, &receiver_r, "receiverPubKey")?,
            spender_priv_key: private_key_input(spender.private_key(), "spenderPrivKey")?,
        })
    }
}

impl Circuit for TransferFromInputs {
    const KIND: CircuitKind = CircuitKind::TransferFrom;

    fn public_signals(&self) -> Result<Vec<Element>, WitnessError> {
        let value = to_big(self.value);

        let (spender_pk, spender_r) = parse_public_key(self.spender_pub_key)?;
        let spender_sk = parse_private_key(self.spender_priv_key, &spender_pk, "spenderPrivKey")?;
        check_sufficient(
            &spender_sk,
            &ciphertext(self.encrypted_spender_balance),
            &value,
        )?;

        let (holder_pk, holder_r) = parse_public_key(self.holder_pub_key)?;
        let (receiver_pk, receiver_r) = parse_public_key(self.receiver_pub_key)?;

        let holder_debit = holder_pk.encrypt_negated_with(&value, &holder_r)?;
        let spender_debit = spender_pk.encrypt_negated_with(&value, &spender_r)?;
        let receiver_credit = receiver_pk.encrypt_with(&value, &receiver_r)?;

        Ok(vec![
            self.encrypted_spender_balance,
            ciphertext_input(&holder_debit, "encryptedHolderAllowanceDebit")?,
            ciphertext_input(&spender_debit, "encryptedSpenderAllowanceDebit")?,
            ciphertext_input(&receiver_credit, "encryptedReceiverValue")?,
            auth_commitment(self.auth_secret),
        ])
    }
}
