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

/// Inputs for [`CircuitKind::Approve`]
///
/// Public signals:
/// `[encryptedHolderBalance, encryptedHolderValue, encryptedHolderAllowance,
/// encryptedSpenderAllowance, authCommitment]`
///
/// The approved amount leaves the holder's balance (`encryptedHolderValue` encrypts
/// `n - value`), and the new allowance is published under both keys so that the holder and the
/// spender can each decrypt what is left of it. The circuit encrypts the holder's debit and the
/// holder's view of the allowance with the same randomness, the `r` of `holderPubKey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveInputs {
    /// The holder's current balance, as stored on the ledger
    pub encrypted_holder_balance: Element,
    /// The approved amount
    pub value: Element,
    /// The holder's spend-authorizing secret
    pub auth_secret: Element,
    /// `[g, r, n]` of the holder, with the randomness of `encryptedHolderValue` and
    /// `encryptedHolderAllowance`
    pub holder_pub_key: [Element; 3],
    /// `[g, r, n]` of the spender, with the randomness of `encryptedSpenderAllowance`
    pub spender_pub_key: [Element; 3],
    /// `[λ, μ, n]` of the holder
    pub holder_priv_key: [Element; 3],
}

impl ApproveInputs {
    /// Allow the holder of `spender` to spend `value` of `holder`'s balance
    pub fn build<R: RngCore + CryptoRng>(
        holder: &KeyPair,
        spender: &PublicKey,
        value: Element,
        encrypted_holder_balance: &Ciphertext,
        auth_secret: Element,
        rng: &mut R,
    ) -> Result<Self, WitnessError> {
        check_sufficient(
            holder.private_key(),
            encrypted_holder_balance,
            &to_big(value),
        )?;

        let holder_pk = holder.public_key();
        let holder_r = Randomness::sample(holder_pk, rng);
        let spender_r = Randomness::sample(spender, rng);

        Ok(Self {
            encrypted_holder_balance: ciphertext_input(
                encrypted_holder_balance,
                "encryptedHolderBalance",
            )?,
            value,
            auth_secret,
            holder_pub_key: public_key_input(holder_pk, &holder_r, "holderPubKey")?,
            spender_pub_key: public_key_input(spender, &spender_r, "spenderPubKey")?,
            holder_priv_key: private_key_input(holder.private_key(), "holderPrivKey")?,
        })
    }
}

impl Circuit for ApproveInputs {
    const KIND: CircuitKind = CircuitKind::Approve;

    fn public_signals(&self) -> Result<Vec<Element>, WitnessError> {
        let value = to_big(self.value);

        let (holder_pk, holder_r) = parse_public_key(self.holder_pub_key)?;
        let holder_sk = parse_private_key(self.holder_priv_key, &holder_pk, "holderPrivKey")?;
        check_sufficient(&holder_sk, &ciphertext(self.encrypted_holder_balance), &value)?;

        let (spender_pk, spender_r) = parse_public_key(self.spender_pub_key)?;

        let holder_value = holder_pk.encrypt_negated_with(&value, &holder_r)?;
        let holder_allowance = holder_pk.encrypt_with(&value, &holder_r)?;
        let spender_allowance = spender_pk.encrypt_with(&value, &spender_r)?;

        Ok(vec![
            self.encrypted_holder_balance,
            ciphertext_input(&holder_value, "encryptedHolderValue")?,
            ciphertext_input(&holder_allowance, "encryptedHolderAllowance")?,
            ciphertext_input(&spender_allowance, "encryptedSpenderAllowance")?,
            auth_commitment(self.auth_secret),
        ])
    }
}
