use paillier::{Ciphertext, KeyPair, PublicKey};
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

/// Inputs for [`CircuitKind::Transfer`]
///
/// Public signals:
/// `[encryptedSenderBalance, encryptedSenderValue, encryptedReceiverValue, authCommitment, receiverN]`
///
/// The ledger finds the sender by `authCommitment` and the receiver by `receiverN`. It debits
/// the sender by adding `encryptedSenderValue` (an encryption of `n - value`) to their balance,
/// and credits the receiver by adding `encryptedReceiverValue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferInputs {
    /// The sender's current balance, as stored on the ledger
    pub encrypted_sender_balance: Element,
    /// `n - value` under the sender's key
    pub encrypted_sender_value: Element,
    /// `value` under the receiver's key
    pub encrypted_receiver_value: Element,
    /// The amount being moved
    pub value: Element,
    /// `H(authSecret)`, as registered for the sender
    pub auth_commitment: Element,
    /// The sender's spend-authorizing secret
    pub auth_secret: Element,
    /// `[g, r, n]` of the sender, with the randomness of `encryptedSenderValue`
    pub sender_pub_key: [Element; 3],
    /// `[g, r, n]` of the receiver, with the randomness of `encryptedReceiverValue`
    pub receiver_pub_key: [Element; 3],
    /// `[λ, μ, n]` of the sender
    pub sender_priv_key: [Element; 3],
}

impl TransferInputs {
    /// Move `value` from the holder of `sender` to the holder of `receiver`
    ///
    /// # Errors
    ///
    /// [`WitnessError::InsufficientBalance`] if `encrypted_sender_balance` decrypts to less
    /// than `value`
    pub fn build<R: RngCore + CryptoRng>(
        sender: &KeyPair,
        receiver: &PublicKey,
        value: Element,
        encrypted_sender_balance: &Ciphertext,
        auth_secret: Element,
        rng: &mut R,
    ) -> Result<Self, WitnessError> {
        let value_int = to_big(value);
        check_sufficient(sender.private_key(), encrypted_sender_balance, &value_int)?;

        let sender_pk = sender.public_key();
        let (sender_value, sender_r) = sender_pk.encrypt_negated(&value_int, rng)?;
        let (receiver_value, receiver_r) = receiver.encrypt(&value_int, rng)?;

        Ok(Self {
            encrypted_sender_balance: ciphertext_input(
                encrypted_sender_balance,
                "encryptedSenderBalance",
            )?,
            encrypted_sender_value: ciphertext_input(&sender_value, "encryptedSenderValue")?,
            encrypted_receiver_value: ciphertext_input(&receiver_value, "encryptedReceiverValue")?,
            value,
            auth_commitment: auth_commitment(auth_secret),
            auth_secret,
            sender_pub_key: public_key_input(sender_pk, &sender_r, "senderPubKey")?,
            receiver_pub_key: public_key_input(receiver, &receiver_r, "receiverPubKey")?,
            sender_priv_key: private_key_input(sender.private_key(), "senderPrivKey")?,
        })
    }
}

impl Circuit for TransferInputs {
    const KIND: CircuitKind = CircuitKind::Transfer;

    fn public_signals(&self) -> Result<Vec<Element>, WitnessError> {
        if auth_commitment(self.auth_secret) != self.auth_commitment {
            return Err(WitnessError::Constraint("authCommitment is not H(authSecret)"));
        }

        let value = to_big(self.value);

        let (sender_pk, sender_r) = parse_public_key(self.sender_pub_key)?;
        let sender_sk = parse_private_key(self.sender_priv_key, &sender_pk, "senderPrivKey")?;
        check_sufficient(&sender_sk, &ciphertext(self.encrypted_sender_balance), &value)?;

        let debit = sender_pk.encrypt_negated_with(&value, &sender_r)?;
        if to_big(self.encrypted_sender_value) != *debit.value() {
            return Err(WitnessError::Constraint(
                "encryptedSenderValue is not n - value under senderPubKey",
            ));
        }

        let (receiver_pk, receiver_r) = parse_public_key(self.receiver_pub_key)?;
        let credit = receiver_pk.encrypt_with(&value, &receiver_r)?;
        if to_big(self.encrypted_receiver_value) != *credit.value() {
            return Err(WitnessError::Constraint(
                "encryptedReceiverValue is not value under receiverPubKey",
            ));
        }

        Ok(vec![
            self.encrypted_sender_balance,
            self.encrypted_sender_value,
            self.encrypted_receiver_value,
            self.auth_commitment,
            self.receiver_pub_key[2],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encrypt(keys: &KeyPair, value: u64, seed: u64) -> Ciphertext {
        keys.public_key()
            .encrypt(&value.into(), &mut testutil::rng(seed))
            .unwrap()
            .0
    }

    #[test]
    fn transfer_moves_value() {
        let mut rng = testutil::rng(10);
        let (alice, bob) = (testutil::key_pair(0), testutil::key_pair(1));
        let balance = encrypt(&alice, 100, 11);

        let inputs = TransferInputs::build(
            &alice,
            bob.public_key(),
            Element::new(20),
            &balance,
            Element::new(42),
            &mut rng,
        )
        .unwrap();

        let signals = inputs.public_signals().unwrap();
        assert_eq!(signals.len(), CircuitKind::Transfer.public_signal_count());

        let pk = alice.public_key();
        let remaining = pk.add(&ciphertext(signals[0]), &ciphertext(signals[1]));
        assert_eq!(alice.private_key().decrypt(&remaining).unwrap(), 80u32.into());

        let received = ciphertext(signals[2]);
        assert_eq!(bob.private_key().decrypt(&received).unwrap(), 20u32.into());

        expect_test::expect!["0x17884d9655993ab784fd4836427e8cf15d36dcc61a9583bafd1f79e6c71e6e32"]
            .assert_eq(&signals[3].to_hex());
        assert_eq!(to_big(signals[4]), *bob.public_key().n());
    }

    #[test]
    fn overspending_is_rejected() {
        let mut rng = testutil::rng(12);
        let (alice, bob) = (testutil::key_pair(0), testutil::key_pair(1));
        let balance = encrypt(&alice, 10, 13);

        let result = TransferInputs::build(
            &alice,
            bob.public_key(),
            Element::new(11),
            &balance,
            Element::new(42),
            &mut rng,
        );

        assert!(matches!(result, Err(WitnessError::InsufficientBalance)));
    }

    #[test]
    fn every_ciphertext_gets_fresh_randomness() {
        let mut rng = testutil::rng(14);
        let (alice, bob) = (testutil::key_pair(0), testutil::key_pair(1));
        let balance = encrypt(&alice, 100, 15);

        let build = |rng: &mut _| {
            TransferInputs::build(
                &alice,
                bob.public_key(),
                Element::new(20),
                &balance,
                Element::new(42),
                rng,
            )
            .unwrap()
        };

        let first = build(&mut rng);
        let second = build(&mut rng);

        assert_ne!(first.encrypted_sender_value, second.encrypted_sender_value);
        assert_ne!(first.encrypted_receiver_value, second.encrypted_receiver_value);
        assert_ne!(first.sender_pub_key[1], first.receiver_pub_key[1]);
    }

    #[test]
    fn forged_private_key_is_rejected() {
        let mut rng = testutil::rng(16);
        let (alice, bob) = (testutil::key_pair(0), testutil::key_pair(1));
        let balance = encrypt(&alice, 100, 17);

        let mut inputs = TransferInputs::build(
            &alice,
            bob.public_key(),
            Element::new(20),
            &balance,
            Element::new(42),
            &mut rng,
        )
        .unwrap();
        inputs.sender_priv_key = private_key_input(bob.private_key(), "senderPrivKey").unwrap();

        assert!(matches!(
            inputs.public_signals(),
            Err(WitnessError::KeyMismatch {
                field: "senderPrivKey"
            })
        ));
    }

    #[test]
    fn wrong_auth_secret_is_rejected() {
        let mut rng = testutil::rng(18);
        let (alice, bob) = (testutil::key_pair(0), testutil::key_pair(1));
        let balance = encrypt(&alice, 100, 19);

        let mut inputs = TransferInputs::build(
            &alice,
            bob.public_key(),
            Element::new(20),
            &balance,
            Element::new(42),
            &mut rng,
        )
        .unwrap();
        inputs.auth_secret = Element::new(43);

        assert!(matches!(
            inputs.public_signals(),
            Err(WitnessError::Constraint(_))
        ));
    }
}
