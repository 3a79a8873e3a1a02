use accumulator::CommitEvent;
use async_trait::async_trait;
use paillier::{Ciphertext, PublicKey};
use zk_circuits::VerifierProof;
use zk_primitives::Element;

use crate::{AccountId, Allowance, Result};

/// The operations of the zkTips ledger contract
///
/// Every mutating operation takes a proof (already in verifier format) and the public signals it
/// proves, in verifier order. The ledger verifies the proof and checks the signals against its
/// own state before changing anything, so a rejected operation has no effect.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Append a deposit commitment to the tree
    ///
    /// Public signals: `[commitment]`
    async fn create_deposit_commitment(
        &self,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<CommitEvent>;

    /// Spend a deposit commitment into `account`'s balance
    ///
    /// Public signals: `[root, nullifierHash, encryptedBalance, g, n]`
    ///
    /// The first deposit into an account registers its key `(g, n)` and its
    /// `auth_commitment`. Later deposits must use the same key and auth commitment, and are added
    /// to the balance homomorphically.
    async fn nullify_deposit_commitment(
        &self,
        proof: &VerifierProof,
        public_signals: &[Element],
        auth_commitment: Element,
        account: AccountId,
    ) -> Result<()>;

    /// Move an encrypted amount between accounts
    ///
    /// Public signals:
    /// `[encryptedSenderBalance, encryptedSenderValue, encryptedReceiverValue, authCommitment,
    /// receiverN]`
    ///
    /// The sender is the account with `authCommitment`, and the receiver the account whose key
    /// has modulus `receiverN`.
    async fn transfer(&self, proof: &VerifierProof, public_signals: &[Element]) -> Result<()>;

    /// Set the allowance of `spender` over `holder`'s balance
    ///
    /// Public signals:
    /// `[encryptedHolderBalance, encryptedHolderValue, encryptedHolderAllowance,
    /// encryptedSpenderAllowance, authCommitment]`
    ///
    /// The approved amount is debited from the holder's balance. An existing allowance is
    /// replaced, and what was left of it is credited back to the holder.
    async fn approve(
        &self,
        holder: AccountId,
        spender: AccountId,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<()>;

    /// Spend from the allowance `holder` gave `spender`
    ///
    /// Public signals:
    /// `[encryptedSpenderBalance, encryptedHolderAllowanceDebit, encryptedSpenderAllowanceDebit,
    /// encryptedReceiverValue, authCommitment]`
    async fn transfer_from(
        &self,
        holder: AccountId,
        spender: AccountId,
        receiver: AccountId,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<()>;

    /// Debit `account` into a withdrawal commitment
    ///
    /// Public signals: `[encryptedSenderBalance, encryptedSenderValue, commitment]`
    async fn create_withdrawal_commitment(
        &self,
        account: AccountId,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<CommitEvent>;

    /// Spend a withdrawal commitment, returning the released amount
    ///
    /// Public signals: `[root, nullifierHash, value]`
    async fn nullify_withdrawal_commitment(
        &self,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<Element>;

    /// The current balance of `account`
    async fn balance_of(&self, account: AccountId) -> Result<Ciphertext>;

    /// The allowance `holder` gave `spender`
    async fn get_allowance(&self, holder: AccountId, spender: AccountId) -> Result<Allowance>;

    /// The key `account` registered with its first deposit
    async fn get_pub_key(&self, account: AccountId) -> Result<PublicKey>;

    /// The auth commitment `account` registered with its first deposit
    async fn auth_commitment_of(&self, account: AccountId) -> Result<Element>;

    /// The root of the commitment tree
    async fn get_last_root(&self) -> Result<Element>;

    /// Whether `nullifier_hash` has been spent
    async fn is_spent(&self, nullifier_hash: Element) -> Result<bool>;

    /// The `Commit` events for leaves `from_index..`, in leaf order
    async fn commit_events(&self, from_index: u32) -> Result<Vec<CommitEvent>>;
}

#[async_trait]
impl<L: Ledger + ?Sized> Ledger for std::sync::Arc<L> {
    async fn create_deposit_commitment(
        &self,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<CommitEvent> {
        (**self)
            .create_deposit_commitment(proof, public_signals)
            .await
    }

    async fn nullify_deposit_commitment(
        &self,
        proof: &VerifierProof,
        public_signals: &[Element],
        auth_commitment: Element,
        account: AccountId,
    ) -> Result<()> {
        (**self)
            .nullify_deposit_commitment(proof, public_signals, auth_commitment, account)
            .await
    }

    async fn transfer(&self, proof: &VerifierProof, public_signals: &[Element]) -> Result<()> {
        (**self).transfer(proof, public_signals).await
    }

    async fn approve(
        &self,
        holder: AccountId,
        spender: AccountId,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<()> {
        (**self)
            .approve(holder, spender, proof, public_signals)
            .await
    }

    async fn transfer_from(
        &self,
        holder: AccountId,
        spender: AccountId,
        receiver: AccountId,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<()> {
        (**self)
            .transfer_from(holder, spender, receiver, proof, public_signals)
            .await
    }

    async fn create_withdrawal_commitment(
        &self,
        account: AccountId,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<CommitEvent> {
        (**self)
            .create_withdrawal_commitment(account, proof, public_signals)
            .await
    }

    async fn nullify_withdrawal_commitment(
        &self,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<Element> {
        (**self)
            .nullify_withdrawal_commitment(proof, public_signals)
            .await
    }

    async fn balance_of(&self, account: AccountId) -> Result<Ciphertext> {
        (**self).balance_of(account).await
    }

    async fn get_allowance(&self, holder: AccountId, spender: AccountId) -> Result<Allowance> {
        (**self).get_allowance(holder, spender).await
    }

    async fn get_pub_key(&self, account: AccountId) -> Result<PublicKey> {
        (**self).get_pub_key(account).await
    }

    async fn auth_commitment_of(&self, account: AccountId) -> Result<Element> {
        (**self).auth_commitment_of(account).await
    }

    async fn get_last_root(&self) -> Result<Element> {
        (**self).get_last_root().await
    }

    async fn is_spent(&self, nullifier_hash: Element) -> Result<bool> {
        (**self).is_spent(nullifier_hash).await
    }

    async fn commit_events(&self, from_index: u32) -> Result<Vec<CommitEvent>> {
        (**self).commit_events(from_index).await
    }
}
