use std::{
    collections::{HashMap, HashSet},
    time::{SystemTime, UNIX_EPOCH},
};

use accumulator::{CommitEvent, ProtocolTree};
use async_trait::async_trait;
use num_bigint::BigUint;
use paillier::{Ciphertext, PublicKey};
use parking_lot::Mutex;
use zk_circuits::{CircuitKind, Prover, VerifierProof};
use zk_primitives::Element;

use crate::{Account, AccountId, Allowance, Ledger, LedgerError, Result};

/// A ledger that keeps its state in memory, verifying proofs with `P`
///
/// This has the same rules as the deployed contract, so a client that works against it works
/// against the chain. Proofs are verified before the state lock is taken, and every check on the
/// state happens before anything is written, so a rejected operation changes nothing.
#[derive(Debug)]
pub struct InMemoryLedger<P> {
    prover: P,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    tree: ProtocolTree,
    events: Vec<CommitEvent>,
    spent: HashSet<Element>,
    accounts: HashMap<AccountId, Account>,
    allowances: HashMap<(AccountId, AccountId), Allowance>,
}

fn ciphertext(element: Element) -> Ciphertext {
    Ciphertext::new(BigUint::from(element))
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

impl State {
    fn account(&self, id: AccountId) -> Result<&Account> {
        self.accounts.get(&id).ok_or(LedgerError::UnknownAccount(id))
    }

    fn account_mut(&mut self, id: AccountId) -> Result<&mut Account> {
        self.accounts
            .get_mut(&id)
            .ok_or(LedgerError::UnknownAccount(id))
    }

    fn check_root(&self, root: Element) -> Result<()> {
        let current = self.tree.root();
        if root != current {
            return Err(LedgerError::StaleRoot {
                current,
                found: root,
            });
        }

        Ok(())
    }

    fn check_unspent(&self, nullifier_hash: Element) -> Result<()> {
        if self.spent.contains(&nullifier_hash) {
            return Err(LedgerError::NullifierReuse(nullifier_hash));
        }

        Ok(())
    }

    fn check_balance(&self, id: AccountId, balance: Element) -> Result<()> {
        if self.account(id)?.balance != ciphertext(balance) {
            return Err(LedgerError::StaleBalance { account: id });
        }

        Ok(())
    }

    fn check_auth(&self, id: AccountId, auth_commitment: Element) -> Result<()> {
        if self.account(id)?.auth_commitment != auth_commitment {
            return Err(LedgerError::Unauthorized { account: id });
        }

        Ok(())
    }

    fn credit(&mut self, id: AccountId, amount: Element) -> Result<()> {
        let account = self.account_mut(id)?;
        account.balance = account
            .public_key
            .add(&account.balance, &ciphertext(amount));
        Ok(())
    }

    fn commit(&mut self, commitment: Element) -> Result<CommitEvent> {
        let leaf_index = self.tree.insert(commitment)?;
        let event = CommitEvent {
            commitment,
            leaf_index,
            timestamp: timestamp(),
        };

        self.events.push(event);
        Ok(event)
    }
}

impl<P: Prover> InMemoryLedger<P> {
    /// An empty ledger, with an empty commitment tree and no accounts
    pub fn new(prover: P) -> Self {
        Self {
            prover,
            state: Mutex::new(State::default()),
        }
    }

    /// The prover used to verify proofs
    pub fn prover(&self) -> &P {
        &self.prover
    }

    /// Check the signal count and the proof, returning the signals as an array
    async fn verify<const N: usize>(
        &self,
        kind: CircuitKind,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<[Element; N]> {
        let signals = <[Element; N]>::try_from(public_signals)
            .ok()
            .filter(|_| N == kind.public_signal_count())
            .ok_or(LedgerError::WrongSignalCount {
                kind,
                expected: kind.public_signal_count(),
                found: public_signals.len(),
            })?;

        if !self.prover.verify(kind, public_signals, proof).await? {
            return Err(LedgerError::ProofVerificationFailure { kind });
        }

        Ok(signals)
    }
}

#[async_trait]
impl<P: Prover> Ledger for InMemoryLedger<P> {
    #[tracing::instrument(err, skip_all)]
    async fn create_deposit_commitment(
        &self,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<CommitEvent> {
        let [commitment] = self
            .verify::<1>(CircuitKind::CreateDepositCommitment, proof, public_signals)
            .await?;

        let event = self.state.lock().commit(commitment)?;
        tracing::info!(leaf_index = event.leaf_index, "deposit commitment added");
        Ok(event)
    }

    #[tracing::instrument(err, skip(self, proof, public_signals))]
    async fn nullify_deposit_commitment(
        &self,
        proof: &VerifierProof,
        public_signals: &[Element],
        auth_commitment: Element,
        account: AccountId,
    ) -> Result<()> {
        let [root, nullifier_hash, balance, g, n] = self
            .verify::<5>(CircuitKind::NullifyDepositCommitment, proof, public_signals)
            .await?;
        let public_key = PublicKey::with_generator(BigUint::from(n), BigUint::from(g))?;

        let mut state = self.state.lock();
        state.check_root(root)?;
        state.check_unspent(nullifier_hash)?;

        let registered = state.accounts.get(&account).map(|existing| {
            existing.public_key == public_key && existing.auth_commitment == auth_commitment
        });

        match registered {
            Some(true) => state.credit(account, balance)?,
            Some(false) => return Err(LedgerError::Unauthorized { account }),
            None => {
                // auth commitments and keys identify senders and receivers
                let taken = state.accounts.values().any(|other| {
                    other.auth_commitment == auth_commitment
                        || other.public_key.n() == public_key.n()
                });
                if taken {
                    return Err(LedgerError::Unauthorized { account });
                }

                state.accounts.insert(
                    account,
                    Account {
                        public_key,
                        balance: ciphertext(balance),
                        auth_commitment,
                    },
                );
            }
        }

        state.spent.insert(nullifier_hash);
        tracing::info!("deposit nullified");
        Ok(())
    }

    #[tracing::instrument(err, skip_all)]
    async fn transfer(&self, proof: &VerifierProof, public_signals: &[Element]) -> Result<()> {
        let [balance, debit, credit, auth_commitment, receiver_n] = self
            .verify::<5>(CircuitKind::Transfer, proof, public_signals)
            .await?;

        let mut state = self.state.lock();

        let sender = state
            .accounts
            .iter()
            .find(|(_, account)| account.auth_commitment == auth_commitment)
            .map(|(id, _)| *id)
            .ok_or(LedgerError::UnknownAuthCommitment(auth_commitment))?;

        let modulus = BigUint::from(receiver_n);
        let receiver = state
            .accounts
            .iter()
            .find(|(_, account)| account.public_key.n() == &modulus)
            .map(|(id, _)| *id)
            .ok_or(LedgerError::UnknownPublicKey(receiver_n))?;

        state.check_balance(sender, balance)?;

        state.credit(sender, debit)?;
        state.credit(receiver, credit)?;

        tracing::info!(%sender, %receiver, "transfer applied");
        Ok(())
    }

    #[tracing::instrument(err, skip(self, proof, public_signals))]
    async fn approve(
        &self,
        holder: AccountId,
        spender: AccountId,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<()> {
        let [balance, debit, holder_allowance, spender_allowance, auth_commitment] = self
            .verify::<5>(CircuitKind::Approve, proof, public_signals)
            .await?;

        let mut state = self.state.lock();
        state.check_auth(holder, auth_commitment)?;
        state.check_balance(holder, balance)?;
        state.account(spender)?;

        state.credit(holder, debit)?;

        let replaced = state.allowances.insert(
            (holder, spender),
            Allowance {
                holder: ciphertext(holder_allowance),
                spender: ciphertext(spender_allowance),
            },
        );

        if let Some(old) = replaced {
            let account = state.account_mut(holder)?;
            account.balance = account.public_key.add(&account.balance, &old.holder);
        }

        tracing::info!("allowance set");
        Ok(())
    }

    #[tracing::instrument(err, skip(self, proof, public_signals))]
    async fn transfer_from(
        &self,
        holder: AccountId,
        spender: AccountId,
        receiver: AccountId,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<()> {
        let [spender_view, holder_debit, spender_debit, credit, auth_commitment] = self
            .verify::<5>(CircuitKind::TransferFrom, proof, public_signals)
            .await?;

        let mut state = self.state.lock();
        state.check_auth(spender, auth_commitment)?;
        state.account(receiver)?;

        let holder_key = state.account(holder)?.public_key.clone();
        let spender_key = state.account(spender)?.public_key.clone();

        let allowance = state
            .allowances
            .get_mut(&(holder, spender))
            .ok_or(LedgerError::NoAllowance { holder, spender })?;

        if allowance.spender != ciphertext(spender_view) {
            return Err(LedgerError::StaleBalance { account: spender });
        }

        allowance.holder = holder_key.add(&allowance.holder, &ciphertext(holder_debit));
        allowance.spender = spender_key.add(&allowance.spender, &ciphertext(spender_debit));

        state.credit(receiver, credit)?;

        tracing::info!("allowance spent");
        Ok(())
    }

    #[tracing::instrument(err, skip(self, proof, public_signals))]
    async fn create_withdrawal_commitment(
        &self,
        account: AccountId,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<CommitEvent> {
        let [balance, debit, commitment] = self
            .verify::<3>(CircuitKind::CreateWithdrawalCommitment, proof, public_signals)
            .await?;

        let mut state = self.state.lock();
        state.check_balance(account, balance)?;

        let event = state.commit(commitment)?;
        state.credit(account, debit)?;

        tracing::info!(leaf_index = event.leaf_index, "withdrawal commitment added");
        Ok(event)
    }

    #[tracing::instrument(err, skip_all)]
    async fn nullify_withdrawal_commitment(
        &self,
        proof: &VerifierProof,
        public_signals: &[Element],
    ) -> Result<Element> {
        let [root, nullifier_hash, value] = self
            .verify::<3>(CircuitKind::NullifyWithdrawalCommitment, proof, public_signals)
            .await?;

        let mut state = self.state.lock();
        state.check_root(root)?;
        state.check_unspent(nullifier_hash)?;

        state.spent.insert(nullifier_hash);
        tracing::info!(%value, "withdrawal released");
        Ok(value)
    }

    async fn balance_of(&self, account: AccountId) -> Result<Ciphertext> {
        Ok(self.state.lock().account(account)?.balance.clone())
    }

    async fn get_allowance(&self, holder: AccountId, spender: AccountId) -> Result<Allowance> {
        self.state
            .lock()
            .allowances
            .get(&(holder, spender))
            .cloned()
            .ok_or(LedgerError::NoAllowance { holder, spender })
    }

    async fn get_pub_key(&self, account: AccountId) -> Result<PublicKey> {
        Ok(self.state.lock().account(account)?.public_key.clone())
    }

    async fn auth_commitment_of(&self, account: AccountId) -> Result<Element> {
        Ok(self.state.lock().account(account)?.auth_commitment)
    }

    async fn get_last_root(&self) -> Result<Element> {
        Ok(self.state.lock().tree.root())
    }

    async fn is_spent(&self, nullifier_hash: Element) -> Result<bool> {
        Ok(self.state.lock().spent.contains(&nullifier_hash))
    }

    async fn commit_events(&self, from_index: u32) -> Result<Vec<CommitEvent>> {
        let state = self.state.lock();
        let from = usize::try_from(from_index).unwrap_or(usize::MAX);

        Ok(state.events.get(from..).unwrap_or_default().to_vec())
    }
}
