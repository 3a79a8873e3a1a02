use std::future::Future;

use accumulator::{storage::Persistent, CommitEvent, SharedTree, PROTOCOL_DEPTH};
use contracts::{AccountId, Allowance, Ledger};
use num_bigint::BigUint;
use paillier::{KeyPair, PrivateKey, PublicKey};
use parking_lot::Mutex;
use rand::{CryptoRng, RngCore};
use zk_circuits::{
    prover::SnarkjsProver, ApproveInputs, Circuit, CreateDepositInputs, CreateWithdrawalInputs,
    Note, NullifyDepositInputs, NullifyWithdrawalInputs, Prover, TransferFromInputs,
    TransferInputs, VerifierProof, Witness, WitnessError,
};
use zk_primitives::{auth_commitment, Element};

use crate::{
    config::{ClientConfig, Config},
    pool::Pool,
    Error, Operation, Result,
};

/// rocksdb storage for the protocol's commitment tree
pub type ProtocolStorage = Persistent<PROTOCOL_DEPTH>;

/// Runs the protocol's operations against a [`Ledger`], proving with `P`
///
/// Randomness (for notes, and for every ciphertext the client encrypts) comes from `R`, which
/// must be a cryptographically secure RNG. Tests pass a seeded one.
pub struct Client<P, L, R> {
    prover: P,
    ledger: L,
    rng: Mutex<R>,
    tree: SharedTree<PROTOCOL_DEPTH>,
    storage: Option<Mutex<ProtocolStorage>>,
    stale_root_retries: u32,
}

impl<L, R> Client<Pool<SnarkjsProver>, L, R>
where
    L: Ledger,
    R: RngCore + CryptoRng + Send,
{
    /// A client proving with a pool of `config.prover.workers` snarkjs provers
    ///
    /// If `config.storage.path` is set, the local tree is loaded from (and persisted to) rocksdb
    pub fn from_config(config: &Config, ledger: L, rng: R) -> Result<Self> {
        let prover = SnarkjsProver::new(
            config.prover.artifacts_dir.clone(),
            config.prover.snarkjs_bin.clone(),
        );
        let pool = Pool::new(std::iter::repeat(prover).take(config.prover.workers.max(1)));

        let client = Self::new(pool, ledger, rng, &config.client);

        match &config.storage.path {
            Some(path) => Ok(client.with_storage(ProtocolStorage::open(path)?)),
            None => Ok(client),
        }
    }
}

impl<P, L, R> Client<P, L, R>
where
    P: Prover,
    L: Ledger,
    R: RngCore + CryptoRng + Send,
{
    /// A client with an empty local tree, which fills up on the first [`Client::sync`]
    pub fn new(prover: P, ledger: L, rng: R, config: &ClientConfig) -> Self {
        Self {
            prover,
            ledger,
            rng: Mutex::new(rng),
            tree: SharedTree::default(),
            storage: None,
            stale_root_retries: config.stale_root_retries,
        }
    }

    /// Keep the local tree in `storage`, starting from the leaves it already holds
    #[must_use]
    pub fn with_storage(self, storage: ProtocolStorage) -> Self {
        Self {
            tree: SharedTree::new(storage.tree().clone()),
            storage: Some(Mutex::new(storage)),
            ..self
        }
    }

    /// The ledger this client submits to
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The prover this client proves with
    pub fn prover(&self) -> &P {
        &self.prover
    }

    /// The local copy of the ledger's commitment tree
    pub fn tree(&self) -> &SharedTree<PROTOCOL_DEPTH> {
        &self.tree
    }

    /// Fetch the commit events the local tree is missing and apply them
    ///
    /// Returns the number of leaves added
    #[tracing::instrument(skip_all, err)]
    pub async fn sync(&self) -> Result<usize> {
        let events = self
            .ledger
            .commit_events(self.tree.len())
            .await
            .map_err(|source| Error::ledger(Operation::Sync, None, Vec::new(), source))?;

        if let Some(storage) = &self.storage {
            storage.lock().replay(events.iter().copied())?;
        }
        let applied = self.tree.replay(events)?;

        tracing::debug!(applied, len = self.tree.len(), "synced commitment tree");
        Ok(applied)
    }

    /// Commit to `note` on the ledger
    #[tracing::instrument(skip_all, err)]
    pub async fn create_deposit(&self, note: Note) -> Result<CommitEvent> {
        let op = Operation::CreateDeposit;

        let witness = self.witness(op, |_| Ok(CreateDepositInputs::new(note)))?;
        let (proof, signals) = self.prove(op, &witness).await?;

        let result = self.ledger.create_deposit_commitment(&proof, &signals).await;
        let event = result.map_err(|source| Error::ledger(op, None, signals, source))?;

        tracing::info!(leaf_index = event.leaf_index, "deposit committed");
        Ok(event)
    }

    /// Spend the deposit `note` into `account`, whose balance is encrypted under `key`
    ///
    /// The first deposit into an account registers `key` and `H(auth_secret)` for it.
    #[tracing::instrument(skip(self, note, key, auth_secret), err)]
    pub async fn nullify_deposit(
        &self,
        note: Note,
        key: &PublicKey,
        account: AccountId,
        auth_secret: Element,
    ) -> Result<()> {
        self.retry_stale_root(move || {
            self.nullify_deposit_once(note, key, account, auth_secret)
        })
        .await?;

        tracing::info!("deposit nullified");
        Ok(())
    }

    async fn nullify_deposit_once(
        &self,
        note: Note,
        key: &PublicKey,
        account: AccountId,
        auth_secret: Element,
    ) -> Result<()> {
        let op = Operation::NullifyDeposit;

        self.sync().await?;
        let path = self.tree.snapshot(note.commitment())?;

        let witness = self.witness(op, |rng| NullifyDepositInputs::build(note, &path, key, rng))?;
        let (proof, signals) = self.prove(op, &witness).await?;

        let result = self
            .ledger
            .nullify_deposit_commitment(&proof, &signals, auth_commitment(auth_secret), account)
            .await;
        result.map_err(|source| Error::ledger(op, Some(account), signals, source))
    }

    /// Deposit `value` into `account`: commit to a fresh note, then spend it
    ///
    /// Returns the note, which is spent by the time this returns
    pub async fn deposit(
        &self,
        key: &PublicKey,
        account: AccountId,
        value: Element,
        auth_secret: Element,
    ) -> Result<Note> {
        let note = Note::random(value, &mut *self.rng.lock());

        self.create_deposit(note).await?;
        self.nullify_deposit(note, key, account, auth_secret).await?;

        Ok(note)
    }

    /// Move `value` from `from` (whose keys are `sender`) to `to`
    #[tracing::instrument(skip(self, sender, value, auth_secret), err)]
    pub async fn transfer(
        &self,
        sender: &KeyPair,
        from: AccountId,
        to: AccountId,
        value: Element,
        auth_secret: Element,
    ) -> Result<()> {
        let op = Operation::Transfer;

        let balance = self.ledger.balance_of(from).await.map_err(Error::read)?;
        let receiver = self.ledger.get_pub_key(to).await.map_err(Error::read)?;

        let witness = self.witness(op, |rng| {
            TransferInputs::build(sender, &receiver, value, &balance, auth_secret, rng)
        })?;
        let (proof, signals) = self.prove(op, &witness).await?;

        let result = self.ledger.transfer(&proof, &signals).await;
        result.map_err(|source| Error::ledger(op, Some(from), signals, source))?;

        tracing::info!("transfer accepted");
        Ok(())
    }

    /// Let `spender` spend `value` of `holder`'s balance (whose keys are `holder_keys`)
    ///
    /// Replaces any allowance `holder` already gave `spender`.
    #[tracing::instrument(skip(self, holder_keys, value, auth_secret), err)]
    pub async fn approve(
        &self,
        holder_keys: &KeyPair,
        holder: AccountId,
        spender: AccountId,
        value: Element,
        auth_secret: Element,
    ) -> Result<()> {
        let op = Operation::Approve;

        let balance = self.ledger.balance_of(holder).await.map_err(Error::read)?;
        let spender_key = self.ledger.get_pub_key(spender).await.map_err(Error::read)?;

        let witness = self.witness(op, |rng| {
            ApproveInputs::build(holder_keys, &spender_key, value, &balance, auth_secret, rng)
        })?;
        let (proof, signals) = self.prove(op, &witness).await?;

        let result = self.ledger.approve(holder, spender, &proof, &signals).await;
        result.map_err(|source| Error::ledger(op, Some(holder), signals, source))?;

        tracing::info!("allowance set");
        Ok(())
    }

    /// Spend `value` of the allowance `holder` gave `spender` (whose keys are `spender_keys`),
    /// crediting `receiver`
    #[tracing::instrument(skip(self, spender_keys, value, auth_secret), err)]
    pub async fn transfer_from(
        &self,
        spender_keys: &KeyPair,
        holder: AccountId,
        spender: AccountId,
        receiver: AccountId,
        value: Element,
        auth_secret: Element,
    ) -> Result<()> {
        let op = Operation::TransferFrom;

        let allowance = self
            .ledger
            .get_allowance(holder, spender)
            .await
            .map_err(Error::read)?;
        let holder_key = self.ledger.get_pub_key(holder).await.map_err(Error::read)?;
        let receiver_key = self.ledger.get_pub_key(receiver).await.map_err(Error::read)?;

        let witness = self.witness(op, |rng| {
            TransferFromInputs::build(
                &holder_key,
                spender_keys,
                &receiver_key,
                value,
                &allowance.spender,
                auth_secret,
                rng,
            )
        })?;
        let (proof, signals) = self.prove(op, &witness).await?;

        let result = self
            .ledger
            .transfer_from(holder, spender, receiver, &proof, &signals)
            .await;
        result.map_err(|source| Error::ledger(op, Some(spender), signals, source))?;

        tracing::info!("allowance spent");
        Ok(())
    }

    /// Debit `value` from `account` (whose keys are `sender`) into a fresh withdrawal note
    #[tracing::instrument(skip(self, sender, value, auth_secret), err)]
    pub async fn create_withdrawal(
        &self,
        sender: &KeyPair,
        account: AccountId,
        value: Element,
        auth_secret: Element,
    ) -> Result<Note> {
        let op = Operation::CreateWithdrawal;

        let balance = self.ledger.balance_of(account).await.map_err(Error::read)?;

        let note = Note::random(value, &mut *self.rng.lock());
        let witness = self.witness(op, |rng| {
            CreateWithdrawalInputs::build(sender, note, &balance, auth_secret, rng)
        })?;
        let (proof, signals) = self.prove(op, &witness).await?;

        let result = self
            .ledger
            .create_withdrawal_commitment(account, &proof, &signals)
            .await;
        let event = result.map_err(|source| Error::ledger(op, Some(account), signals, source))?;

        tracing::info!(leaf_index = event.leaf_index, "withdrawal committed");
        Ok(note)
    }

    /// Spend the withdrawal `note`, returning the released amount
    #[tracing::instrument(skip_all, err)]
    pub async fn nullify_withdrawal(&self, note: Note) -> Result<Element> {
        let value = self
            .retry_stale_root(move || self.nullify_withdrawal_once(note))
            .await?;

        tracing::info!(%value, "withdrawal released");
        Ok(value)
    }

    async fn nullify_withdrawal_once(&self, note: Note) -> Result<Element> {
        let op = Operation::NullifyWithdrawal;

        self.sync().await?;
        let path = self.tree.snapshot(note.commitment())?;

        let witness = self.witness(op, |_| NullifyWithdrawalInputs::build(note, &path))?;
        let (proof, signals) = self.prove(op, &witness).await?;

        let result = self
            .ledger
            .nullify_withdrawal_commitment(&proof, &signals)
            .await;
        result.map_err(|source| Error::ledger(op, None, signals, source))
    }

    /// Withdraw `value` from `account`: debit it into a withdrawal note, then spend the note
    pub async fn withdraw(
        &self,
        sender: &KeyPair,
        account: AccountId,
        value: Element,
        auth_secret: Element,
    ) -> Result<Element> {
        let note = self
            .create_withdrawal(sender, account, value, auth_secret)
            .await?;
        self.nullify_withdrawal(note).await
    }

    /// Decrypt the balance of `account` with its private key
    pub async fn balance(&self, account: AccountId, key: &PrivateKey) -> Result<BigUint> {
        let balance = self.ledger.balance_of(account).await.map_err(Error::read)?;
        Ok(key.decrypt(&balance)?)
    }

    /// The allowance `holder` gave `spender`
    pub async fn allowance(&self, holder: AccountId, spender: AccountId) -> Result<Allowance> {
        self.ledger
            .get_allowance(holder, spender)
            .await
            .map_err(Error::read)
    }

    /// Run `attempt` again while it fails with a stale root, up to the configured number of
    /// retries
    async fn retry_stale_root<T, F, Fut>(&self, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retries = 0;

        loop {
            match attempt().await {
                Err(err) if err.is_retryable() && retries < self.stale_root_retries => {
                    retries += 1;
                    tracing::warn!(retries, error = %err, "root went stale, proving again");
                }
                result => return result,
            }
        }
    }

    fn witness<C: Circuit>(
        &self,
        operation: Operation,
        build: impl FnOnce(&mut R) -> Result<C, WitnessError>,
    ) -> Result<Witness> {
        let inputs = build(&mut *self.rng.lock())
            .map_err(|source| Error::Witness { operation, source })?;

        Witness::new(&inputs).map_err(|source| Error::Witness { operation, source })
    }

    async fn prove(
        &self,
        operation: Operation,
        witness: &Witness,
    ) -> Result<(VerifierProof, Vec<Element>)> {
        let output = self
            .prover
            .prove(witness)
            .await
            .map_err(|source| Error::Prover { operation, source })?;

        Ok((output.proof.to_verifier_format(), output.public_signals))
    }
}
