use std::sync::Arc;

use async_trait::async_trait;
use client::{config::ClientConfig, Client, Config, Error, Operation, ProtocolStorage};
use contracts::{AccountId, InMemoryLedger, Ledger, LedgerError};
use paillier::KeyPair;
use parking_lot::Mutex;
use rand_chacha::ChaCha20Rng;
use zk_circuits::{
    prover::MockProver, CircuitKind, CreateDepositInputs, Note, ProofOutput, Prover, ProverError,
    VerifierProof, Witness, WitnessError,
};
use zk_primitives::Element;

const ALICE: AccountId = AccountId(1);
const BOB: AccountId = AccountId(2);
const CAROL: AccountId = AccountId(3);

type SharedLedger = Arc<InMemoryLedger<MockProver>>;

fn auth_secret(account: AccountId) -> Element {
    Element::new(1000 + account.0)
}

fn client(seed: u64) -> Client<MockProver, SharedLedger, ChaCha20Rng> {
    let prover = MockProver::new();
    let ledger = Arc::new(InMemoryLedger::new(prover.clone()));

    Client::new(prover, ledger, testutil::rng(seed), &ClientConfig::default())
}

async fn deposit<P: Prover>(
    client: &Client<P, SharedLedger, ChaCha20Rng>,
    account: AccountId,
    keys: &KeyPair,
    value: u64,
) {
    client
        .deposit(
            keys.public_key(),
            account,
            Element::new(value),
            auth_secret(account),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn transfer_between_two_deposits() {
    let client = client(1);
    let (alice, bob) = (testutil::key_pair(0), testutil::key_pair(1));

    deposit(&client, ALICE, &alice, 100).await;
    deposit(&client, BOB, &bob, 100).await;

    client
        .transfer(&alice, ALICE, BOB, Element::new(20), auth_secret(ALICE))
        .await
        .unwrap();

    let alice_balance = client.balance(ALICE, alice.private_key()).await.unwrap();
    let bob_balance = client.balance(BOB, bob.private_key()).await.unwrap();
    assert_eq!(alice_balance, 80u32.into());
    assert_eq!(bob_balance, 120u32.into());

    assert_eq!(client.tree().len(), 2);
    assert_eq!(
        client.tree().root(),
        client.ledger().get_last_root().await.unwrap()
    );
}

#[tokio::test]
async fn allowance_is_spent_from_both_views() {
    let client = client(2);
    let (alice, bob, carol) = (
        testutil::key_pair(0),
        testutil::key_pair(1),
        testutil::key_pair(2),
    );

    deposit(&client, ALICE, &alice, 100).await;
    deposit(&client, BOB, &bob, 1).await;
    deposit(&client, CAROL, &carol, 5).await;

    client
        .approve(&alice, ALICE, BOB, Element::new(30), auth_secret(ALICE))
        .await
        .unwrap();
    client
        .transfer_from(&bob, ALICE, BOB, CAROL, Element::new(10), auth_secret(BOB))
        .await
        .unwrap();

    let allowance = client.allowance(ALICE, BOB).await.unwrap();
    assert_eq!(
        alice.private_key().decrypt(&allowance.holder).unwrap(),
        20u32.into()
    );
    assert_eq!(
        bob.private_key().decrypt(&allowance.spender).unwrap(),
        20u32.into()
    );

    let alice_balance = client.balance(ALICE, alice.private_key()).await.unwrap();
    let carol_balance = client.balance(CAROL, carol.private_key()).await.unwrap();
    assert_eq!(alice_balance, 70u32.into());
    assert_eq!(carol_balance, 15u32.into());
}

#[tokio::test]
async fn withdrawal_is_released_once() {
    let client = client(3);
    let alice = testutil::key_pair(0);
    deposit(&client, ALICE, &alice, 100).await;

    let note = client
        .create_withdrawal(&alice, ALICE, Element::new(40), auth_secret(ALICE))
        .await
        .unwrap();
    let released = client.nullify_withdrawal(note).await.unwrap();

    assert_eq!(released, Element::new(40));
    let balance = client.balance(ALICE, alice.private_key()).await.unwrap();
    assert_eq!(balance, 60u32.into());

    let err = client.nullify_withdrawal(note).await.unwrap_err();
    assert!(!err.is_retryable());
    assert!(matches!(
        err,
        Error::Ledger {
            operation: Operation::NullifyWithdrawal,
            source: LedgerError::NullifierReuse(_),
            ..
        }
    ));
}

#[tokio::test]
async fn overdrawing_fails_before_proving() {
    let client = client(4);
    let (alice, bob) = (testutil::key_pair(0), testutil::key_pair(1));
    deposit(&client, ALICE, &alice, 10).await;
    deposit(&client, BOB, &bob, 10).await;

    let proofs = client.prover().proof_count();
    let err = client
        .transfer(&alice, ALICE, BOB, Element::new(11), auth_secret(ALICE))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Witness {
            operation: Operation::Transfer,
            source: WitnessError::InsufficientBalance,
        }
    ));
    assert_eq!(client.prover().proof_count(), proofs);
}

#[tokio::test]
async fn rejections_carry_the_submitted_signals() {
    let client = client(5);
    let (alice, bob) = (testutil::key_pair(0), testutil::key_pair(1));
    deposit(&client, ALICE, &alice, 10).await;

    // a second deposit into the same account under a different key
    let err = client
        .deposit(bob.public_key(), ALICE, Element::new(5), auth_secret(ALICE))
        .await
        .unwrap_err();

    let Error::Ledger {
        operation,
        account,
        public_signals,
        source,
    } = err
    else {
        panic!("expected a ledger rejection, got {err:?}");
    };
    assert_eq!(operation, Operation::NullifyDeposit);
    assert_eq!(account, Some(ALICE));
    assert_eq!(public_signals.len(), 5);
    assert!(matches!(source, LedgerError::Unauthorized { account } if account == ALICE));
}

/// Lands a competing deposit on the ledger while the first nullify-deposit proof is generated,
/// so that the root the proof was built against is no longer the latest
struct RacingProver {
    inner: MockProver,
    ledger: SharedLedger,
    competing: Mutex<Option<ProofOutput>>,
}

impl RacingProver {
    async fn new(inner: MockProver, ledger: SharedLedger, seed: u64) -> Self {
        let note = Note::random(Element::new(7), &mut testutil::rng(seed));
        let witness = Witness::new(&CreateDepositInputs::new(note)).unwrap();
        let competing = inner.prove(&witness).await.unwrap();

        Self {
            inner,
            ledger,
            competing: Mutex::new(Some(competing)),
        }
    }
}

#[async_trait]
impl Prover for RacingProver {
    async fn prove(&self, witness: &Witness) -> Result<ProofOutput, ProverError> {
        let output = self.inner.prove(witness).await?;

        if witness.kind() == CircuitKind::NullifyDepositCommitment {
            let competing = self.competing.lock().take();
            if let Some(competing) = competing {
                self.ledger
                    .create_deposit_commitment(
                        &competing.proof.to_verifier_format(),
                        &competing.public_signals,
                    )
                    .await
                    .unwrap();
            }
        }

        Ok(output)
    }

    async fn verify(
        &self,
        kind: CircuitKind,
        public_signals: &[Element],
        proof: &VerifierProof,
    ) -> Result<bool, ProverError> {
        self.inner.verify(kind, public_signals, proof).await
    }
}

async fn racing_client(
    seed: u64,
    stale_root_retries: u32,
) -> Client<RacingProver, SharedLedger, ChaCha20Rng> {
    let mock = MockProver::new();
    let ledger = Arc::new(InMemoryLedger::new(mock.clone()));
    let prover = RacingProver::new(mock, Arc::clone(&ledger), seed + 100).await;

    Client::new(
        prover,
        ledger,
        testutil::rng(seed),
        &ClientConfig { stale_root_retries },
    )
}

#[tokio::test]
async fn stale_root_is_proven_again() {
    let client = racing_client(6, 1).await;
    let alice = testutil::key_pair(0);

    deposit(&client, ALICE, &alice, 50).await;

    let balance = client.balance(ALICE, alice.private_key()).await.unwrap();
    assert_eq!(balance, 50u32.into());
    assert_eq!(client.tree().len(), 2);

    // the competing deposit, the deposit commitment, and two nullify proofs
    assert_eq!(client.prover().inner.proof_count(), 4);
}

#[tokio::test]
async fn stale_root_is_reported_without_retries() {
    let client = racing_client(7, 0).await;
    let alice = testutil::key_pair(0);

    let err = client
        .deposit(
            alice.public_key(),
            ALICE,
            Element::new(50),
            auth_secret(ALICE),
        )
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(err.operation(), Some(Operation::NullifyDeposit));
    assert!(matches!(
        err,
        Error::Ledger {
            account: Some(ALICE),
            source: LedgerError::StaleRoot { .. },
            ..
        }
    ));

    let unknown = client.ledger().get_pub_key(ALICE).await.unwrap_err();
    assert!(matches!(unknown, LedgerError::UnknownAccount(ALICE)));
}

#[tokio::test]
async fn tree_is_persisted_between_clients() {
    let dir = tempdir::TempDir::new("zktips_client").unwrap();
    let path = dir.path().join("tree");

    let prover = MockProver::new();
    let ledger = Arc::new(InMemoryLedger::new(prover.clone()));
    let alice = testutil::key_pair(0);

    {
        let client = Client::new(
            prover.clone(),
            Arc::clone(&ledger),
            testutil::rng(8),
            &ClientConfig::default(),
        )
        .with_storage(ProtocolStorage::open(&path).unwrap());

        deposit(&client, ALICE, &alice, 30).await;
        deposit(&client, ALICE, &alice, 12).await;
    }

    let client = Client::new(
        prover,
        Arc::clone(&ledger),
        testutil::rng(9),
        &ClientConfig::default(),
    )
    .with_storage(ProtocolStorage::open(&path).unwrap());

    assert_eq!(client.tree().len(), 2);
    assert_eq!(client.tree().root(), ledger.get_last_root().await.unwrap());
    assert_eq!(client.sync().await.unwrap(), 0);

    let balance = client.balance(ALICE, alice.private_key()).await.unwrap();
    assert_eq!(balance, 42u32.into());
}

#[tokio::test]
async fn configured_client_reports_missing_circuits() {
    let dir = tempdir::TempDir::new("zktips_client_config").unwrap();

    let mut config = Config::default();
    config.prover.artifacts_dir = dir.path().join("circuits");
    config.prover.workers = 2;
    config.storage.path = Some(dir.path().join("tree"));

    let ledger = Arc::new(InMemoryLedger::new(MockProver::new()));
    let client = Client::from_config(&config, ledger, testutil::rng(10)).unwrap();
    assert_eq!(client.prover().available(), 2);

    let note = Note::random(Element::new(1), &mut testutil::rng(11));
    let err = client.create_deposit(note).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Prover {
            operation: Operation::CreateDeposit,
            source: ProverError::MissingArtifact(_),
        }
    ));
}
