//! A pool of provers
//!
//! Each prover in the pool generates one proof at a time. With [`Pool`] wrapping `N` provers,
//! at most `N` proofs are generated at once, and further requests wait for a prover to free up.

use std::{collections::VecDeque, ops::Deref, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use zk_circuits::{CircuitKind, ProofOutput, Prover, ProverError, VerifierProof, Witness};
use zk_primitives::Element;

/// A pool of values that are checked out one task at a time
///
/// Cloning a [`Pool`] gives another handle to the same values.
pub struct Pool<T> {
    state: Arc<Mutex<PoolState<T>>>,
}

impl<T> Clone for Pool<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

struct PoolState<T> {
    values: VecDeque<T>,
    /// Unbounded, so that handing a value over in [`PoolGuard::drop`] doesn't need to await
    waiters: VecDeque<mpsc::UnboundedSender<PoolGuard<T>>>,
}

/// A value checked out of a [`Pool`], which goes back to the pool when dropped
pub struct PoolGuard<T> {
    return_state: Arc<Mutex<PoolState<T>>>,
    // only `None` while being dropped
    value: Option<T>,
}

impl<T> Pool<T> {
    /// A pool of `values`, handed out in order
    pub fn new(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            state: Arc::new(Mutex::new(PoolState {
                values: values.into_iter().collect(),
                waiters: VecDeque::new(),
            })),
        }
    }

    /// The number of values not currently checked out
    #[must_use]
    pub fn available(&self) -> usize {
        self.state.lock().values.len()
    }

    /// Check out a value, waiting for one to be returned if they are all in use
    pub async fn get(&self) -> PoolGuard<T> {
        loop {
            let mut receiver = {
                let mut state = self.state.lock();
                if let Some(value) = state.values.pop_front() {
                    return PoolGuard {
                        return_state: Arc::clone(&self.state),
                        value: Some(value),
                    };
                }

                let (sender, receiver) = mpsc::unbounded_channel();
                state.waiters.push_back(sender);

                receiver
            };

            if let Some(guard) = receiver.recv().await {
                return guard;
            }
        }
    }
}

impl<T> Deref for PoolGuard<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        #[allow(clippy::expect_used)]
        self.value.as_ref().expect("only taken in drop")
    }
}

impl<T> Drop for PoolGuard<T> {
    fn drop(&mut self) {
        let Some(mut value) = self.value.take() else {
            return;
        };

        let mut state = self.return_state.lock();

        while let Some(sender) = state.waiters.pop_front() {
            if sender.is_closed() {
                continue;
            }

            match sender.send(Self {
                return_state: Arc::clone(&self.return_state),
                value: Some(value),
            }) {
                Ok(()) => return,
                // the waiter gave up between the check and the send
                Err(mpsc::error::SendError(mut guard)) => match guard.value.take() {
                    Some(returned) => value = returned,
                    None => return,
                },
            }
        }

        // no one is waiting, so the value goes back to the pool
        state.values.push_back(value);
    }
}

#[async_trait]
impl<P: Prover> Prover for Pool<P> {
    async fn prove(&self, witness: &Witness) -> Result<ProofOutput, ProverError> {
        let prover = self.get().await;
        prover.prove(witness).await
    }

    async fn verify(
        &self,
        kind: CircuitKind,
        public_signals: &[Element],
        proof: &VerifierProof,
    ) -> Result<bool, ProverError> {
        let prover = self.get().await;
        prover.verify(kind, public_signals, proof).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use zk_circuits::{prover::MockProver, CreateDepositInputs, Note};

    use super::*;

    #[tokio::test]
    async fn values_are_reused_in_order() {
        let pool = Pool::new([1, 2, 3]);

        let guard = pool.get().await;
        assert_eq!(*guard, 1);
        drop(guard);
        assert_eq!(*pool.get().await, 2);
        assert_eq!(*pool.get().await, 3);

        let guard_1 = pool.get().await;
        let guard_2 = pool.get().await;
        let guard_3 = pool.get().await;
        assert_eq!((*guard_1, *guard_2, *guard_3), (1, 2, 3));
        assert_eq!(pool.available(), 0);

        let waiting = {
            let pool = pool.clone();
            tokio::spawn(async move {
                // blocks until guard_2 and guard_3 are returned
                let (guard_4, guard_5) = tokio::join!(pool.get(), pool.get());
                (*guard_4, *guard_5)
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(guard_2);
        drop(guard_3);

        assert_eq!(waiting.await.unwrap(), (2, 3));
        drop(guard_1);
        assert_eq!(pool.available(), 3);
    }

    #[tokio::test]
    async fn abandoned_waiters_are_skipped() {
        let pool = Pool::new([1]);
        let guard = pool.get().await;

        let abandoned = tokio::time::timeout(Duration::from_millis(10), pool.get()).await;
        assert!(abandoned.is_err());

        drop(guard);
        assert_eq!(pool.available(), 1);
        assert_eq!(*pool.get().await, 1);
    }

    #[tokio::test]
    async fn pooled_provers_share_the_work() {
        let prover = MockProver::new();
        let pool = Pool::new(vec![prover.clone(), prover.clone()]);

        let mut rng = testutil::rng(1);
        let witnesses: Vec<_> = (0..6)
            .map(|i| {
                let note = Note::random(Element::new(i), &mut rng);
                Witness::new(&CreateDepositInputs::new(note)).unwrap()
            })
            .collect();

        let proofs = prove_all(&pool, &witnesses).await;

        for (witness, output) in witnesses.iter().zip(proofs) {
            let output = output.unwrap();
            let verified = pool
                .verify(
                    witness.kind(),
                    &output.public_signals,
                    &output.proof.to_verifier_format(),
                )
                .await
                .unwrap();
            assert!(verified);
        }

        assert_eq!(prover.proof_count(), 6);
        assert_eq!(pool.available(), 2);
    }

    async fn prove_all(
        pool: &Pool<MockProver>,
        witnesses: &[Witness],
    ) -> Vec<Result<ProofOutput, ProverError>> {
        let mut handles = Vec::new();
        for witness in witnesses {
            let pool = pool.clone();
            let witness = witness.clone();
            handles.push(tokio::spawn(async move { pool.prove(&witness).await }));
        }

        let mut outputs = Vec::new();
        for handle in handles {
            outputs.push(handle.await.unwrap());
        }
        outputs
    }
}
