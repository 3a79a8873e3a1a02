use std::collections::HashMap;

use rayon::prelude::*;
use zk_primitives::{hash_merge, Element};

use crate::{empty_tree_hash, CommitEvent, Error, Tree};

/// Levels narrower than this are hashed on the current thread
const PARALLEL_THRESHOLD: usize = 1024;

impl<const DEPTH: usize> Tree<DEPTH> {
    /// Build a tree from scratch from an ordered leaf sequence
    ///
    /// Each level is hashed in one pass (in parallel for wide levels), which is much faster than
    /// calling [`Tree::insert`] for every leaf. The result is identical.
    ///
    /// ```rust
    /// # use accumulator::*;
    /// let leaves: Vec<_> = (0..100).map(Element::new).collect();
    ///
    /// let mut incremental = Tree::<10>::new();
    /// incremental.insert_batch(leaves.iter().copied()).unwrap();
    ///
    /// let rebuilt = Tree::<10>::from_leaves(leaves).unwrap();
    /// assert_eq!(rebuilt.root(), incremental.root());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::TreeFull`] if there are more leaves than [`Tree::capacity`]
    pub fn from_leaves<I>(leaves: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Element>,
    {
        let leaves: Vec<Element> = leaves.into_iter().collect();
        if leaves.len() as u64 > Self::capacity() {
            return Err(Error::TreeFull {
                capacity: Self::capacity(),
            });
        }

        let mut tree = Self::new();

        let mut indices = HashMap::with_capacity(leaves.len());
        for (index, leaf) in (0u32..).zip(&leaves) {
            indices.entry(*leaf).or_insert(index);
        }
        tree.indices = indices;
        tree.levels[0] = leaves;

        for level in 0..DEPTH {
            let next = hash_level(&tree.levels[level], empty_tree_hash(level));
            tree.levels[level + 1] = next;
        }

        Ok(tree)
    }

    /// Apply the ledger's `Commit` events to this tree, returning the number of new leaves
    ///
    /// Events may arrive in any order and may overlap with leaves the tree already has: they are
    /// sorted by `leaf_index`, and events for existing leaves are checked and skipped.
    ///
    /// ```rust
    /// # use accumulator::*;
    /// let events = [
    ///     CommitEvent { commitment: Element::new(2), leaf_index: 1, timestamp: 20 },
    ///     CommitEvent { commitment: Element::new(1), leaf_index: 0, timestamp: 10 },
    /// ];
    ///
    /// let mut tree = Tree::<20>::new();
    /// assert_eq!(tree.replay(events).unwrap(), 2);
    /// assert_eq!(tree.leaves(), &[Element::new(1), Element::new(2)]);
    ///
    /// // replaying the same history again is a no-op
    /// assert_eq!(tree.replay(events).unwrap(), 0);
    /// ```
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfOrder`] if the events leave a gap after the last leaf
    /// - [`Error::ReplayMismatch`] if an event disagrees with a leaf already in the tree
    /// - [`Error::TreeFull`] if the events overflow the tree
    ///
    /// In every case, the events before the failing one have been applied.
    pub fn replay<I>(&mut self, events: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = CommitEvent>,
    {
        let mut events: Vec<_> = events.into_iter().collect();
        events.sort_by_key(|event| event.leaf_index);

        let mut applied = 0;

        for CommitEvent {
            commitment,
            leaf_index,
            ..
        } in events
        {
            let expected = self.len();

            if leaf_index < expected {
                let in_tree = self.levels[0][leaf_index as usize];
                if in_tree != commitment {
                    return Err(Error::ReplayMismatch {
                        index: leaf_index,
                        in_tree,
                        event: commitment,
                    });
                }

                continue;
            }

            if leaf_index > expected {
                return Err(Error::OutOfOrder {
                    expected,
                    found: leaf_index,
                });
            }

            self.insert(commitment)?;
            applied += 1;
        }

        tracing::debug!(applied, len = self.len(), "replayed commit events");

        Ok(applied)
    }
}

fn hash_level(nodes: &[Element], empty: Element) -> Vec<Element> {
    let hash_pair = |pair: &[Element]| match *pair {
        [left, right] => hash_merge([left, right]),
        [left] => hash_merge([left, empty]),
        _ => unreachable!("chunks of 2 are never empty or larger than 2"),
    };

    if nodes.len() < PARALLEL_THRESHOLD {
        nodes.chunks(2).map(hash_pair).collect()
    } else {
        nodes.par_chunks(2).map(hash_pair).collect()
    }
}
