use std::{collections::HashMap, path::Path};

use rocksdb::{Direction, IteratorMode, WriteBatch, DB};
use zk_primitives::Element;

pub use error::Error;

use crate::{CommitEvent, Tree};

use self::format::{leaf_key, leaf_prefix, parse_leaf_key, LeafRecord};

mod error;
mod format;

#[cfg(test)]
mod tests;

/// A wrapper around [`Tree`] that persists the leaf sequence to a rocksdb instance
///
/// Only leaves are stored. Internal digests are recomputed on load, which keeps the database
/// small and means there is nothing that can go out of sync with the leaves.
///
/// ```rust
/// # use accumulator::*;
/// # use accumulator::storage::*;
/// # let dir = tempdir::TempDir::new("accumulator_doctest").unwrap();
/// # let path = dir.path().join("db");
/// let mut persistent = Persistent::<20>::open(&path).unwrap();
/// persistent.insert(Element::new(1)).unwrap();
/// let root = persistent.tree().root();
///
/// drop(persistent);
///
/// let persistent = Persistent::<20>::open(&path).unwrap();
/// assert_eq!(persistent.tree().root(), root);
/// ```
pub struct Persistent<const DEPTH: usize> {
    tree: Tree<DEPTH>,
    db: DB,
}

impl<const DEPTH: usize> Persistent<DEPTH> {
    /// Open (or create) the database at `path`, and load the tree it contains
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut options = rocksdb::Options::default();
        options.create_if_missing(true);

        let db = DB::open(&options, path)?;
        let tree = load_tree(&db)?;

        tracing::info!(leaves = tree.len(), root = %tree.root(), "loaded commitment tree");

        Ok(Self { tree, db })
    }

    /// Get a reference to the wrapped tree
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &Tree<DEPTH> {
        &self.tree
    }

    /// Split this instance into the [`Tree`] and [`DB`] that make up this [`Persistent`]
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (Tree<DEPTH>, DB) {
        let Self { tree, db } = self;
        (tree, db)
    }

    /// Append a commitment to the tree and the database
    ///
    /// The leaf is written to rocksdb first, so a failed write leaves the in-memory tree
    /// untouched
    pub fn insert(&mut self, commitment: Element) -> Result<u32, Error> {
        let indices = self.insert_records([(commitment, None)])?;
        Ok(indices[0])
    }

    /// Append every commitment in `commitments`, in one rocksdb write
    pub fn insert_batch<I>(&mut self, commitments: I) -> Result<Vec<u32>, Error>
    where
        I: IntoIterator<Item = Element>,
    {
        self.insert_records(commitments.into_iter().map(|commitment| (commitment, None)))
    }

    /// Apply the ledger's `Commit` events, persisting the new leaves
    ///
    /// See [`Tree::replay`] for how already-known and out-of-order events are handled
    pub fn replay<I>(&mut self, events: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = CommitEvent>,
    {
        let events: Vec<_> = events.into_iter().collect();
        let timestamps: HashMap<u32, u64> = events
            .iter()
            .map(|event| (event.leaf_index, event.timestamp))
            .collect();

        // replay into a copy first, so that nothing is persisted if the history is inconsistent
        let mut replayed = self.tree.clone();
        let applied = replayed.replay(events)?;

        let mut batch = WriteBatch::default();
        for index in self.tree.len()..replayed.len() {
            let record = LeafRecord::V1 {
                commitment: replayed.leaves()[index as usize],
                timestamp: timestamps.get(&index).copied(),
            };
            batch.put(leaf_key(index), record.to_bytes()?);
        }

        self.db.write(batch)?;
        self.tree = replayed;

        Ok(applied)
    }

    fn insert_records<I>(&mut self, records: I) -> Result<Vec<u32>, Error>
    where
        I: IntoIterator<Item = (Element, Option<u64>)>,
    {
        let records: Vec<_> = records.into_iter().collect();

        let free = Tree::<DEPTH>::capacity() - u64::from(self.tree.len());
        if records.len() as u64 > free {
            return Err(crate::Error::TreeFull {
                capacity: Tree::<DEPTH>::capacity(),
            }
            .into());
        }

        let mut batch = WriteBatch::default();
        for (index, (commitment, timestamp)) in (self.tree.len()..).zip(&records) {
            let record = LeafRecord::V1 {
                commitment: *commitment,
                timestamp: *timestamp,
            };
            batch.put(leaf_key(index), record.to_bytes()?);
        }
        self.db.write(batch)?;

        let indices = self
            .tree
            .insert_batch(records.into_iter().map(|(commitment, _)| commitment))?;

        Ok(indices)
    }
}

fn load_tree<const DEPTH: usize>(db: &DB) -> Result<Tree<DEPTH>, Error> {
    let prefix = leaf_prefix();
    let mut leaves = Vec::new();

    for entry in db.iterator(IteratorMode::From(&prefix, Direction::Forward)) {
        let (key, value) = entry?;

        let Some(index) = parse_leaf_key(&key) else {
            break;
        };

        let expected = u32::try_from(leaves.len()).unwrap_or(u32::MAX);
        if index != expected {
            return Err(Error::DatabaseConsistency {
                expected,
                found: index,
            });
        }

        leaves.push(LeafRecord::from_bytes(&value)?.commitment());
    }

    Ok(Tree::from_leaves(leaves)?)
}
