use std::sync::Arc;

use parking_lot::RwLock;
use zk_primitives::Element;

use crate::{CommitEvent, Error, Path, Tree};

/// A [`Tree`] that can be shared between tasks
///
/// Inserts take an exclusive lock, so leaf indices are handed out strictly in order. Reads take a
/// shared lock, and [`SharedTree::snapshot`] reads the root and the path under the *same* lock, so
/// a snapshot is never torn by a concurrent insert.
///
/// Cloning a [`SharedTree`] is cheap, and the clones refer to the same tree.
///
/// ```rust
/// # use accumulator::*;
/// let shared = SharedTree::<20>::default();
/// let clone = shared.clone();
///
/// clone.insert(Element::new(1)).unwrap();
///
/// let path = shared.snapshot(Element::new(1)).unwrap();
/// assert_eq!(path.root, shared.root());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedTree<const DEPTH: usize> {
    inner: Arc<RwLock<Tree<DEPTH>>>,
}

impl<const DEPTH: usize> From<Tree<DEPTH>> for SharedTree<DEPTH> {
    fn from(tree: Tree<DEPTH>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }
}

impl<const DEPTH: usize> SharedTree<DEPTH> {
    /// Wrap a [`Tree`]
    #[must_use]
    pub fn new(tree: Tree<DEPTH>) -> Self {
        Self::from(tree)
    }

    /// See [`Tree::insert`]
    pub fn insert(&self, commitment: Element) -> Result<u32, Error> {
        self.inner.write().insert(commitment)
    }

    /// See [`Tree::replay`]
    pub fn replay<I>(&self, events: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = CommitEvent>,
    {
        self.inner.write().replay(events)
    }

    /// Replace the whole tree, for example after rebuilding it from a fresh event history
    pub fn replace(&self, tree: Tree<DEPTH>) {
        *self.inner.write() = tree;
    }

    /// The current root
    #[must_use]
    pub fn root(&self) -> Element {
        self.inner.read().root()
    }

    /// The current number of leaves
    #[must_use]
    pub fn len(&self) -> u32 {
        self.inner.read().len()
    }

    /// Whether the tree has no leaves
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// A path for `commitment` together with the root it proves, read atomically
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownElement`] if `commitment` was never inserted
    pub fn snapshot(&self, commitment: Element) -> Result<Path<DEPTH>, Error> {
        self.inner.read().proof(commitment)
    }

    /// Run `f` against the tree while holding the shared lock
    pub fn read<T>(&self, f: impl FnOnce(&Tree<DEPTH>) -> T) -> T {
        f(&self.inner.read())
    }
}
