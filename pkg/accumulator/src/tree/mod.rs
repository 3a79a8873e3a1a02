use std::collections::HashMap;

use zk_primitives::Element;

use crate::{empty_tree_hash, MAX_DEPTH};

mod insert;
mod path;
mod rebuild;

#[cfg(test)]
mod proptest;

pub use path::Path;

/// An append-only Merkle tree of depth `DEPTH`, holding up to `2^DEPTH` leaves
///
/// The tree is stored as an arena of digests indexed by `(level, position)`: `levels[0]` is
/// the leaf sequence, `levels[DEPTH]` holds the root once anything has been inserted. Each level
/// only stores the nodes that cover at least one leaf.
///
/// ```rust
/// # use accumulator::*;
/// let mut tree = Tree::<4>::new();
/// assert!(tree.is_empty());
///
/// tree.insert(Element::new(10)).unwrap();
/// tree.insert(Element::new(11)).unwrap();
///
/// assert_eq!(tree.len(), 2);
/// assert_eq!(tree.leaf(1), Some(Element::new(11)));
/// assert_eq!(tree.index_of(Element::new(10)), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree<const DEPTH: usize> {
    levels: Vec<Vec<Element>>,
    /// The index of the first leaf holding each commitment
    indices: HashMap<Element, u32>,
}

impl<const DEPTH: usize> Default for Tree<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize> Tree<DEPTH> {
    const VALID_DEPTH: () = assert!(
        DEPTH >= 1 && DEPTH <= MAX_DEPTH,
        "tree depth must be between 1 and 31"
    );

    /// Create a new, empty [`Tree`]
    ///
    /// ```rust
    /// # use accumulator::*;
    /// let tree = Tree::<20>::new();
    ///
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.root(), empty_tree_hash(20));
    /// ```
    #[must_use]
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_DEPTH;

        Self {
            levels: vec![Vec::new(); DEPTH + 1],
            indices: HashMap::new(),
        }
    }

    /// The depth of the tree
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> usize {
        DEPTH
    }

    /// The maximum number of leaves this tree can hold
    ///
    /// ```rust
    /// # use accumulator::*;
    /// assert_eq!(ProtocolTree::capacity(), 1_048_576);
    /// ```
    #[inline]
    #[must_use]
    pub const fn capacity() -> u64 {
        1_u64 << DEPTH
    }

    /// The current root of the tree
    ///
    /// For an empty tree, this is the empty-subtree digest at level `DEPTH`
    #[inline]
    #[must_use]
    pub fn root(&self) -> Element {
        self.node(DEPTH, 0)
    }

    /// The number of leaves in the tree
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // capacity is at most 2^31
    pub fn len(&self) -> u32 {
        self.levels[0].len() as u32
    }

    /// Whether the tree has no leaves
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// Whether the tree can't accept any more leaves
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        u64::from(self.len()) == Self::capacity()
    }

    /// The leaf at `index`, if it has been inserted
    #[inline]
    #[must_use]
    pub fn leaf(&self, index: u32) -> Option<Element> {
        self.levels[0].get(index as usize).copied()
    }

    /// The leaves of the tree, in insertion order
    #[inline]
    #[must_use]
    pub fn leaves(&self) -> &[Element] {
        &self.levels[0]
    }

    /// The leaf index of `commitment`
    ///
    /// If the same commitment was inserted more than once, this is the first index
    #[inline]
    #[must_use]
    pub fn index_of(&self, commitment: Element) -> Option<u32> {
        self.indices.get(&commitment).copied()
    }

    /// Whether `commitment` has been inserted into the tree
    #[inline]
    #[must_use]
    pub fn contains(&self, commitment: Element) -> bool {
        self.indices.contains_key(&commitment)
    }

    /// The digest at `(level, position)`, falling back to the empty-subtree digest if no leaf
    /// below this position has been inserted
    fn node(&self, level: usize, position: usize) -> Element {
        self.levels[level]
            .get(position)
            .copied()
            .unwrap_or_else(|| empty_tree_hash(level))
    }
}
