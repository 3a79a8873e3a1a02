use zk_primitives::{compute_merkle_root, Element};

use crate::{Error, Tree};

/// An authentication path for one leaf of a [`Tree`] with depth `DEPTH`
///
/// `siblings[i]` is the sibling of the path node at level `i`, and `indices[i]` is bit `i` of the
/// leaf index (`true` when the path node is a right child). These are exactly the `pathElements`
/// and `pathIndices` inputs of the nullification circuits.
///
/// A path records the root of the tree it was generated from. It only depends on the leaf
/// sequence at that point, so regenerating it from a replayed tree gives the same path. Later
/// inserts move the root on, and the path has to be regenerated before it proves anything about
/// the new root.
///
/// ```rust
/// # use accumulator::*;
/// let mut tree = Tree::<20>::new();
/// tree.insert(Element::new(1)).unwrap();
/// tree.insert(Element::new(2)).unwrap();
///
/// let path = tree.proof(Element::new(2)).unwrap();
///
/// assert_eq!(path.leaf_index, 1);
/// assert_eq!(path.siblings[0], Element::new(1));
/// assert!(path.indices[0]);
/// assert!(path.proves(tree.root()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Path<const DEPTH: usize> {
    /// The leaf this path starts from
    pub leaf: Element,
    /// The position of the leaf in the tree
    pub leaf_index: u32,
    /// The sibling at each level, leaf level first
    #[cfg_attr(feature = "serde", serde(with = "serde_array"))]
    pub siblings: [Element; DEPTH],
    /// Whether the path node at each level is a right child, leaf level first
    #[cfg_attr(feature = "serde", serde(with = "serde_array"))]
    pub indices: [bool; DEPTH],
    /// The root of the tree when this path was generated
    pub root: Element,
}

impl<const DEPTH: usize> Path<DEPTH> {
    /// Fold [`Path::leaf`] up through the siblings
    #[must_use]
    pub fn compute_root(&self) -> Element {
        self.compute_root_for(self.leaf)
    }

    /// Fold an arbitrary leaf up through the siblings of this path
    ///
    /// ```rust
    /// # use accumulator::*;
    /// let mut tree = Tree::<8>::new();
    /// tree.insert(Element::new(1)).unwrap();
    ///
    /// let path = tree.proof(Element::new(1)).unwrap();
    ///
    /// assert_eq!(path.compute_root_for(Element::new(1)), tree.root());
    /// assert_ne!(path.compute_root_for(Element::new(2)), tree.root());
    /// ```
    #[must_use]
    pub fn compute_root_for(&self, leaf: Element) -> Element {
        compute_merkle_root(leaf, self.siblings.iter().copied().zip(self.indices))
    }

    /// Whether this path links its leaf to `root`
    #[must_use]
    pub fn proves(&self, root: Element) -> bool {
        self.compute_root() == root
    }

    /// The side bits as field elements (`0` for left, `1` for right), as the circuits consume them
    #[must_use]
    pub fn index_elements(&self) -> [Element; DEPTH] {
        self.indices.map(Element::from)
    }
}

impl<const DEPTH: usize> Tree<DEPTH> {
    /// Generate the authentication path for `commitment`
    ///
    /// If the commitment was inserted more than once, the path is for its first index
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownElement`] if `commitment` was never inserted
    ///
    /// ```rust
    /// # use accumulator::*;
    /// let tree = Tree::<20>::new();
    ///
    /// assert_eq!(
    ///     tree.proof(Element::new(1)),
    ///     Err(Error::UnknownElement(Element::new(1))),
    /// );
    /// ```
    pub fn proof(&self, commitment: Element) -> Result<Path<DEPTH>, Error> {
        let index = self
            .index_of(commitment)
            .ok_or(Error::UnknownElement(commitment))?;

        self.path_for_index(index)
    }

    /// Generate the authentication path for the leaf at `index`
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if there is no leaf at `index`
    pub fn path_for_index(&self, index: u32) -> Result<Path<DEPTH>, Error> {
        let leaf = self.leaf(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.len(),
        })?;

        let mut siblings = [Element::ZERO; DEPTH];
        let mut indices = [false; DEPTH];

        let mut position = index as usize;
        for level in 0..DEPTH {
            siblings[level] = self.node(level, position ^ 1);
            indices[level] = position % 2 == 1;
            position >>= 1;
        }

        Ok(Path {
            leaf,
            leaf_index: index,
            siblings,
            indices,
            root: self.root(),
        })
    }
}

/// serde only implements its traits for arrays up to length 32, and has no const-generic impls
#[cfg(feature = "serde")]
mod serde_array {
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T: Serialize, S: Serializer, const N: usize>(
        array: &[T; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(array)
    }

    pub fn deserialize<'de, T, D, const N: usize>(deserializer: D) -> Result<[T; N], D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let vec = Vec::<T>::deserialize(deserializer)?;
        let len = vec.len();

        vec.try_into()
            .map_err(|_| D::Error::invalid_length(len, &"an array of the tree depth"))
    }
}
