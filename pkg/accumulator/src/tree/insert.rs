use zk_primitives::{hash_merge, Element};

use crate::{Error, Tree};

impl<const DEPTH: usize> Tree<DEPTH> {
    /// Append `commitment` at the next free leaf, returning its index
    ///
    /// Every ancestor of the new leaf is recomputed, so the cost is `DEPTH` hashes regardless of
    /// how many leaves the tree holds. A missing right sibling takes the empty-subtree digest for
    /// its level.
    ///
    /// ```rust
    /// # use accumulator::*;
    /// let mut tree = Tree::<20>::new();
    ///
    /// assert_eq!(tree.insert(Element::new(1)).unwrap(), 0);
    /// assert_eq!(tree.insert(Element::new(2)).unwrap(), 1);
    ///
    /// let expected = (1..20).fold(
    ///     hash_merge([Element::new(1), Element::new(2)]),
    ///     |node, level| hash_merge([node, empty_tree_hash(level)]),
    /// );
    /// assert_eq!(tree.root(), expected);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::TreeFull`] if the tree already holds [`Tree::capacity`] leaves. The tree
    /// is unchanged in that case.
    ///
    /// ```rust
    /// # use accumulator::*;
    /// let mut tree = Tree::<1>::new();
    /// tree.insert(Element::new(1)).unwrap();
    /// tree.insert(Element::new(2)).unwrap();
    ///
    /// assert_eq!(tree.insert(Element::new(3)), Err(Error::TreeFull { capacity: 2 }));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, commitment: Element) -> Result<u32, Error> {
        if self.is_full() {
            return Err(Error::TreeFull {
                capacity: Self::capacity(),
            });
        }

        let index = self.len();
        self.levels[0].push(commitment);
        self.indices.entry(commitment).or_insert(index);

        let mut position = index as usize;
        for level in 0..DEPTH {
            let left = self.node(level, position & !1);
            let right = self.node(level, position | 1);
            let parent = hash_merge([left, right]);

            position >>= 1;
            let above = &mut self.levels[level + 1];
            match above.get_mut(position) {
                Some(node) => *node = parent,
                None => above.push(parent),
            }
        }

        Ok(index)
    }

    /// Append every commitment in `commitments`, returning the index of each
    ///
    /// The whole batch is checked against the capacity first, so either every commitment is
    /// inserted, or none are.
    ///
    /// ```rust
    /// # use accumulator::*;
    /// let mut tree = Tree::<2>::new();
    ///
    /// let indices = tree.insert_batch([Element::new(1), Element::new(2)]).unwrap();
    /// assert_eq!(indices, [0, 1]);
    ///
    /// // only two slots left, so this fails without inserting anything
    /// let result = tree.insert_batch([Element::new(3), Element::new(4), Element::new(5)]);
    /// assert!(result.is_err());
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert_batch<I>(&mut self, commitments: I) -> Result<Vec<u32>, Error>
    where
        I: IntoIterator<Item = Element>,
    {
        let commitments: Vec<_> = commitments.into_iter().collect();
        let free = Self::capacity() - u64::from(self.len());

        if commitments.len() as u64 > free {
            return Err(Error::TreeFull {
                capacity: Self::capacity(),
            });
        }

        commitments
            .into_iter()
            .map(|commitment| self.insert(commitment))
            .collect()
    }
}
