use zk_primitives::Element;

/// An error that can occur when interacting with a [`Tree`]
///
/// [`Tree`]: crate::Tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The tree already holds `capacity` leaves
    #[error("tree is full (capacity: {capacity})")]
    TreeFull {
        /// The maximum number of leaves the tree can hold
        capacity: u64,
    },

    /// A path was requested for a commitment that was never inserted
    #[error("element {0} is not in the tree")]
    UnknownElement(Element),

    /// A path was requested for a leaf index that hasn't been filled yet
    #[error("no leaf at index {index} (tree has {len} leaves)")]
    IndexOutOfBounds {
        /// The requested index
        index: u32,
        /// The number of leaves in the tree
        len: u32,
    },

    /// A commit event skipped ahead of the next free leaf
    #[error("commit event for leaf {found} arrived, but the next free leaf is {expected}")]
    OutOfOrder {
        /// The index of the next free leaf
        expected: u32,
        /// The index carried by the event
        found: u32,
    },

    /// A commit event disagrees with a leaf that is already in the tree
    #[error("leaf {index} is {in_tree}, but a commit event claims it is {event}")]
    ReplayMismatch {
        /// The index of the conflicting leaf
        index: u32,
        /// The leaf already in the tree
        in_tree: Element,
        /// The leaf carried by the event
        event: Element,
    },
}
