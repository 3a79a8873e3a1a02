/// An error that can occur when interacting with a [`Persistent`] tree
///
/// [`Persistent`]: crate::storage::Persistent
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from rocksdb
    #[error("rocksdb error: {0}")]
    Rocksdb(#[from] rocksdb::Error),

    /// An error from the in-memory tree
    #[error("tree error: {0}")]
    Tree(#[from] crate::Error),

    /// A stored value couldn't be decoded
    #[error("decoding error: {0}")]
    Decode(#[from] std::io::Error),

    /// The stored leaves don't form a contiguous sequence starting at 0
    #[error("the database is missing leaf {expected} (found leaf {found} instead)")]
    DatabaseConsistency {
        /// The next leaf index that should have been stored
        expected: u32,
        /// The leaf index that was actually stored next
        found: u32,
    },
}
