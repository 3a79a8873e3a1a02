#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::match_bool)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![deny(missing_docs)]

//! # Accumulator
//!
//! An append-only, fixed-depth Merkle [`Tree`] of commitments, with the same layout as the tree
//! kept by the zkTips ledger contract.
//!
//! ```rust
//! # use accumulator::*;
//! let mut tree = Tree::<20>::new();
//!
//! let index = tree.insert(Element::new(1)).unwrap();
//! assert_eq!(index, 0);
//!
//! // a path folds back up to the current root
//! let path = tree.proof(Element::new(1)).unwrap();
//! assert_eq!(path.compute_root(), tree.root());
//! ```
//!
//! ## Structure
//!
//! Leaves are filled left to right. Level `0` holds the leaves, and level `DEPTH` holds the root.
//! A position with no populated node takes the *empty-subtree digest* for its level (see
//! [`empty_tree_hash`]), which is [`ZERO_VALUE`] at level `0` and the self-hash of the level below
//! everywhere else. Only populated nodes are stored, so an insert touches exactly `DEPTH` nodes,
//! whatever the size of the tree.
//!
//! The root is a pure function of the ordered leaf sequence, so a tree can always be rebuilt from
//! the ledger's `Commit` events (see [`Tree::replay`]).
//!
//! ## Concurrency
//!
//! A [`Tree`] is a plain value. To share one between tasks, wrap it in a [`SharedTree`], which
//! serializes inserts and hands out root/path snapshots that are consistent with each other.

mod error;
mod event;
mod hash;
mod shared;
/// Persistence of a [`Tree`]'s leaf sequence to rocksdb
#[cfg(feature = "storage")]
pub mod storage;
mod tree;

pub use error::Error;
pub use event::CommitEvent;
pub use hash::{empty_tree_hash, MAX_DEPTH};
pub use shared::SharedTree;
pub use tree::{Path, Tree};
pub use zk_primitives::*;

/// The depth of the commitment tree used by the protocol
pub const PROTOCOL_DEPTH: usize = 20;

/// The commitment tree used by the protocol, which holds up to 2^20 commitments
pub type ProtocolTree = Tree<PROTOCOL_DEPTH>;
