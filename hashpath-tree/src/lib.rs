//! Fixed-depth binary Merkle tree over a key-value store.
//!
//! A tree of depth `d` has `2^d` leaf slots of 64 bytes. Leaves are hashed
//! with `blake3(0x00 || leaf)` and internal nodes with
//! `blake3(0x01 || left || right)`. Slots that were never written hold a
//! zero-filled leaf, so any subtree beyond the populated frontier hashes to
//! a precomputed [`ZeroHashes`] entry for its level.
//!
//! # Core types
//!
//! - [`MerkleTree`]: open/restore, update a leaf, read the root, produce a
//!   hash path.
//! - [`LevelMap`]: all node hashes by level; builds a tree from leaves.
//! - [`HashPath`]: per-level sibling pairs from a leaf to the root, with
//!   verification.
//! - [`TreeStore`]: what a tree needs from storage; implemented for every
//!   [`hashpath_storage::Storage`].

#![warn(missing_docs)]

mod config;
mod error;
pub(crate) mod hash;
mod hash_path;
pub mod keys;
pub(crate) mod level_map;
mod meta;
mod snapshot;
mod storage_adapter;
mod tree;
mod verify;
mod zero_hashes;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{RecomputeStrategy, TreeConfig};
pub use error::{MerkleTreeError, Result};
pub use hash::{
    HASH_BYTES, Hash, LEAF_BYTES, Leaf, MAX_DEPTH, compress, leaf_hash, leaf_index,
};
pub use hash_path::HashPath;
pub use level_map::LevelMap;
pub use meta::{META_LEN, TreeMeta};
pub use storage_adapter::TreeStore;
pub use tree::MerkleTree;
pub use zero_hashes::ZeroHashes;
