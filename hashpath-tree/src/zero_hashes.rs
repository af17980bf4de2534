//! Roots of all-empty subtrees, one per level.

use crate::{
    Result,
    hash::{Hash, LEAF_BYTES, compress, leaf_hash, validate_depth},
};

/// Precomputed zero-subtree hashes for a tree of a fixed depth.
///
/// `at(0)` is the hash of a zero-filled leaf and `at(l + 1)` is
/// `compress(at(l), at(l))`, so `at(l)` is the root of an empty subtree of
/// height `l` and `root()` is the root of an empty tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroHashes {
    hashes: Vec<Hash>,
}

impl ZeroHashes {
    /// Build the table for `depth`, which must be in `1..=MAX_DEPTH`.
    pub fn build(depth: u32) -> Result<Self> {
        validate_depth(depth)?;
        let mut hashes = Vec::with_capacity(depth as usize + 1);
        let mut current = leaf_hash(&[0u8; LEAF_BYTES]);
        hashes.push(current);
        for _ in 0..depth {
            current = compress(&current, &current);
            hashes.push(current);
        }
        Ok(Self { hashes })
    }

    /// Depth this table was built for.
    pub fn depth(&self) -> u32 {
        (self.hashes.len() - 1) as u32
    }

    /// Empty-subtree hash at `level`.
    ///
    /// # Panics
    ///
    /// Panics if `level > depth`.
    pub fn at(&self, level: u32) -> &Hash {
        &self.hashes[level as usize]
    }

    /// Root of the all-empty tree.
    pub fn root(&self) -> Hash {
        self.hashes[self.hashes.len() - 1]
    }

    /// All levels, leaf level first.
    pub fn as_slice(&self) -> &[Hash] {
        &self.hashes
    }
}
