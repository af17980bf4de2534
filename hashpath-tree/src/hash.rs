//! Hash primitive and input validation.
//!
//! Domain separation:
//! - Leaves:         `blake3(0x00 || leaf)`
//! - Internal nodes: `blake3(0x01 || left || right)`

use crate::{MerkleTreeError, Result};

/// Size of a leaf value in bytes.
pub const LEAF_BYTES: usize = 64;
/// Size of a node hash in bytes.
pub const HASH_BYTES: usize = 32;
/// Largest supported tree depth.
pub const MAX_DEPTH: u32 = 32;

/// A 32-byte node hash.
pub type Hash = [u8; HASH_BYTES];
/// A 64-byte leaf value.
pub type Leaf = [u8; LEAF_BYTES];

/// Domain tag prepended to leaf hash inputs.
pub(crate) const LEAF_DOMAIN_TAG: u8 = 0x00;
/// Domain tag prepended to internal node inputs.
pub(crate) const INTERNAL_DOMAIN_TAG: u8 = 0x01;

/// Hash a leaf value: `blake3(0x00 || leaf)`.
pub fn leaf_hash(leaf: &Leaf) -> Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[LEAF_DOMAIN_TAG]);
    hasher.update(leaf);
    *hasher.finalize().as_bytes()
}

/// Combine two child hashes into their parent: `blake3(0x01 || left ||
/// right)`.
pub fn compress(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[INTERNAL_DOMAIN_TAG]);
    hasher.update(left);
    hasher.update(right);
    *hasher.finalize().as_bytes()
}

/// Validate that depth is in the allowed range [1, MAX_DEPTH].
pub(crate) fn validate_depth(depth: u32) -> Result<()> {
    if !(1..=MAX_DEPTH).contains(&depth) {
        return Err(MerkleTreeError::InvalidDepth {
            depth,
            max: MAX_DEPTH,
        });
    }
    Ok(())
}

/// Number of leaf slots of a tree of `depth`. Depth must be validated.
/// Uses u64 since `1u32 << 32` would overflow.
pub(crate) fn capacity(depth: u32) -> u64 {
    1u64 << depth
}

/// Reject indices outside `0..2^depth`.
pub(crate) fn check_index(index: u64, depth: u32) -> Result<()> {
    let capacity = capacity(depth);
    if index >= capacity {
        return Err(MerkleTreeError::OutOfRange {
            index: index.into(),
            depth,
            capacity,
        });
    }
    Ok(())
}

/// Convert a signed index, as read from user input, into a leaf index.
///
/// Negative values and values `>= 2^depth` fail with
/// [`MerkleTreeError::OutOfRange`].
pub fn leaf_index(index: i64, depth: u32) -> Result<u64> {
    validate_depth(depth)?;
    let unsigned = u64::try_from(index).map_err(|_| MerkleTreeError::OutOfRange {
        index: index.into(),
        depth,
        capacity: capacity(depth),
    })?;
    check_index(unsigned, depth)?;
    Ok(unsigned)
}

/// Copy a caller-supplied value into a fixed-size leaf.
pub(crate) fn to_leaf(value: &[u8]) -> Result<Leaf> {
    value
        .try_into()
        .map_err(|_| MerkleTreeError::InvalidLeafSize {
            expected: LEAF_BYTES,
            actual: value.len(),
        })
}

/// Hex rendering of a hash for logs and error messages.
pub(crate) fn hex_hash(hash: &Hash) -> String {
    hex::encode(hash)
}
