//! Hash path verification.
//!
//! Pure functions, no storage required: the root is recomputed from the
//! path alone and compared to the expected one.

use crate::{
    MerkleTreeError, Result,
    hash::{Hash, MAX_DEPTH, check_index, compress, hex_hash, leaf_hash, to_leaf},
    hash_path::HashPath,
};

impl HashPath {
    /// Hash on the path side of the pair at `level` for leaf `index`.
    fn path_side(&self, level: usize, index: u64) -> Hash {
        let (left, right) = self.pairs[level];
        if (index >> level) % 2 == 0 { left } else { right }
    }

    /// Recompute the root this path commits to for leaf `index`.
    ///
    /// Every level is chained: the compression of a pair must equal the
    /// path-side hash of the pair above it.
    pub fn compute_root(&self, index: u64) -> Result<Hash> {
        let depth = self.pairs.len();
        if depth == 0 || depth > MAX_DEPTH as usize {
            return Err(MerkleTreeError::InvalidProof(format!(
                "path has {} levels (must be 1..={})",
                depth, MAX_DEPTH
            )));
        }
        check_index(index, depth as u32)?;

        let mut computed = compress(&self.pairs[0].0, &self.pairs[0].1);
        for level in 1..depth {
            let expected = self.path_side(level, index);
            if computed != expected {
                return Err(MerkleTreeError::InvalidProof(format!(
                    "level {} does not chain: computed {}, path holds {}",
                    level,
                    hex_hash(&computed),
                    hex_hash(&expected)
                )));
            }
            let (left, right) = &self.pairs[level];
            computed = compress(left, right);
        }
        Ok(computed)
    }

    /// Verify that `leaf` sits at `index` under `expected_root`.
    pub fn verify(&self, index: u64, leaf: &[u8], expected_root: &Hash) -> Result<()> {
        let leaf = to_leaf(leaf)?;
        if self.pairs.is_empty() {
            return Err(MerkleTreeError::InvalidProof("empty path".into()));
        }
        let computed_leaf = leaf_hash(&leaf);
        let path_leaf = self.path_side(0, index);
        if computed_leaf != path_leaf {
            return Err(MerkleTreeError::InvalidProof(format!(
                "leaf hash mismatch at index {}: expected {}, path holds {}",
                index,
                hex_hash(&computed_leaf),
                hex_hash(&path_leaf)
            )));
        }

        let computed_root = self.compute_root(index)?;
        if &computed_root != expected_root {
            return Err(MerkleTreeError::InvalidProof(format!(
                "root hash mismatch: expected {}, got {}",
                hex_hash(expected_root),
                hex_hash(&computed_root)
            )));
        }
        Ok(())
    }
}
