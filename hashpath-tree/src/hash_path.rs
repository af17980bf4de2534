//! Hash paths: the sibling pairs linking a leaf to the root.
//!
//! A `HashPath` for leaf `index` holds one `(left, right)` pair per level,
//! leaf level first. At level `l` the node on the path sits at
//! `index >> l`; when that position is even the node is `left` and its
//! sibling `right`, otherwise the other way round. Compressing the pair at
//! level `l` yields the path node of level `l + 1`, and compressing the last
//! pair yields the root.

use bincode::{Decode, Encode};

use crate::{
    MerkleTreeError, Result,
    hash::{Hash, check_index},
    level_map::LevelMap,
    zero_hashes::ZeroHashes,
};

/// Sibling pairs proving a leaf's inclusion under a root.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HashPath {
    pub(crate) pairs: Vec<(Hash, Hash)>,
}

impl HashPath {
    /// Wrap raw pairs, leaf level first.
    pub fn new(pairs: Vec<(Hash, Hash)>) -> Self {
        Self { pairs }
    }

    /// Walk from leaf `index` to the root of `levels`, recording each node
    /// with its sibling. Siblings past the populated frontier resolve to the
    /// level's zero hash.
    pub fn generate(levels: &LevelMap, index: u64, zero_hashes: &ZeroHashes) -> Result<Self> {
        let depth = levels.depth();
        if zero_hashes.depth() != depth {
            return Err(MerkleTreeError::InvalidData(format!(
                "zero hash table depth {} does not match tree depth {}",
                zero_hashes.depth(),
                depth
            )));
        }
        check_index(index, depth)?;

        let mut pairs = Vec::with_capacity(depth as usize);
        let mut current = index;
        for level in 0..depth {
            let node = levels.node_at(level, current, zero_hashes);
            let pair = if current % 2 == 0 {
                (node, levels.node_at(level, current + 1, zero_hashes))
            } else {
                (levels.node_at(level, current - 1, zero_hashes), node)
            };
            pairs.push(pair);
            current /= 2;
        }
        Ok(Self { pairs })
    }

    /// The pairs, leaf level first.
    pub fn pairs(&self) -> &[(Hash, Hash)] {
        &self.pairs
    }

    /// Consume the path, returning its pairs.
    pub fn into_pairs(self) -> Vec<(Hash, Hash)> {
        self.pairs
    }

    /// Number of pairs, equal to the depth of the tree it came from.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` for a path with no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serialize this path to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| MerkleTreeError::InvalidData(format!("failed to encode HashPath: {}", e)))
    }

    /// Deserialize a path from bytes.
    ///
    /// The size limit is capped at 1 MiB, far above the largest path
    /// (32 pairs), so a crafted length header cannot force a huge
    /// allocation.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 1024 * 1024 }>();
        let (path, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| MerkleTreeError::InvalidData(format!("failed to decode HashPath: {}", e)))?;
        Ok(path)
    }
}
