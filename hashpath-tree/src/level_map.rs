//! Materialized node hashes, indexed by level.
//!
//! Level 0 holds leaf hashes and level `depth` holds the root. Level `l`
//! stores only its populated prefix (`ceil(leaf_count / 2^l)` entries); any
//! slot past that prefix is the zero-subtree hash of the level, which
//! [`LevelMap::node_at`] substitutes on read.

use tracing::trace;

use crate::{
    MerkleTreeError, Result,
    hash::{Hash, Leaf, capacity, compress, leaf_hash},
    zero_hashes::ZeroHashes,
};

/// Node at `idx` of a level, or the level's zero hash past its populated
/// prefix. The single place where zero substitution happens.
fn node_or_zero(nodes: &[Hash], idx: u64, zero: &Hash) -> Hash {
    usize::try_from(idx)
        .ok()
        .and_then(|i| nodes.get(i))
        .copied()
        .unwrap_or(*zero)
}

/// Populated length of `level` for a tree holding `leaf_count` leaves.
fn populated_len(leaf_count: u64, level: u32) -> u64 {
    leaf_count.div_ceil(1u64 << level)
}

/// Full set of node hashes of a fixed-depth tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelMap {
    depth: u32,
    levels: Vec<Vec<Hash>>,
}

/// What [`LevelMap::set_leaf_hash`] overwrote, so that a failed commit can
/// put the map back exactly as it was.
#[derive(Debug)]
pub(crate) struct LevelUndo {
    leaf_count: usize,
    overwritten: Vec<(u32, usize, Hash)>,
}

impl LevelMap {
    /// Map of a tree with no leaves: every level empty except the root.
    pub fn empty(zero_hashes: &ZeroHashes) -> Self {
        let depth = zero_hashes.depth();
        let mut levels = vec![Vec::new(); depth as usize + 1];
        levels[depth as usize].push(zero_hashes.root());
        Self { depth, levels }
    }

    /// Hash every leaf and materialize all levels above them.
    pub fn build(leaves: &[Leaf], zero_hashes: &ZeroHashes) -> Result<Self> {
        Self::from_leaf_hashes(leaves.iter().map(leaf_hash).collect(), zero_hashes)
    }

    /// Materialize all levels above an already hashed leaf level.
    ///
    /// Each parent is `compress(left, right)`; a missing right child is the
    /// zero hash of the child level.
    pub fn from_leaf_hashes(leaf_hashes: Vec<Hash>, zero_hashes: &ZeroHashes) -> Result<Self> {
        let depth = zero_hashes.depth();
        let leaf_count = leaf_hashes.len() as u64;
        if leaf_count > capacity(depth) {
            return Err(MerkleTreeError::OutOfRange {
                index: (leaf_count - 1).into(),
                depth,
                capacity: capacity(depth),
            });
        }

        let mut levels: Vec<Vec<Hash>> = Vec::with_capacity(depth as usize + 1);
        levels.push(leaf_hashes);
        for level in 0..depth {
            let children = &levels[level as usize];
            let zero = zero_hashes.at(level);
            let parents: Vec<Hash> = (0..children.len().div_ceil(2) as u64)
                .map(|i| {
                    compress(
                        &node_or_zero(children, 2 * i, zero),
                        &node_or_zero(children, 2 * i + 1, zero),
                    )
                })
                .collect();
            trace!(level = level + 1, nodes = parents.len(), "materialized level");
            levels.push(parents);
        }
        if levels[depth as usize].is_empty() {
            levels[depth as usize].push(zero_hashes.root());
        }
        Ok(Self { depth, levels })
    }

    /// Reassemble a map from decoded levels. The caller has checked the
    /// shape.
    pub(crate) fn from_levels(depth: u32, levels: Vec<Vec<Hash>>) -> Self {
        debug_assert_eq!(levels.len(), depth as usize + 1);
        debug_assert_eq!(levels[depth as usize].len(), 1);
        Self { depth, levels }
    }

    /// Depth of the tree this map belongs to.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of populated leaf slots, including zero-valued gap leaves.
    pub fn leaf_count(&self) -> u64 {
        self.levels[0].len() as u64
    }

    /// Populated prefix of `level`.
    ///
    /// # Panics
    ///
    /// Panics if `level > depth`.
    pub fn level(&self, level: u32) -> &[Hash] {
        &self.levels[level as usize]
    }

    /// All levels, leaf level first.
    pub fn levels(&self) -> &[Vec<Hash>] {
        &self.levels
    }

    /// The root hash (the single node at level `depth`).
    pub fn root(&self) -> Hash {
        self.levels[self.depth as usize][0]
    }

    /// Hash of the node at (`level`, `idx`), resolving unpopulated slots to
    /// `zero_hashes.at(level)`.
    pub fn node_at(&self, level: u32, idx: u64, zero_hashes: &ZeroHashes) -> Hash {
        node_or_zero(&self.levels[level as usize], idx, zero_hashes.at(level))
    }

    /// Rebuild every level from the current leaf hashes. Used as the
    /// reference that incremental updates must agree with.
    pub fn recompute(&self, zero_hashes: &ZeroHashes) -> Result<Self> {
        Self::from_leaf_hashes(self.levels[0].clone(), zero_hashes)
    }

    /// Copy of the leaf level with `hash` at `index`, gaps filled with the
    /// zero leaf hash, fully rematerialized.
    pub(crate) fn rebuilt_with_leaf_hash(
        &self,
        index: u64,
        hash: Hash,
        zero_hashes: &ZeroHashes,
    ) -> Result<Self> {
        let idx = index as usize;
        let mut leaves = self.levels[0].clone();
        if idx >= leaves.len() {
            leaves.resize(idx + 1, *zero_hashes.at(0));
        }
        leaves[idx] = hash;
        Self::from_leaf_hashes(leaves, zero_hashes)
    }

    /// Set leaf `index` to `hash` and recompute only its ancestors.
    ///
    /// Growing the leaf level pads every level with its zero hash. A padded
    /// node covers only gap leaves, so the zero hash is already its correct
    /// value; only the chain above `index` needs hashing. `index` must be
    /// below the tree capacity.
    pub(crate) fn set_leaf_hash(
        &mut self,
        index: u64,
        hash: Hash,
        zero_hashes: &ZeroHashes,
    ) -> LevelUndo {
        let leaf_count = self.levels[0].len();
        let idx = index as usize;
        if idx >= leaf_count {
            let new_count = index + 1;
            for level in 0..self.depth {
                let len = populated_len(new_count, level) as usize;
                self.levels[level as usize].resize(len, *zero_hashes.at(level));
            }
        }

        let mut overwritten = Vec::with_capacity(self.depth as usize + 1);
        overwritten.push((0, idx, self.levels[0][idx]));
        self.levels[0][idx] = hash;

        let mut i = index;
        for level in 0..self.depth {
            let zero = zero_hashes.at(level);
            let children = &self.levels[level as usize];
            let parent = compress(
                &node_or_zero(children, i & !1, zero),
                &node_or_zero(children, i | 1, zero),
            );
            i >>= 1;
            let slot = &mut self.levels[level as usize + 1][i as usize];
            overwritten.push((level + 1, i as usize, *slot));
            *slot = parent;
        }
        trace!(index, root = %hex::encode(self.root()), "recomputed ancestor chain");

        LevelUndo {
            leaf_count,
            overwritten,
        }
    }

    /// Roll back a [`LevelMap::set_leaf_hash`].
    pub(crate) fn revert(&mut self, undo: LevelUndo) {
        // Restore values first: the grown slots are truncated afterwards.
        for (level, idx, old) in undo.overwritten.into_iter().rev() {
            self.levels[level as usize][idx] = old;
        }
        let leaf_count = undo.leaf_count as u64;
        for level in 0..self.depth {
            let len = populated_len(leaf_count, level) as usize;
            self.levels[level as usize].truncate(len);
        }
    }
}
