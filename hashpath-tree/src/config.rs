//! Per-tree behavior switches.

/// How [`crate::MerkleTree::update_element`] recomputes the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RecomputeStrategy {
    /// Rehash only the ancestors of the updated leaf: O(depth).
    #[default]
    Incremental,
    /// Rematerialize every level from the leaf hashes: O(leaf count).
    Full,
}

/// Options of a [`crate::MerkleTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeConfig {
    /// Persist the full level map next to the metadata on every update.
    ///
    /// Without a snapshot a reopened non-empty tree can report its root but
    /// cannot produce hash paths or accept updates.
    pub snapshot: bool,
    /// Recompute strategy for updates.
    pub recompute: RecomputeStrategy,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            snapshot: true,
            recompute: RecomputeStrategy::Incremental,
        }
    }
}

impl TreeConfig {
    /// Enable or disable snapshot persistence.
    pub fn with_snapshot(mut self, snapshot: bool) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Select the recompute strategy.
    pub fn with_recompute(mut self, recompute: RecomputeStrategy) -> Self {
        self.recompute = recompute;
        self
    }
}
