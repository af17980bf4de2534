use tracing::{debug, warn};

use crate::{
    MerkleTreeError, Result,
    config::{RecomputeStrategy, TreeConfig},
    hash::{Hash, capacity, check_index, hex_hash, leaf_hash, to_leaf, validate_depth},
    hash_path::HashPath,
    keys::validate_name,
    level_map::LevelMap,
    meta::TreeMeta,
    storage_adapter::TreeStore,
    zero_hashes::ZeroHashes,
};

/// A named fixed-depth binary Merkle tree persisted in `S`.
///
/// The tree holds `2^depth` leaf slots of 64 bytes each. Slots that were
/// never written count as zero-filled leaves, so an untouched tree has the
/// root of the all-zero tree and every hash path for it is well defined.
///
/// Only the metadata (root, depth) is required to survive restarts. The
/// level map is kept in memory and, when [`TreeConfig::snapshot`] is set,
/// persisted as a snapshot on every update. A reopened tree loads that
/// snapshot lazily, on the first update or hash-path request.
///
/// A tree has a single owner: mutation and hash-path queries take
/// `&mut self`. Share it across threads behind a lock.
#[derive(Debug)]
pub struct MerkleTree<S> {
    store: S,
    name: String,
    depth: u32,
    root: Hash,
    zero_hashes: ZeroHashes,
    levels: Option<LevelMap>,
    config: TreeConfig,
}

impl<S: TreeStore> MerkleTree<S> {
    /// Open tree `name` in `store` with the default [`TreeConfig`].
    ///
    /// See [`MerkleTree::open_with_config`].
    pub fn open(store: S, name: &str, depth: u32) -> Result<Self> {
        Self::open_with_config(store, name, depth, TreeConfig::default())
    }

    /// Open tree `name` in `store`, creating it if it does not exist.
    ///
    /// An existing tree is restored from its metadata, whose depth overrides
    /// `depth`. A new tree must have `depth` in `1..=MAX_DEPTH`; it starts
    /// with the empty-tree root, which is persisted before returning.
    pub fn open_with_config(store: S, name: &str, depth: u32, config: TreeConfig) -> Result<Self> {
        validate_name(name)?;
        match store.get_metadata(name)? {
            Some(meta) => {
                if meta.depth != depth {
                    debug!(
                        name,
                        requested = depth,
                        stored = meta.depth,
                        "stored depth overrides requested depth"
                    );
                }
                let zero_hashes = ZeroHashes::build(meta.depth)?;
                debug!(name, depth = meta.depth, root = %hex_hash(&meta.root), "restored tree");
                Ok(Self {
                    store,
                    name: name.to_owned(),
                    depth: meta.depth,
                    root: meta.root,
                    zero_hashes,
                    levels: None,
                    config,
                })
            }
            None => {
                validate_depth(depth)?;
                let zero_hashes = ZeroHashes::build(depth)?;
                let levels = LevelMap::empty(&zero_hashes);
                let meta = TreeMeta {
                    root: levels.root(),
                    depth,
                };
                store.commit(name, &meta, config.snapshot.then_some(&levels))?;
                debug!(name, depth, root = %hex_hash(&meta.root), "created tree");
                Ok(Self {
                    store,
                    name: name.to_owned(),
                    depth,
                    root: meta.root,
                    zero_hashes,
                    levels: Some(levels),
                    config,
                })
            }
        }
    }

    /// Returns `true` if `store` holds metadata for tree `name`.
    pub fn exists(store: &S, name: &str) -> Result<bool> {
        validate_name(name)?;
        Ok(store.get_metadata(name)?.is_some())
    }

    /// Delete this tree's metadata and snapshot from the store.
    pub fn destroy(self) -> Result<()> {
        self.store.delete_tree(&self.name)?;
        debug!(name = %self.name, "destroyed tree");
        Ok(())
    }

    /// Name of this tree in its store.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Depth of this tree, as created.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of leaf slots, `2^depth`.
    pub fn capacity(&self) -> u64 {
        capacity(self.depth)
    }

    /// Current root hash. Always the last successfully persisted root.
    pub fn root(&self) -> Hash {
        self.root
    }

    /// Options this tree was opened with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Zero-subtree hashes for this tree's depth.
    pub fn zero_hashes(&self) -> &ZeroHashes {
        &self.zero_hashes
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of populated leaf slots, if the level map is resident.
    pub fn leaf_count(&self) -> Option<u64> {
        self.levels.as_ref().map(LevelMap::leaf_count)
    }

    /// Set leaf `index` to `value` and return the new root.
    ///
    /// `value` must be exactly 64 bytes. Writing past the current leaf count
    /// fills the gap with zero-valued leaves. The new state is persisted
    /// before it becomes visible: if the store rejects the write, the
    /// in-memory tree is rolled back and the previous root stays current.
    pub fn update_element(&mut self, index: u64, value: &[u8]) -> Result<Hash> {
        check_index(index, self.depth)?;
        let leaf = to_leaf(value)?;
        let hash = leaf_hash(&leaf);

        let mut levels = self.take_levels()?;
        let new_root = match self.config.recompute {
            RecomputeStrategy::Incremental => {
                let undo = levels.set_leaf_hash(index, hash, &self.zero_hashes);
                let new_root = levels.root();
                let committed = self.persist(new_root, &levels);
                if committed.is_err() {
                    levels.revert(undo);
                }
                self.levels = Some(levels);
                committed.map(|()| new_root)
            }
            RecomputeStrategy::Full => {
                let rebuilt = match levels.rebuilt_with_leaf_hash(index, hash, &self.zero_hashes) {
                    Ok(rebuilt) => rebuilt,
                    Err(e) => {
                        self.levels = Some(levels);
                        return Err(e);
                    }
                };
                let new_root = rebuilt.root();
                match self.persist(new_root, &rebuilt) {
                    Ok(()) => {
                        self.levels = Some(rebuilt);
                        Ok(new_root)
                    }
                    Err(e) => {
                        self.levels = Some(levels);
                        Err(e)
                    }
                }
            }
        }?;

        self.root = new_root;
        debug!(name = %self.name, index, root = %hex_hash(&new_root), "updated leaf");
        Ok(new_root)
    }

    /// Hash path for leaf `index` under the current root.
    ///
    /// Read-only apart from loading the snapshot of a freshly reopened tree
    /// into memory.
    pub fn hash_path(&mut self, index: u64) -> Result<HashPath> {
        check_index(index, self.depth)?;
        let levels = self.take_levels()?;
        let path = HashPath::generate(&levels, index, &self.zero_hashes);
        self.levels = Some(levels);
        path
    }

    /// Root obtained by rematerializing every level from the leaf hashes.
    ///
    /// Equals [`MerkleTree::root`] unless the stored state is inconsistent.
    pub fn recompute_root(&mut self) -> Result<Hash> {
        let levels = self.take_levels()?;
        let rebuilt = levels.recompute(&self.zero_hashes);
        self.levels = Some(levels);
        Ok(rebuilt?.root())
    }

    /// Write metadata, plus the snapshot when enabled, in one commit.
    fn persist(&self, root: Hash, levels: &LevelMap) -> Result<()> {
        let meta = TreeMeta {
            root,
            depth: self.depth,
        };
        self.store
            .commit(&self.name, &meta, self.config.snapshot.then_some(levels))
    }

    /// Move the level map out of `self`, restoring it first if needed.
    /// Callers put it back on every path.
    fn take_levels(&mut self) -> Result<LevelMap> {
        match self.levels.take() {
            Some(levels) => Ok(levels),
            None => self.restore_levels(),
        }
    }

    /// Load the level map of a reopened tree.
    ///
    /// A snapshot that is corrupt or whose root disagrees with the metadata
    /// is discarded. Without a usable snapshot only the empty tree can be
    /// rebuilt.
    fn restore_levels(&self) -> Result<LevelMap> {
        match self.store.get_snapshot(&self.name, self.depth) {
            Ok(Some(levels)) if levels.root() == self.root => {
                debug!(name = %self.name, leaves = levels.leaf_count(), "loaded snapshot");
                return Ok(levels);
            }
            Ok(Some(levels)) => warn!(
                name = %self.name,
                snapshot_root = %hex_hash(&levels.root()),
                root = %hex_hash(&self.root),
                "discarding stale snapshot"
            ),
            Ok(None) => debug!(name = %self.name, "no snapshot stored"),
            Err(MerkleTreeError::CorruptedSnapshot(reason)) => {
                warn!(name = %self.name, %reason, "discarding corrupted snapshot")
            }
            Err(e) => return Err(e),
        }

        if self.root == self.zero_hashes.root() {
            return Ok(LevelMap::empty(&self.zero_hashes));
        }
        Err(MerkleTreeError::SnapshotUnavailable {
            name: self.name.clone(),
            root: hex_hash(&self.root),
        })
    }
}
