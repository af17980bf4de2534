//! Storage adapter bridging [`hashpath_storage::Storage`] to the tree's
//! persistence needs.
//!
//! [`TreeStore`] is what the tree requires from its backing store: metadata
//! and snapshot records per tree name. Every `Storage` gets it for free;
//! metadata and snapshot are then written in one atomic batch.

use hashpath_storage::{Storage, StorageBatch};

use crate::{
    Result,
    keys::{meta_key, snapshot_key},
    level_map::LevelMap,
    meta::TreeMeta,
};

/// Persistence contract of a [`crate::MerkleTree`].
///
/// "Not found" is `Ok(None)`, never an error: it tells the tree to
/// initialize a fresh instance.
pub trait TreeStore {
    /// Metadata of tree `name`, if it exists.
    fn get_metadata(&self, name: &str) -> Result<Option<TreeMeta>>;

    /// Overwrite the metadata of tree `name`.
    fn put_metadata(&self, name: &str, meta: &TreeMeta) -> Result<()>;

    /// Decoded snapshot of tree `name`. A snapshot that fails to decode is
    /// returned as [`crate::MerkleTreeError::CorruptedSnapshot`].
    fn get_snapshot(&self, name: &str, depth: u32) -> Result<Option<LevelMap>>;

    /// Overwrite the snapshot of tree `name`.
    fn put_snapshot(&self, name: &str, levels: &LevelMap) -> Result<()>;

    /// Remove both records of tree `name`.
    fn delete_tree(&self, name: &str) -> Result<()>;

    /// Persist the state produced by an update.
    ///
    /// The default writes the snapshot before the metadata, so a failure in
    /// between leaves a snapshot whose root disagrees with the metadata; the
    /// tree detects and discards it on the next restore.
    fn commit(&self, name: &str, meta: &TreeMeta, levels: Option<&LevelMap>) -> Result<()> {
        if let Some(levels) = levels {
            self.put_snapshot(name, levels)?;
        }
        self.put_metadata(name, meta)
    }
}

impl<S: Storage> TreeStore for S {
    fn get_metadata(&self, name: &str) -> Result<Option<TreeMeta>> {
        self.get(&meta_key(name))?
            .map(|bytes| TreeMeta::deserialize(&bytes))
            .transpose()
    }

    fn put_metadata(&self, name: &str, meta: &TreeMeta) -> Result<()> {
        self.put(&meta_key(name), &meta.serialize())?;
        Ok(())
    }

    fn get_snapshot(&self, name: &str, depth: u32) -> Result<Option<LevelMap>> {
        self.get(&snapshot_key(name))?
            .map(|bytes| LevelMap::from_snapshot_bytes(&bytes, depth))
            .transpose()
    }

    fn put_snapshot(&self, name: &str, levels: &LevelMap) -> Result<()> {
        self.put(&snapshot_key(name), &levels.to_snapshot_bytes())?;
        Ok(())
    }

    fn delete_tree(&self, name: &str) -> Result<()> {
        let mut batch = StorageBatch::new();
        batch.delete(snapshot_key(name));
        batch.delete(meta_key(name));
        self.commit_batch(batch)?;
        Ok(())
    }

    fn commit(&self, name: &str, meta: &TreeMeta, levels: Option<&LevelMap>) -> Result<()> {
        let mut batch = StorageBatch::new();
        if let Some(levels) = levels {
            batch.put(snapshot_key(name), levels.to_snapshot_bytes());
        }
        batch.put(meta_key(name), meta.serialize().to_vec());
        self.commit_batch(batch)?;
        Ok(())
    }
}
