//! Useful utilities for testing.

use std::ops::Deref;

use tempfile::TempDir;

use super::*;

/// RocksDb storage with self-cleanup.
///
/// The database directory outlives any number of [`TempStorage::reopen`]
/// calls and is removed when the `TempStorage` is dropped.
pub struct TempStorage {
    dir: TempDir,
    storage: Option<RocksDbStorage>,
}

impl TempStorage {
    /// Create new `TempStorage`
    pub fn new() -> Self {
        let dir = TempDir::new().expect("cannot create tempdir");
        let storage = RocksDbStorage::default_rocksdb_with_path(dir.path())
            .expect("cannot open RocksDB storage");
        TempStorage {
            dir,
            storage: Some(storage),
        }
    }

    /// Close the database and open it again from the same directory,
    /// simulating a process restart.
    pub fn reopen(&mut self) {
        // RocksDB holds a lock on the directory until the handle is dropped
        drop(self.storage.take());
        let storage = RocksDbStorage::default_rocksdb_with_path(self.dir.path())
            .expect("cannot reopen RocksDB storage");
        self.storage = Some(storage);
    }
}

impl Default for TempStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TempStorage {
    type Target = RocksDbStorage;

    fn deref(&self) -> &Self::Target {
        self.storage.as_ref().expect("storage is open")
    }
}
