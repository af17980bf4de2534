//! Test utilities: leaf builders and a storage that fails on demand.

use std::cell::Cell;

use hashpath_storage::{Error, MemStorage, Storage, StorageBatch};

use crate::hash::{LEAF_BYTES, Leaf};

/// A 64-byte leaf filled with `byte`.
pub(crate) fn leaf_filled(byte: u8) -> Leaf {
    [byte; LEAF_BYTES]
}

/// A distinct, non-zero leaf derived from `i`.
pub(crate) fn leaf_from_u64(i: u64) -> Leaf {
    let mut leaf = [0xA5u8; LEAF_BYTES];
    leaf[..8].copy_from_slice(&i.to_le_bytes());
    leaf
}

/// In-memory storage whose writes can be switched to fail.
///
/// Reads always succeed. While `fail_writes` is set every `put`, `delete`
/// and `commit_batch` returns an error without touching the data.
#[derive(Debug, Default)]
pub(crate) struct FailingStorage {
    pub inner: MemStorage,
    pub fail_writes: Cell<bool>,
}

impl FailingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&self) -> Result<(), Error> {
        if self.fail_writes.get() {
            return Err(Error::StorageError("injected write failure".into()));
        }
        Ok(())
    }
}

impl Storage for FailingStorage {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        self.inner.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        self.check()?;
        self.inner.put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), Error> {
        self.check()?;
        self.inner.delete(key)
    }

    fn commit_batch(&self, batch: StorageBatch) -> Result<(), Error> {
        self.check()?;
        self.inner.commit_batch(batch)
    }
}
