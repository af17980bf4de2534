//! Storage abstraction used by the tree layer.

use crate::Error;

/// Point-read/point-write key-value storage with atomic batch commits.
///
/// All methods take `&self`; implementations use interior mutability the
/// same way a storage context does, so a store can be shared by reference
/// between a tree and the code that owns it.
pub trait Storage {
    /// Get the value stored under `key`, or `None` if the key is absent.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error>;

    /// Insert or replace the value under `key`.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Error>;

    /// Delete `key`. Deleting an absent key is not an error.
    fn delete(&self, key: &[u8]) -> Result<(), Error>;

    /// Apply every operation of `batch` atomically: either all of them
    /// become visible or none does.
    fn commit_batch(&self, batch: StorageBatch) -> Result<(), Error>;
}

impl<T: Storage + ?Sized> Storage for &T {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), Error> {
        (**self).delete(key)
    }

    fn commit_batch(&self, batch: StorageBatch) -> Result<(), Error> {
        (**self).commit_batch(batch)
    }
}

/// Deferred storage operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Deferred put operation
    Put {
        /// Key to write
        key: Vec<u8>,
        /// Value to write
        value: Vec<u8>,
    },
    /// Deferred delete operation
    Delete {
        /// Key to delete
        key: Vec<u8>,
    },
}

impl BatchOperation {
    /// Key this operation touches.
    pub fn key(&self) -> &[u8] {
        match self {
            BatchOperation::Put { key, .. } | BatchOperation::Delete { key } => key,
        }
    }
}

/// Ordered list of deferred operations applied by
/// [`Storage::commit_batch`]. Later operations on the same key win.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StorageBatch {
    operations: Vec<BatchOperation>,
}

impl StorageBatch {
    /// Create empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get batch length
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Batch emptiness predicate
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Add deferred `put` operation
    pub fn put(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.operations.push(BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Add deferred `delete` operation
    pub fn delete(&mut self, key: impl Into<Vec<u8>>) {
        self.operations
            .push(BatchOperation::Delete { key: key.into() });
    }

    /// Iterate over the deferred operations in insertion order.
    pub fn operations(&self) -> impl Iterator<Item = &BatchOperation> {
        self.operations.iter()
    }
}

impl IntoIterator for StorageBatch {
    type IntoIter = std::vec::IntoIter<BatchOperation>;
    type Item = BatchOperation;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}
