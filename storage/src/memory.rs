//! In-memory storage.

use std::{cell::RefCell, collections::BTreeMap};

use crate::{BatchOperation, Error, Storage, StorageBatch};

/// In-memory store backed by a `BTreeMap`.
///
/// Useful for tests and ephemeral trees. Batches are applied under a single
/// mutable borrow, so they are trivially atomic.
#[derive(Debug, Default, Clone)]
pub struct MemStorage {
    data: RefCell<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemStorage {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    /// Returns `true` if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }

    /// Copy of every stored key, in order.
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.data.borrow().keys().cloned().collect()
    }
}

impl Storage for MemStorage {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        self.data.borrow_mut().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), Error> {
        self.data.borrow_mut().remove(key);
        Ok(())
    }

    fn commit_batch(&self, batch: StorageBatch) -> Result<(), Error> {
        let mut data = self.data.borrow_mut();
        for op in batch {
            match op {
                BatchOperation::Put { key, value } => {
                    data.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_delete() {
        let storage = MemStorage::new();
        assert_eq!(storage.get(b"k").expect("get"), None);

        storage.put(b"k", b"v1").expect("put");
        assert_eq!(storage.get(b"k").expect("get"), Some(b"v1".to_vec()));

        storage.put(b"k", b"v2").expect("overwrite");
        assert_eq!(storage.get(b"k").expect("get"), Some(b"v2".to_vec()));

        storage.delete(b"k").expect("delete");
        assert_eq!(storage.get(b"k").expect("get"), None);
        // absent key
        storage.delete(b"k").expect("delete absent");
    }

    #[test]
    fn test_batch_applies_in_order() {
        let storage = MemStorage::new();
        storage.put(b"gone", b"x").expect("put");

        let mut batch = StorageBatch::new();
        batch.put(b"a".to_vec(), b"1".to_vec());
        batch.put(b"a".to_vec(), b"2".to_vec());
        batch.delete(b"gone".to_vec());
        assert_eq!(batch.len(), 3);

        storage.commit_batch(batch).expect("commit");
        assert_eq!(storage.get(b"a").expect("get"), Some(b"2".to_vec()));
        assert_eq!(storage.get(b"gone").expect("get"), None);
        assert_eq!(storage.keys(), vec![b"a".to_vec()]);
    }

    #[test]
    fn test_storage_by_reference() {
        fn write_through<S: Storage>(store: S) {
            store.put(b"via-ref", b"ok").expect("put");
        }

        let storage = MemStorage::new();
        write_through(&storage);
        assert_eq!(storage.get(b"via-ref").expect("get"), Some(b"ok".to_vec()));
    }
}
