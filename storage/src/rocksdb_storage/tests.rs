//! Tests

use super::test_utils::TempStorage;
use crate::{Storage, StorageBatch};

#[test]
fn test_put_get_survives_reopen() {
    let mut storage = TempStorage::new();
    storage.put(b"key1", b"value1").expect("cannot put");
    assert_eq!(
        storage.get(b"key1").expect("cannot get"),
        Some(b"value1".to_vec())
    );

    storage.reopen();
    assert_eq!(
        storage.get(b"key1").expect("cannot get after reopen"),
        Some(b"value1".to_vec())
    );
    assert_eq!(storage.get(b"missing").expect("cannot get"), None);
}

#[test]
fn test_delete() {
    let storage = TempStorage::new();
    storage.put(b"key", b"value").expect("cannot put");
    storage.delete(b"key").expect("cannot delete");
    assert_eq!(storage.get(b"key").expect("cannot get"), None);
}

#[test]
fn test_batch_commit() {
    let mut storage = TempStorage::new();
    storage.put(b"old", b"x").expect("cannot put");

    let mut batch = StorageBatch::new();
    batch.put(b"meta".to_vec(), vec![1u8; 40]);
    batch.put(b"snap".to_vec(), vec![2u8; 100]);
    batch.delete(b"old".to_vec());
    storage.commit_batch(batch).expect("cannot commit batch");

    storage.reopen();
    assert_eq!(storage.get(b"meta").expect("get"), Some(vec![1u8; 40]));
    assert_eq!(storage.get(b"snap").expect("get"), Some(vec![2u8; 100]));
    assert_eq!(storage.get(b"old").expect("get"), None);
}
