//! Restart behavior against a real RocksDB directory.

use assert_matches::assert_matches;
use hashpath_storage::rocksdb_storage::test_utils::TempStorage;
use hashpath_tree::{
    LEAF_BYTES, MerkleTree, MerkleTreeError, RecomputeStrategy, TreeConfig, ZeroHashes,
};

fn leaf(byte: u8) -> [u8; LEAF_BYTES] {
    [byte; LEAF_BYTES]
}

#[test]
fn test_root_and_paths_survive_restart() {
    let mut storage = TempStorage::new();
    let (root, path) = {
        let mut tree = MerkleTree::open(&*storage, "accounts", 8).expect("open");
        for i in 0..10u64 {
            tree.update_element(i * 3, &leaf(i as u8 + 1)).expect("update");
        }
        let path = tree.hash_path(27).expect("path");
        (tree.root(), path)
    };

    storage.reopen();

    let mut tree = MerkleTree::open(&*storage, "accounts", 8).expect("reopen");
    assert_eq!(tree.depth(), 8);
    assert_eq!(tree.root(), root);
    let restored = tree.hash_path(27).expect("path after restart");
    assert_eq!(restored, path);
    restored.verify(27, &leaf(10), &root).expect("verify");

    let next = tree.update_element(200, &leaf(0xEE)).expect("update after restart");
    assert_ne!(next, root);
}

#[test]
fn test_empty_tree_survives_restart() {
    let mut storage = TempStorage::new();
    drop(MerkleTree::open(&*storage, "t", 16).expect("open"));
    storage.reopen();

    let mut tree = MerkleTree::open(&*storage, "t", 4).expect("reopen");
    assert_eq!(tree.depth(), 16);
    assert_eq!(tree.root(), ZeroHashes::build(16).expect("depth").root());
    tree.hash_path(0).expect("path");
}

#[test]
fn test_restart_without_snapshot() {
    let mut storage = TempStorage::new();
    let config = TreeConfig::default()
        .with_snapshot(false)
        .with_recompute(RecomputeStrategy::Full);
    let root = {
        let mut tree = MerkleTree::open_with_config(&*storage, "t", 6, config).expect("open");
        tree.update_element(4, &leaf(4)).expect("update")
    };
    storage.reopen();

    let mut tree = MerkleTree::open_with_config(&*storage, "t", 6, config).expect("reopen");
    assert_eq!(tree.root(), root);
    assert_matches!(
        tree.hash_path(4),
        Err(MerkleTreeError::SnapshotUnavailable { .. })
    );
}

#[test]
fn test_destroy_survives_restart() {
    let mut storage = TempStorage::new();
    {
        let mut tree = MerkleTree::open(&*storage, "t", 5).expect("open");
        tree.update_element(1, &leaf(1)).expect("update");
        tree.destroy().expect("destroy");
    }
    storage.reopen();
    assert!(!MerkleTree::exists(&&*storage, "t").expect("exists"));
}
