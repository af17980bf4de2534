//! Benchmarks for leaf updates and hash-path generation.

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use hashpath_storage::MemStorage;
use hashpath_tree::{LEAF_BYTES, LevelMap, MerkleTree, RecomputeStrategy, TreeConfig, ZeroHashes};

const DEPTH: u32 = 20;
const PREFILLED: u64 = 1024;

fn leaf_for(i: u64) -> [u8; LEAF_BYTES] {
    let mut leaf = [0x5Au8; LEAF_BYTES];
    leaf[..8].copy_from_slice(&i.to_le_bytes());
    leaf
}

fn prefilled_store(config: TreeConfig) -> MemStorage {
    let store = MemStorage::new();
    {
        let mut tree = MerkleTree::open_with_config(&store, "bench", DEPTH, config)
            .expect("open tree");
        for i in 0..PREFILLED {
            tree.update_element(i, &leaf_for(i)).expect("update");
        }
    }
    store
}

pub fn update_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_element");
    for (label, recompute) in [
        ("incremental", RecomputeStrategy::Incremental),
        ("full", RecomputeStrategy::Full),
    ] {
        let config = TreeConfig::default()
            .with_snapshot(false)
            .with_recompute(recompute);
        let store = prefilled_store(TreeConfig::default().with_recompute(recompute));
        group.bench_function(label, |b| {
            let mut tree =
                MerkleTree::open_with_config(&store, "bench", DEPTH, config).expect("open tree");
            // Load the snapshot outside the measured loop
            tree.hash_path(0).expect("warm up");
            let mut i = 0u64;
            b.iter(|| {
                i = (i + 1) % PREFILLED;
                black_box(tree.update_element(i, &leaf_for(i + 1)).expect("update"))
            })
        });
    }
    group.finish();
}

pub fn hash_path_benchmark(c: &mut Criterion) {
    let store = prefilled_store(TreeConfig::default());
    let mut tree = MerkleTree::open(&store, "bench", DEPTH).expect("open tree");
    let root = tree.root();

    c.bench_function("hash_path", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i = (i + 7) % PREFILLED;
            black_box(tree.hash_path(i).expect("path"))
        })
    });

    let path = tree.hash_path(PREFILLED / 2).expect("path");
    let leaf = leaf_for(PREFILLED / 2);
    c.bench_function("verify", |b| {
        b.iter(|| path.verify(PREFILLED / 2, &leaf, &root).expect("verify"))
    });
}

pub fn build_benchmark(c: &mut Criterion) {
    let zero = ZeroHashes::build(DEPTH).expect("zero hashes");
    let leaves: Vec<_> = (0..PREFILLED).map(leaf_for).collect();
    c.bench_function("level_map_build", |b| {
        b.iter_batched(
            || leaves.clone(),
            |leaves| black_box(LevelMap::build(&leaves, &zero).expect("build")),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    update_benchmark,
    hash_path_benchmark,
    build_benchmark
);
criterion_main!(benches);
