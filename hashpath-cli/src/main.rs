//! `hashpath`: inspect and update fixed-depth Merkle trees stored in RocksDB.

mod cli;

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Parser;
use hashpath_storage::rocksdb_storage::RocksDbStorage;
use hashpath_tree::{HASH_BYTES, Hash, LEAF_BYTES, Leaf, MerkleTree, TreeStore, leaf_index};
use tracing::debug;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let storage = RocksDbStorage::default_rocksdb_with_path(&cli.db_path)
        .with_context(|| format!("failed to open database at {}", cli.db_path.display()))?;
    debug!(path = %cli.db_path.display(), tree = %cli.tree, "opened database");

    run(&cli, &storage, &mut std::io::stdout().lock())
}

/// Execute `cli.command` against `store`, writing results to `out`.
fn run<S: TreeStore>(cli: &Cli, store: S, out: &mut impl Write) -> Result<()> {
    if matches!(cli.command, Commands::Destroy) && !MerkleTree::exists(&store, &cli.tree)? {
        bail!("tree {:?} does not exist", cli.tree);
    }

    let mut tree = MerkleTree::open_with_config(store, &cli.tree, cli.depth, cli.tree_config())
        .with_context(|| format!("failed to open tree {:?}", cli.tree))?;

    match &cli.command {
        Commands::Init => {
            writeln!(out, "root  {}", hex::encode(tree.root()))?;
            writeln!(out, "depth {}", tree.depth())?;
        }
        Commands::Root => {
            writeln!(out, "{}", hex::encode(tree.root()))?;
        }
        Commands::Update { index, value } => {
            let index = leaf_index(*index, tree.depth())?;
            let leaf = parse_leaf(value)?;
            let root = tree.update_element(index, &leaf)?;
            writeln!(out, "{}", hex::encode(root))?;
        }
        Commands::Path { index } => {
            let index = leaf_index(*index, tree.depth())?;
            let path = tree.hash_path(index)?;
            for (level, (left, right)) in path.pairs().iter().enumerate() {
                writeln!(out, "{} {} {}", level, hex::encode(left), hex::encode(right))?;
            }
        }
        Commands::Verify { index, value, root } => {
            let index = leaf_index(*index, tree.depth())?;
            let leaf = parse_leaf(value)?;
            let expected = match root {
                Some(root) => parse_hash(root)?,
                None => tree.root(),
            };
            let path = tree.hash_path(index)?;
            path.verify(index, &leaf, &expected)
                .context("verification failed")?;
            writeln!(out, "ok")?;
        }
        Commands::Destroy => {
            let name = tree.name().to_owned();
            tree.destroy()?;
            writeln!(out, "destroyed {}", name)?;
        }
    }
    Ok(())
}

fn parse_leaf(value: &str) -> Result<Leaf> {
    let bytes = hex::decode(value).context("value is not valid hex")?;
    if bytes.len() != LEAF_BYTES {
        bail!(
            "value must be {} bytes ({} hex characters), got {} bytes",
            LEAF_BYTES,
            LEAF_BYTES * 2,
            bytes.len()
        );
    }
    let mut leaf = [0u8; LEAF_BYTES];
    leaf.copy_from_slice(&bytes);
    Ok(leaf)
}

fn parse_hash(value: &str) -> Result<Hash> {
    let bytes = hex::decode(value).context("root is not valid hex")?;
    if bytes.len() != HASH_BYTES {
        bail!("root must be {} bytes, got {}", HASH_BYTES, bytes.len());
    }
    let mut hash = [0u8; HASH_BYTES];
    hash.copy_from_slice(&bytes);
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use hashpath_storage::MemStorage;
    use hashpath_tree::{MerkleTreeError, ZeroHashes};

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["hashpath", "--db-path", "/unused", "--depth", "3"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    fn run_to_string(store: &MemStorage, args: &[&str]) -> Result<String> {
        let mut out = Vec::new();
        run(&cli(args), store, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8 output"))
    }

    fn value_hex(byte: u8) -> String {
        hex::encode([byte; LEAF_BYTES])
    }

    #[test]
    fn test_init_prints_empty_root() {
        let store = MemStorage::new();
        let out = run_to_string(&store, &["init"]).expect("init");
        let zero = ZeroHashes::build(3).expect("depth 3");
        assert_eq!(
            out,
            format!("root  {}\ndepth 3\n", hex::encode(zero.root()))
        );
    }

    #[test]
    fn test_update_then_verify() {
        let store = MemStorage::new();
        let root = run_to_string(&store, &["update", "5", &value_hex(7)]).expect("update");
        assert_eq!(
            run_to_string(&store, &["root"]).expect("root"),
            root,
            "root reflects the update"
        );

        let out = run_to_string(&store, &["verify", "5", &value_hex(7)]).expect("verify");
        assert_eq!(out, "ok\n");
        assert!(run_to_string(&store, &["verify", "5", &value_hex(8)]).is_err());

        let stale = hex::encode([0u8; HASH_BYTES]);
        assert!(run_to_string(&store, &["verify", "5", &value_hex(7), "--root", &stale]).is_err());
    }

    #[test]
    fn test_path_output() {
        let store = MemStorage::new();
        run_to_string(&store, &["update", "2", &value_hex(1)]).expect("update");
        let out = run_to_string(&store, &["path", "2"]).expect("path");
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        for (level, line) in lines.iter().enumerate() {
            let fields: Vec<_> = line.split(' ').collect();
            assert_eq!(fields.len(), 3);
            assert_eq!(fields[0], level.to_string());
            assert_eq!(fields[1].len(), HASH_BYTES * 2);
            assert_eq!(fields[2].len(), HASH_BYTES * 2);
        }
    }

    #[test]
    fn test_negative_index_is_out_of_range() {
        let store = MemStorage::new();
        let err = run_to_string(&store, &["path", "-1"]).expect_err("negative index");
        assert!(matches!(
            err.downcast_ref::<MerkleTreeError>(),
            Some(MerkleTreeError::OutOfRange { index: -1, .. })
        ));
        assert!(run_to_string(&store, &["update", "8", &value_hex(1)]).is_err());
    }

    #[test]
    fn test_bad_values_rejected() {
        let store = MemStorage::new();
        assert!(run_to_string(&store, &["update", "0", "zz"]).is_err());
        assert!(run_to_string(&store, &["update", "0", &hex::encode([1u8; 63])]).is_err());
    }

    #[test]
    fn test_destroy() {
        let store = MemStorage::new();
        assert!(run_to_string(&store, &["destroy"]).is_err());
        run_to_string(&store, &["update", "0", &value_hex(1)]).expect("update");
        run_to_string(&store, &["destroy"]).expect("destroy");
        assert!(store.is_empty());
    }

    #[test]
    fn test_flags_select_config() {
        let parsed = cli(&["--no-snapshot", "--full-recompute", "root"]);
        let config = parsed.tree_config();
        assert!(!config.snapshot);
        assert_eq!(config.recompute, hashpath_tree::RecomputeStrategy::Full);
        assert_eq!(parsed.tree, "default");
    }
}
