//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hashpath_tree::{RecomputeStrategy, TreeConfig};

#[derive(Parser, Debug)]
#[command(name = "hashpath")]
#[command(about = "Fixed-depth Merkle trees with hash-path proofs", long_about = None)]
pub struct Cli {
    /// RocksDB directory holding the trees
    #[arg(long, env = "HASHPATH_DB_PATH")]
    pub db_path: PathBuf,

    /// Tree name
    #[arg(long, env = "HASHPATH_TREE", default_value = "default")]
    pub tree: String,

    /// Depth used when the tree does not exist yet
    #[arg(long, env = "HASHPATH_DEPTH", default_value_t = 20)]
    pub depth: u32,

    /// Persist only the root and depth, not the level snapshot
    #[arg(long)]
    pub no_snapshot: bool,

    /// Rebuild every level on update instead of the leaf-to-root chain
    #[arg(long)]
    pub full_recompute: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open or create the tree and print its root and depth
    Init,

    /// Print the current root
    Root,

    /// Set a leaf and print the new root
    Update {
        /// Leaf index
        #[arg(allow_negative_numbers = true)]
        index: i64,

        /// 64-byte value as 128 hex characters
        value: String,
    },

    /// Print the hash path of a leaf, one `level left right` line per level
    Path {
        /// Leaf index
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Check that a value sits at an index under the current root
    Verify {
        /// Leaf index
        #[arg(allow_negative_numbers = true)]
        index: i64,

        /// 64-byte value as 128 hex characters
        value: String,

        /// Verify against this root instead of the current one
        #[arg(long)]
        root: Option<String>,
    },

    /// Delete the tree
    Destroy,
}

impl Cli {
    /// Tree options selected by the flags.
    pub fn tree_config(&self) -> TreeConfig {
        let recompute = if self.full_recompute {
            RecomputeStrategy::Full
        } else {
            RecomputeStrategy::Incremental
        };
        TreeConfig::default()
            .with_snapshot(!self.no_snapshot)
            .with_recompute(recompute)
    }
}
