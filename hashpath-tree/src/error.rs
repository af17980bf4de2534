use thiserror::Error;

/// Alias for `core::result::Result<T, MerkleTreeError>`.
pub type Result<T> = core::result::Result<T, MerkleTreeError>;

/// Errors from fixed-depth Merkle tree operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MerkleTreeError {
    /// Depth outside `1..=MAX_DEPTH`. Fatal at construction.
    #[error("invalid depth {depth}: must be between 1 and {max}")]
    InvalidDepth {
        /// Requested depth.
        depth: u32,
        /// Largest supported depth.
        max: u32,
    },
    /// Leaf index outside `0..2^depth`. Signed so that callers holding a
    /// negative index can report it through the same variant.
    #[error("index {index} out of range for depth {depth} (capacity {capacity})")]
    OutOfRange {
        /// Offending index as supplied.
        index: i128,
        /// Depth of the tree.
        depth: u32,
        /// Number of leaf slots, `2^depth`.
        capacity: u64,
    },
    /// Leaf value not exactly `LEAF_BYTES` long.
    #[error("leaf must be {expected} bytes, got {actual}")]
    InvalidLeafSize {
        /// Required leaf size.
        expected: usize,
        /// Size of the supplied value.
        actual: usize,
    },
    /// Any failure of the backing store.
    #[error("storage error: {0}")]
    Storage(#[from] hashpath_storage::Error),
    /// Snapshot bytes failed to decode.
    #[error("corrupted snapshot: {0}")]
    CorruptedSnapshot(String),
    /// Metadata record failed to decode.
    #[error("corrupted metadata: {0}")]
    CorruptedMetadata(String),
    /// The persisted root is not the empty-tree root and no snapshot
    /// matching it could be loaded.
    #[error("no usable snapshot for tree {name:?} with root {root}")]
    SnapshotUnavailable {
        /// Tree name.
        name: String,
        /// Persisted root, hex encoded.
        root: String,
    },
    /// Hash path that does not verify.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
    /// Malformed input, such as a bad tree name or undecodable path.
    #[error("invalid data: {0}")]
    InvalidData(String),
}
