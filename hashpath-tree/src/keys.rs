//! Key layout in the backing store.
//!
//! - metadata: the tree name's bytes
//! - snapshot: `0x00 || "snapshot" || name`
//!
//! Names may not be empty or begin with `0x00`, so no tree name can collide
//! with a snapshot key.

use crate::{MerkleTreeError, Result};

/// Prefix reserved for snapshot keys.
pub const SNAPSHOT_KEY_PREFIX: &[u8] = b"\x00snapshot";

/// Reject names that are empty or would alias the reserved key space.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MerkleTreeError::InvalidData(
            "tree name must not be empty".into(),
        ));
    }
    if name.as_bytes()[0] == 0 {
        return Err(MerkleTreeError::InvalidData(
            "tree name must not start with a NUL byte".into(),
        ));
    }
    Ok(())
}

/// Key of the metadata record of tree `name`.
pub fn meta_key(name: &str) -> Vec<u8> {
    name.as_bytes().to_vec()
}

/// Key of the snapshot record of tree `name`.
pub fn snapshot_key(name: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(SNAPSHOT_KEY_PREFIX.len() + name.len());
    key.extend_from_slice(SNAPSHOT_KEY_PREFIX);
    key.extend_from_slice(name.as_bytes());
    key
}
