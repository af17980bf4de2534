//! Tree metadata: the durable identity of a named tree.

use crate::{
    MerkleTreeError, Result,
    hash::{HASH_BYTES, Hash, validate_depth},
};

/// Serialized size of [`TreeMeta`].
pub const META_LEN: usize = 40;

/// Root and depth of a named tree.
///
/// Wire format (40 bytes): `root[0..32] || depth as u32 LE [32..36] ||
/// reserved [36..40]`. The reserved bytes are written as zero and ignored
/// on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeMeta {
    /// Last committed root.
    pub root: Hash,
    /// Depth fixed at creation.
    pub depth: u32,
}

impl TreeMeta {
    /// Serialize to the 40-byte wire format.
    pub fn serialize(&self) -> [u8; META_LEN] {
        let mut buf = [0u8; META_LEN];
        buf[0..HASH_BYTES].copy_from_slice(&self.root);
        buf[HASH_BYTES..HASH_BYTES + 4].copy_from_slice(&self.depth.to_le_bytes());
        buf
    }

    /// Deserialize and validate the depth.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != META_LEN {
            return Err(MerkleTreeError::CorruptedMetadata(format!(
                "expected {} bytes, got {}",
                META_LEN,
                bytes.len()
            )));
        }
        let mut root = [0u8; HASH_BYTES];
        root.copy_from_slice(&bytes[0..HASH_BYTES]);
        let mut depth_bytes = [0u8; 4];
        depth_bytes.copy_from_slice(&bytes[HASH_BYTES..HASH_BYTES + 4]);
        let depth = u32::from_le_bytes(depth_bytes);
        validate_depth(depth)
            .map_err(|e| MerkleTreeError::CorruptedMetadata(format!("stored {}", e)))?;
        Ok(Self { root, depth })
    }
}
