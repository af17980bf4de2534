//! Snapshot codec for a [`LevelMap`].
//!
//! Format, integers little-endian:
//!
//! ```text
//! depth: u32
//! for each level 0..=depth:
//!     count: u64
//!     count * [u8; 32]
//! checksum: [u8; 32]    blake3 of every preceding byte
//! ```
//!
//! Only populated prefixes are written; the zero-hash tail of each level is
//! reconstructed on read through [`LevelMap::node_at`].

use crate::{
    MerkleTreeError, Result,
    hash::{HASH_BYTES, Hash, capacity, validate_depth},
    level_map::LevelMap,
};

/// Bytes of a snapshot with no levels: depth prefix plus checksum.
const MIN_SNAPSHOT_LEN: usize = 4 + HASH_BYTES;

fn corrupted(msg: impl Into<String>) -> MerkleTreeError {
    MerkleTreeError::CorruptedSnapshot(msg.into())
}

/// Cursor over the checksummed body of a snapshot.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(corrupted(format!(
                "truncated at byte {}: need {}, have {}",
                self.pos,
                len,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(buf))
    }
}

impl LevelMap {
    /// Encode every level's populated prefix with a trailing checksum.
    pub fn to_snapshot_bytes(&self) -> Vec<u8> {
        let nodes: usize = self.levels().iter().map(Vec::len).sum();
        let mut buf =
            Vec::with_capacity(MIN_SNAPSHOT_LEN + 8 * self.levels().len() + nodes * HASH_BYTES);
        buf.extend_from_slice(&self.depth().to_le_bytes());
        for level in self.levels() {
            buf.extend_from_slice(&(level.len() as u64).to_le_bytes());
            for hash in level {
                buf.extend_from_slice(hash);
            }
        }
        let checksum = blake3::hash(&buf);
        buf.extend_from_slice(checksum.as_bytes());
        buf
    }

    /// Decode a snapshot written by [`LevelMap::to_snapshot_bytes`].
    ///
    /// Fails with [`MerkleTreeError::CorruptedSnapshot`] on a checksum
    /// mismatch, a depth other than `expected_depth`, level sizes that do not
    /// follow `ceil(leaf_count / 2^level)`, or trailing bytes.
    pub fn from_snapshot_bytes(bytes: &[u8], expected_depth: u32) -> Result<Self> {
        validate_depth(expected_depth)?;
        if bytes.len() < MIN_SNAPSHOT_LEN {
            return Err(corrupted(format!(
                "{} bytes is shorter than the minimum {}",
                bytes.len(),
                MIN_SNAPSHOT_LEN
            )));
        }
        let (body, checksum) = bytes.split_at(bytes.len() - HASH_BYTES);
        if blake3::hash(body).as_bytes() != checksum {
            return Err(corrupted("checksum mismatch"));
        }

        let mut reader = Reader { bytes: body, pos: 0 };
        let depth = reader.read_u32()?;
        if depth != expected_depth {
            return Err(corrupted(format!(
                "snapshot depth {} does not match tree depth {}",
                depth, expected_depth
            )));
        }

        let mut levels: Vec<Vec<Hash>> = Vec::with_capacity(depth as usize + 1);
        let mut leaf_count = 0u64;
        for level in 0..=depth {
            let count = reader.read_u64()?;
            let expected = if level == 0 {
                if count > capacity(depth) {
                    return Err(corrupted(format!(
                        "{} leaves exceed capacity {}",
                        count,
                        capacity(depth)
                    )));
                }
                leaf_count = count;
                count
            } else if level == depth {
                1
            } else {
                leaf_count.div_ceil(1u64 << level)
            };
            if count != expected {
                return Err(corrupted(format!(
                    "level {} holds {} nodes, expected {}",
                    level, count, expected
                )));
            }
            // Length is checked before allocating.
            let len = usize::try_from(count)
                .ok()
                .and_then(|count| count.checked_mul(HASH_BYTES))
                .ok_or_else(|| corrupted(format!("level {} is too large", level)))?;
            let raw = reader.take(len)?;
            let nodes = raw
                .chunks_exact(HASH_BYTES)
                .map(|chunk| {
                    let mut hash = [0u8; HASH_BYTES];
                    hash.copy_from_slice(chunk);
                    hash
                })
                .collect();
            levels.push(nodes);
        }
        if reader.remaining() != 0 {
            return Err(corrupted(format!(
                "{} trailing bytes after last level",
                reader.remaining()
            )));
        }
        Ok(Self::from_levels(depth, levels))
    }
}
