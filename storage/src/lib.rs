#![deny(missing_docs)]

//! Storage abstraction for hashpath Merkle trees.
//!
//! The tree layer only needs point reads, point writes and an atomic batch
//! commit, so that is all [`Storage`] asks for. [`MemStorage`] is always
//! available; [`rocksdb_storage::RocksDbStorage`] requires the
//! `rocksdb_storage` feature.

mod error;
mod memory;
#[cfg(feature = "rocksdb_storage")]
pub mod rocksdb_storage;
mod storage;

pub use crate::{
    error::Error,
    memory::MemStorage,
    storage::{BatchOperation, Storage, StorageBatch},
};
