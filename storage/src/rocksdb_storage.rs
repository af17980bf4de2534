//! Storage implemented over RocksDB backend.
mod storage;
#[cfg(test)]
mod tests;
pub mod test_utils;

pub use self::storage::RocksDbStorage;
