//! Implementation for a storage abstraction over RocksDB.
use std::path::Path;

use lazy_static::lazy_static;
use rocksdb::{WriteBatch, DB};
use tracing::{debug, trace};

use crate::{BatchOperation, Error, Storage, StorageBatch};

lazy_static! {
    static ref DEFAULT_OPTS: rocksdb::Options = {
        let mut opts = rocksdb::Options::default();
        opts.create_if_missing(true);
        opts.set_atomic_flush(true);
        opts
    };
}

/// Storage which uses RocksDB as its backend.
pub struct RocksDbStorage {
    db: DB,
}

impl RocksDbStorage {
    /// Open (creating if needed) a RocksDB database at `path` with the
    /// default options.
    pub fn default_rocksdb_with_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let db = DB::open(&DEFAULT_OPTS, &path)?;
        debug!(path = %path.as_ref().display(), "opened rocksdb storage");
        Ok(RocksDbStorage { db })
    }

    /// Flush memtables to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.db.flush()?;
        Ok(())
    }
}

impl Storage for RocksDbStorage {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.db.get(key)?)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        self.db.put(key, value)?;
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), Error> {
        self.db.delete(key)?;
        Ok(())
    }

    fn commit_batch(&self, batch: StorageBatch) -> Result<(), Error> {
        let mut db_batch = WriteBatch::default();
        for op in batch {
            trace!(key = %hex::encode(op.key()), "batch op");
            match op {
                BatchOperation::Put { key, value } => db_batch.put(key, value),
                BatchOperation::Delete { key } => db_batch.delete(key),
            }
        }
        self.db.write(db_batch)?;
        Ok(())
    }
}
