pub mod db;
pub mod kv;

pub use db::{LedgerSnapshot, Storage, DEFAULT_SNAPSHOT_RETENTION};
pub use kv::{BatchOp, KvStore, MemoryStore};
#[cfg(feature = "rocksdb")]
pub use kv::RocksStore;
