use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Put(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

/// Minimal byte-keyed backend. `write_batch` must apply all ops or none.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<()>;

    fn put(&self, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.write_batch(vec![BatchOp::Put(key.to_vec(), value)])
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        let entries = self.entries.read().map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| anyhow!("memory store lock poisoned"))?;
        for op in ops {
            match op {
                BatchOp::Put(key, value) => {
                    entries.insert(key, value);
                }
                BatchOp::Delete(key) => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(feature = "rocksdb")]
pub use self::rocks::RocksStore;

#[cfg(feature = "rocksdb")]
mod rocks {
    use super::{BatchOp, KvStore};
    use anyhow::{anyhow, Result};
    use rocksdb::{Options, WriteBatch, DB};

    pub struct RocksStore {
        db: DB,
    }

    impl RocksStore {
        pub fn open(path: &str) -> Result<Self> {
            let mut opts = Options::default();
            opts.create_if_missing(true);
            let db = DB::open(&opts, path).map_err(|e| anyhow!("Failed to open DB: {}", e))?;
            Ok(Self { db })
        }
    }

    impl KvStore for RocksStore {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
            self.db.get(key).map_err(|e| anyhow!("DB read error: {}", e))
        }

        fn write_batch(&self, ops: Vec<BatchOp>) -> Result<()> {
            let mut batch = WriteBatch::default();
            for op in ops {
                match op {
                    BatchOp::Put(key, value) => batch.put(key, value),
                    BatchOp::Delete(key) => batch.delete(key),
                }
            }
            self.db.write(batch).map_err(|e| anyhow!("DB write error: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_apply_puts_and_deletes_in_order() {
        let store = MemoryStore::new();
        assert!(store.is_empty().unwrap());

        store.put(b"a", b"1".to_vec()).unwrap();
        store
            .write_batch(vec![
                BatchOp::Put(b"b".to_vec(), b"2".to_vec()),
                BatchOp::Delete(b"a".to_vec()),
                BatchOp::Put(b"a".to_vec(), b"3".to_vec()),
                BatchOp::Delete(b"missing".to_vec()),
            ])
            .unwrap();

        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(store.get(b"a").unwrap(), Some(b"3".to_vec()));
        assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn poisoned_lock_is_an_error() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(store.len().is_err());
        assert!(store.is_empty().is_err());
        assert!(store.get(b"a").is_err());
    }
}
