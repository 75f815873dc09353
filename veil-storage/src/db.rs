use crate::kv::{BatchOp, KvStore};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use veil_types::state::LedgerState;

const TIP_KEY: &[u8] = b"ledger_tip";

/// Snapshots kept behind the tip, the tip included.
pub const DEFAULT_SNAPSHOT_RETENTION: u64 = 64;

/// Read-only view handed to indexers and dashboards. `contract_address` is
/// opaque metadata carried through unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub height: u64,
    pub contract_address: Vec<u8>,
    pub root_hash: [u8; 32],
    pub state: LedgerState,
}

impl LedgerSnapshot {
    pub fn new(height: u64, contract_address: Vec<u8>, state: LedgerState) -> Self {
        Self {
            height,
            contract_address,
            root_hash: state.root_hash(),
            state,
        }
    }
}

pub struct Storage<S: KvStore> {
    backend: S,
    retention: u64,
}

fn snapshot_key(height: u64) -> Vec<u8> {
    format!("snapshot_height_{}", height).into_bytes()
}

impl<S: KvStore> Storage<S> {
    pub fn new(backend: S) -> Self {
        Self::with_retention(backend, DEFAULT_SNAPSHOT_RETENTION)
    }

    /// Keeps the newest `retention` snapshots; older heights are pruned on commit.
    pub fn with_retention(backend: S, retention: u64) -> Self {
        Self {
            backend,
            retention: retention.max(1),
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn retention(&self) -> u64 {
        self.retention
    }

    /// Stores the snapshot at its height, moves the tip and prunes the
    /// snapshot that fell out of the retention window, all in one batch.
    pub fn commit(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        let encoded = bincode::serialize(snapshot).map_err(|e| anyhow!("Serialization error: {}", e))?;
        let tip = bincode::serialize(&snapshot.height).map_err(|e| anyhow!("Serialization error: {}", e))?;

        let mut ops = vec![
            BatchOp::Put(snapshot_key(snapshot.height), encoded),
            BatchOp::Put(TIP_KEY.to_vec(), tip),
        ];
        if let Some(expired) = snapshot.height.checked_sub(self.retention) {
            ops.push(BatchOp::Delete(snapshot_key(expired)));
        }

        self.backend
            .write_batch(ops)
            .with_context(|| format!("committing snapshot at height {}", snapshot.height))?;

        debug!(
            height = snapshot.height,
            root = %hex::encode(snapshot.root_hash),
            "ledger committed"
        );
        Ok(())
    }

    pub fn load_tip(&self) -> Result<Option<u64>> {
        match self.backend.get(TIP_KEY)? {
            Some(v) => Ok(Some(bincode::deserialize(&v).context("decoding tip")?)),
            None => Ok(None),
        }
    }

    pub fn load_snapshot_by_height(&self, height: u64) -> Result<Option<LedgerSnapshot>> {
        match self.backend.get(&snapshot_key(height))? {
            Some(v) => {
                let snapshot: LedgerSnapshot = bincode::deserialize(&v).context("decoding snapshot")?;
                if snapshot.state.root_hash() != snapshot.root_hash {
                    return Err(anyhow!("Snapshot at height {} fails its root hash check", height));
                }
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    pub fn load_latest_snapshot(&self) -> Result<Option<LedgerSnapshot>> {
        match self.load_tip()? {
            Some(height) => self.load_snapshot_by_height(height),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use veil_types::keys::{UserKey, WalletKey};
    use veil_types::loan::{LoanApplication, LoanStatus};

    fn sample_state() -> LedgerState {
        let mut state = LedgerState::new(WalletKey([1u8; 32]));
        state.blacklist.insert(WalletKey([2u8; 32]));
        state.providers.insert(3, [4u8; 32]);
        state
            .ledger
            .create(UserKey([5u8; 32]), LoanApplication::new(LoanStatus::Proposed, 7000));
        state
    }

    #[test]
    fn empty_store_has_no_state() {
        let storage = Storage::new(MemoryStore::new());
        assert!(storage.load_tip().unwrap().is_none());
        assert!(storage.load_latest_snapshot().unwrap().is_none());
    }

    #[test]
    fn commit_persists_snapshot_and_tip() {
        let storage = Storage::new(MemoryStore::new());
        let state = sample_state();
        let snapshot = LedgerSnapshot::new(3, b"veil-contract".to_vec(), state.clone());
        storage.commit(&snapshot).unwrap();

        assert_eq!(storage.load_tip().unwrap(), Some(3));
        let loaded = storage.load_latest_snapshot().unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.state, state);
        assert_eq!(loaded.contract_address, b"veil-contract".to_vec());
        assert!(storage.load_snapshot_by_height(2).unwrap().is_none());
    }

    #[test]
    fn tampered_snapshot_is_rejected() {
        let storage = Storage::new(MemoryStore::new());
        let mut snapshot = LedgerSnapshot::new(1, Vec::new(), sample_state());
        snapshot.root_hash = [0u8; 32];
        storage.commit(&snapshot).unwrap();
        assert!(storage.load_snapshot_by_height(1).is_err());
    }

    #[test]
    fn old_snapshots_are_pruned_past_retention() {
        let storage = Storage::with_retention(MemoryStore::new(), 3);
        let state = sample_state();
        for height in 0..10 {
            storage
                .commit(&LedgerSnapshot::new(height, Vec::new(), state.clone()))
                .unwrap();
        }

        for height in 0..7 {
            assert!(storage.load_snapshot_by_height(height).unwrap().is_none(), "height {}", height);
        }
        for height in 7..10 {
            assert!(storage.load_snapshot_by_height(height).unwrap().is_some(), "height {}", height);
        }
        // Three snapshots plus the tip.
        assert_eq!(storage.backend().len().unwrap(), 4);
        assert_eq!(storage.load_latest_snapshot().unwrap().unwrap().height, 9);
    }

    #[test]
    fn retention_is_at_least_the_tip() {
        let storage = Storage::with_retention(MemoryStore::new(), 0);
        assert_eq!(storage.retention(), 1);
        storage.commit(&LedgerSnapshot::new(0, Vec::new(), sample_state())).unwrap();
        storage.commit(&LedgerSnapshot::new(1, Vec::new(), sample_state())).unwrap();
        assert!(storage.load_snapshot_by_height(0).unwrap().is_none());
        assert_eq!(storage.load_latest_snapshot().unwrap().unwrap().height, 1);
    }
}
