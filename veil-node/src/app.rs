use anyhow::Result;
use thiserror::Error;
use tracing::info;
use veil_crypto::{Blake3Deriver, Caller, PseudonymDeriver};
use veil_execution::{execute_on_copy, Outcome};
use veil_storage::{KvStore, LedgerSnapshot, Storage};
use veil_types::error::LedgerError;
use veil_types::instruction::LoanInstruction;
use veil_types::state::LedgerState;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] LedgerError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
    #[error("ledger service stopped")]
    ServiceStopped,
}

/// Single-writer ledger bound to its persistence. Every accepted call is
/// committed before it becomes visible in memory.
pub struct LedgerApp<S: KvStore> {
    state: LedgerState,
    storage: Storage<S>,
    deriver: Box<dyn PseudonymDeriver + Send + Sync>,
    height: u64,
    contract_address: Vec<u8>,
}

impl<S: KvStore> LedgerApp<S> {
    /// Resumes from the latest snapshot, or commits `genesis()` at height 0.
    pub fn open(
        storage: Storage<S>,
        contract_address: Vec<u8>,
        genesis: impl FnOnce() -> Result<LedgerState>,
    ) -> Result<Self> {
        let (state, height) = match storage.load_latest_snapshot()? {
            Some(snapshot) => {
                info!("Resuming ledger at height {}", snapshot.height);
                (snapshot.state, snapshot.height)
            }
            None => {
                info!("No ledger found, committing genesis state");
                let state = genesis()?;
                storage.commit(&LedgerSnapshot::new(0, contract_address.clone(), state.clone()))?;
                (state, 0)
            }
        };

        Ok(Self {
            state,
            storage,
            deriver: Box::new(Blake3Deriver::default()),
            height,
            contract_address,
        })
    }

    pub fn with_deriver(mut self, deriver: Box<dyn PseudonymDeriver + Send + Sync>) -> Self {
        self.deriver = deriver;
        self
    }

    pub fn submit(&mut self, caller: &Caller, ix: &LoanInstruction) -> Result<Outcome, SubmitError> {
        let height = self.height + 1;
        let (next, outcome) = execute_on_copy(ix, caller, &self.state, self.deriver.as_ref(), height)?;

        self.storage
            .commit(&LedgerSnapshot::new(height, self.contract_address.clone(), next.clone()))?;
        self.state = next;
        self.height = height;
        Ok(outcome)
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn deriver(&self) -> &dyn PseudonymDeriver {
        self.deriver.as_ref()
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::new(self.height, self.contract_address.clone(), self.state.clone())
    }

    pub fn storage(&self) -> &Storage<S> {
        &self.storage
    }
}
