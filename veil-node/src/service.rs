use crate::app::{LedgerApp, SubmitError};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::info;
use veil_crypto::Caller;
use veil_execution::Outcome;
use veil_storage::{KvStore, LedgerSnapshot};
use veil_types::instruction::LoanInstruction;

struct Submission {
    caller: Caller,
    instruction: LoanInstruction,
    reply: oneshot::Sender<Result<Outcome, SubmitError>>,
}

/// Cloneable front door to the ledger. Calls are applied one at a time in
/// arrival order by the service task.
#[derive(Clone)]
pub struct LedgerHandle {
    tx: mpsc::Sender<Submission>,
    view: Arc<RwLock<LedgerSnapshot>>,
}

impl LedgerHandle {
    pub async fn submit(&self, caller: Caller, instruction: LoanInstruction) -> Result<Outcome, SubmitError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Submission {
                caller,
                instruction,
                reply,
            })
            .await
            .map_err(|_| SubmitError::ServiceStopped)?;
        rx.await.map_err(|_| SubmitError::ServiceStopped)?
    }

    /// Latest committed snapshot.
    pub async fn snapshot(&self) -> LedgerSnapshot {
        self.view.read().await.clone()
    }
}

pub struct LedgerService<S: KvStore> {
    app: LedgerApp<S>,
    rx: mpsc::Receiver<Submission>,
    view: Arc<RwLock<LedgerSnapshot>>,
}

impl<S: KvStore + 'static> LedgerService<S> {
    pub fn new(app: LedgerApp<S>, queue_depth: usize) -> (Self, LedgerHandle) {
        let (tx, rx) = mpsc::channel(queue_depth);
        let view = Arc::new(RwLock::new(app.snapshot()));
        let handle = LedgerHandle {
            tx,
            view: view.clone(),
        };
        (Self { app, rx, view }, handle)
    }

    /// Runs until every handle is dropped, then hands the app back.
    pub async fn run(mut self) -> LedgerApp<S> {
        info!("Ledger service started at height {}", self.app.height());
        while let Some(submission) = self.rx.recv().await {
            let result = self.app.submit(&submission.caller, &submission.instruction);
            if result.is_ok() {
                let snapshot = self.app.snapshot();
                *self.view.write().await = snapshot;
            }
            // The submitter may have gone away; the call is committed regardless.
            let _ = submission.reply.send(result);
        }
        info!("Ledger service stopped at height {}", self.app.height());
        self.app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_storage::{MemoryStore, Storage};
    use veil_types::error::LedgerError;
    use veil_types::keys::WalletKey;
    use veil_types::state::LedgerState;

    #[tokio::test]
    async fn submissions_are_serialized_and_visible() {
        let admin = Caller::generate();
        let genesis = LedgerState::new(admin.wallet());
        let app = LedgerApp::open(Storage::new(MemoryStore::new()), Vec::new(), || Ok(genesis)).unwrap();
        let (service, handle) = LedgerService::new(app, 16);
        let task = tokio::spawn(service.run());

        let mut joins = Vec::new();
        for i in 0..8u8 {
            let handle = handle.clone();
            let admin = admin.clone();
            joins.push(tokio::spawn(async move {
                handle
                    .submit(admin, LoanInstruction::BlacklistUser { wallet: WalletKey([i; 32]) })
                    .await
            }));
        }
        for join in joins {
            join.await.unwrap().unwrap();
        }

        let stranger = Caller::generate();
        let denied = handle
            .submit(stranger, LoanInstruction::TransferAdmin { new_admin: WalletKey([0; 32]) })
            .await;
        assert!(matches!(denied, Err(SubmitError::Rejected(LedgerError::NotAdmin))));

        let snapshot = handle.snapshot().await;
        assert_eq!(snapshot.height, 8);
        assert_eq!(snapshot.state.blacklist.len(), 8);

        drop(handle);
        let app = task.await.unwrap();
        assert_eq!(app.height(), 8);
    }
}
