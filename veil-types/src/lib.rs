pub mod error;
pub mod instruction;
pub mod keys;
pub mod ledger;
pub mod loan;
pub mod state;

pub use error::{ErrorKind, LedgerError};
pub use instruction::LoanInstruction;
pub use keys::{LoanId, Pin, ProviderId, ProviderPublicKey, UserKey, WalletKey};
pub use ledger::{LoanLedger, UserLoans};
pub use loan::{Attestation, FinancialProfile, LoanApplication, LoanStatus};
pub use state::{LedgerState, MigrationProgress};
