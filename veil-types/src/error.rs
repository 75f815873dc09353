use thiserror::Error;

/// Category of a rejected call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authorization,
    Blacklist,
    Validation,
    NotFound,
    State,
    Attestation,
}

/// Every way a ledger call can be rejected. A rejected call has no effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Caller is not the admin")]
    NotAdmin,
    #[error("Caller is blacklisted")]
    Blacklisted,

    #[error("Loan amount must be greater than zero")]
    ZeroAmount,
    #[error("New pin must differ from the old pin")]
    SamePin,
    #[error("Malformed attestation")]
    MalformedAttestation,

    #[error("Loan not found")]
    LoanNotFound,
    #[error("No loans for this pin")]
    NoLoans,

    #[error("Loan is not awaiting a response")]
    NotProposed,
    #[error("Pin migration in progress")]
    MigrationInProgress,
    #[error("Pin migration already targets a different pin")]
    MigrationTargetMismatch,
    #[error("Destination pin has a migration in progress")]
    DestinationMigrating,

    #[error("Unknown attestation provider")]
    UnknownProvider,
    #[error("Invalid attestation signature")]
    InvalidAttestation,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::NotAdmin => ErrorKind::Authorization,
            LedgerError::Blacklisted => ErrorKind::Blacklist,
            LedgerError::ZeroAmount | LedgerError::SamePin | LedgerError::MalformedAttestation => {
                ErrorKind::Validation
            }
            LedgerError::LoanNotFound | LedgerError::NoLoans => ErrorKind::NotFound,
            LedgerError::NotProposed
            | LedgerError::MigrationInProgress
            | LedgerError::MigrationTargetMismatch
            | LedgerError::DestinationMigrating => ErrorKind::State,
            LedgerError::UnknownProvider | LedgerError::InvalidAttestation => {
                ErrorKind::Attestation
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_stable() {
        assert_eq!(LedgerError::MigrationInProgress.to_string(), "Pin migration in progress");
        assert_eq!(LedgerError::UnknownProvider.to_string(), "Unknown attestation provider");
        assert_eq!(LedgerError::NotAdmin.kind(), ErrorKind::Authorization);
        assert_eq!(LedgerError::MalformedAttestation.kind(), ErrorKind::Validation);
        assert_eq!(LedgerError::DestinationMigrating.kind(), ErrorKind::State);
    }
}
