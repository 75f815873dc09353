use veil_types::error::LedgerError;
use veil_types::keys::{UserKey, WalletKey};
use veil_types::state::LedgerState;

pub fn require_admin(state: &LedgerState, caller: &WalletKey) -> Result<(), LedgerError> {
    if !state.is_admin(caller) {
        return Err(LedgerError::NotAdmin);
    }
    Ok(())
}

pub fn require_not_blacklisted(state: &LedgerState, caller: &WalletKey) -> Result<(), LedgerError> {
    if state.is_blacklisted(caller) {
        return Err(LedgerError::Blacklisted);
    }
    Ok(())
}

/// New loans may not land under a pseudonym that is being drained.
pub fn require_no_migration(state: &LedgerState, user_key: &UserKey) -> Result<(), LedgerError> {
    if state.migration(user_key).is_some() {
        return Err(LedgerError::MigrationInProgress);
    }
    Ok(())
}
