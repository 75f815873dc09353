use crate::keys::{LoanId, ProviderId, ProviderPublicKey, UserKey, WalletKey};
use crate::ledger::LoanLedger;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Cursor of an in-flight PIN migration, keyed by the source pseudonym.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationProgress {
    /// Highest loan id slot already probed.
    pub last_probed: LoanId,
    pub destination: UserKey,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LedgerState {
    pub admin: WalletKey,
    pub blacklist: BTreeSet<WalletKey>,
    pub providers: BTreeMap<ProviderId, ProviderPublicKey>,
    pub ledger: LoanLedger,
    pub pin_migrations: BTreeMap<UserKey, MigrationProgress>,
}

impl LedgerState {
    pub fn new(admin: WalletKey) -> Self {
        Self {
            admin,
            blacklist: BTreeSet::new(),
            providers: BTreeMap::new(),
            ledger: LoanLedger::default(),
            pin_migrations: BTreeMap::new(),
        }
    }

    pub fn is_admin(&self, wallet: &WalletKey) -> bool {
        self.admin == *wallet
    }

    pub fn is_blacklisted(&self, wallet: &WalletKey) -> bool {
        self.blacklist.contains(wallet)
    }

    pub fn provider(&self, id: ProviderId) -> Option<&ProviderPublicKey> {
        self.providers.get(&id)
    }

    pub fn migration(&self, source: &UserKey) -> Option<&MigrationProgress> {
        self.pin_migrations.get(source)
    }

    /// BLAKE3 over the canonical encoding. All collections are ordered, so
    /// equal states always hash equal.
    pub fn root_hash(&self) -> [u8; 32] {
        let encoded = bincode::serialize(self).expect("ledger state serialization");
        *blake3::hash(&encoded).as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{LoanApplication, LoanStatus};

    #[test]
    fn root_hash_tracks_ledger_contents() {
        let mut a = LedgerState::new(WalletKey([9u8; 32]));
        let b = a.clone();
        assert_eq!(a.root_hash(), b.root_hash());

        a.ledger
            .create(UserKey([1u8; 32]), LoanApplication::new(LoanStatus::Approved, 5));
        assert_ne!(a.root_hash(), b.root_hash());
    }
}
