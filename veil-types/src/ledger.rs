use crate::error::LedgerError;
use crate::keys::{LoanId, UserKey};
use crate::loan::{LoanApplication, LoanStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Loans stored under a single pseudonym.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UserLoans {
    loans: BTreeMap<LoanId, LoanApplication>,
    /// Highest id ever assigned under this key. Every live id is in `1..=high_water`.
    high_water: LoanId,
}

impl UserLoans {
    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    pub fn high_water(&self) -> LoanId {
        self.high_water
    }

    pub fn get(&self, id: LoanId) -> Option<&LoanApplication> {
        self.loans.get(&id)
    }

    pub fn contains(&self, id: LoanId) -> bool {
        self.loans.contains_key(&id)
    }

    /// Loans in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (LoanId, &LoanApplication)> {
        self.loans.iter().map(|(id, app)| (*id, app))
    }

    fn append(&mut self, application: LoanApplication) -> LoanId {
        let id = self.high_water + 1;
        self.high_water = id;
        self.loans.insert(id, application);
        id
    }
}

/// Two-level loan map: pseudonym, then loan id.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanLedger {
    users: BTreeMap<UserKey, UserLoans>,
}

impl LoanLedger {
    /// Appends a new loan under `key` and returns its id (1 for a fresh key).
    pub fn create(&mut self, key: UserKey, application: LoanApplication) -> LoanId {
        self.users.entry(key).or_default().append(application)
    }

    /// Appends a loan moved from another pseudonym. The loan gets the
    /// destination's next id; its original id is not kept.
    pub fn insert_renumbered(&mut self, key: UserKey, application: LoanApplication) -> LoanId {
        self.users.entry(key).or_default().append(application)
    }

    pub fn get(&self, key: &UserKey, id: LoanId) -> Result<&LoanApplication, LedgerError> {
        let loans = self.users.get(key).ok_or(LedgerError::NoLoans)?;
        loans.get(id).ok_or(LedgerError::LoanNotFound)
    }

    pub fn set_status(
        &mut self,
        key: &UserKey,
        id: LoanId,
        status: LoanStatus,
        authorized_amount: u64,
    ) -> Result<(), LedgerError> {
        let loans = self.users.get_mut(key).ok_or(LedgerError::NoLoans)?;
        let loan = loans.loans.get_mut(&id).ok_or(LedgerError::LoanNotFound)?;
        loan.status = status;
        loan.authorized_amount = authorized_amount;
        Ok(())
    }

    pub fn size(&self, key: &UserKey) -> usize {
        self.users.get(key).map_or(0, UserLoans::len)
    }

    pub fn contains_user(&self, key: &UserKey) -> bool {
        self.users.contains_key(key)
    }

    pub fn loans(&self, key: &UserKey) -> Option<&UserLoans> {
        self.users.get(key)
    }

    /// Removes a single loan slot, leaving the per-user map (possibly empty) in place.
    pub fn take(&mut self, key: &UserKey, id: LoanId) -> Option<LoanApplication> {
        self.users.get_mut(key)?.loans.remove(&id)
    }

    /// Drops the whole per-user map.
    pub fn remove(&mut self, key: &UserKey) -> Option<UserLoans> {
        self.users.remove(key)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn total_loans(&self) -> usize {
        self.users.values().map(UserLoans::len).sum()
    }

    pub fn users(&self) -> impl Iterator<Item = (&UserKey, &UserLoans)> {
        self.users.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved(amount: u64) -> LoanApplication {
        LoanApplication::new(LoanStatus::Approved, amount)
    }

    #[test]
    fn ids_start_at_one_and_increase_per_key() {
        let mut ledger = LoanLedger::default();
        let a = UserKey([1u8; 32]);
        let b = UserKey([2u8; 32]);

        assert_eq!(ledger.create(a, approved(10)), 1);
        assert_eq!(ledger.create(a, approved(20)), 2);
        assert_eq!(ledger.create(b, approved(30)), 1);
        assert_eq!(ledger.size(&a), 2);
        assert_eq!(ledger.size(&b), 1);
        assert_eq!(ledger.get(&a, 2).unwrap().authorized_amount, 20);
    }

    #[test]
    fn lookup_distinguishes_missing_user_from_missing_loan() {
        let mut ledger = LoanLedger::default();
        let a = UserKey([1u8; 32]);
        assert_eq!(ledger.get(&a, 1), Err(LedgerError::NoLoans));

        ledger.create(a, approved(10));
        assert_eq!(ledger.get(&a, 9), Err(LedgerError::LoanNotFound));
        assert_eq!(
            ledger.set_status(&a, 9, LoanStatus::Approved, 1),
            Err(LedgerError::LoanNotFound)
        );
    }

    #[test]
    fn ids_are_not_reused_after_take() {
        let mut ledger = LoanLedger::default();
        let a = UserKey([1u8; 32]);
        ledger.create(a, approved(1));
        ledger.create(a, approved(2));
        assert!(ledger.take(&a, 2).is_some());

        assert_eq!(ledger.create(a, approved(3)), 3);
        assert_eq!(ledger.loans(&a).unwrap().high_water(), 3);
        let ids: Vec<LoanId> = ledger.loans(&a).unwrap().iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn take_leaves_empty_map_until_removed() {
        let mut ledger = LoanLedger::default();
        let a = UserKey([1u8; 32]);
        ledger.create(a, approved(1));
        ledger.take(&a, 1);

        assert!(ledger.contains_user(&a));
        assert_eq!(ledger.size(&a), 0);
        assert!(ledger.remove(&a).is_some());
        assert!(!ledger.contains_user(&a));
    }
}
