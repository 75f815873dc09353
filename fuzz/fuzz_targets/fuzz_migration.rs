#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use veil_execution::migration::{check_migration, migrate_batch, MigrationStatus, MIGRATION_BATCH};
use veil_types::keys::{UserKey, WalletKey};
use veil_types::loan::{LoanApplication, LoanStatus};
use veil_types::state::LedgerState;

#[derive(Arbitrary, Debug)]
struct MigrationInput {
    source_loans: u8,
    destination_loans: u8,
    /// Loans added under the destination between batches.
    interleaved: Vec<u8>,
}

fuzz_target!(|data: MigrationInput| {
    let source = UserKey([1u8; 32]);
    let destination = UserKey([2u8; 32]);
    let mut state = LedgerState::new(WalletKey([0u8; 32]));

    let n = data.source_loans as u64;
    for i in 0..n {
        state.ledger.create(source, LoanApplication::new(LoanStatus::Approved, i));
    }
    let mut expected = data.destination_loans as usize + n as usize;
    for i in 0..data.destination_loans {
        state.ledger.create(destination, LoanApplication::new(LoanStatus::Rejected, i as u64));
    }

    let mut calls = 0u64;
    let mut extra = data.interleaved.iter();
    loop {
        assert!(check_migration(&state, &source, &destination).is_ok());
        let report = migrate_batch(&mut state, source, destination);
        calls += 1;
        assert!(report.moved as u64 <= MIGRATION_BATCH);
        if report.status != MigrationStatus::InProgress {
            break;
        }
        assert_eq!(state.migration(&source).map(|p| p.last_probed), Some(calls * MIGRATION_BATCH));
        if let Some(k) = extra.next() {
            for _ in 0..(*k % 4) {
                state.ledger.create(destination, LoanApplication::new(LoanStatus::Approved, 0));
                expected += 1;
            }
        }
    }

    assert_eq!(calls, std::cmp::max(1, n.div_ceil(MIGRATION_BATCH)));
    assert_eq!(state.ledger.size(&destination), expected);
    assert!(!state.ledger.contains_user(&source));
    assert!(state.migration(&source).is_none());
});
