//! Bounded-step PIN migration.
//!
//! Each call probes exactly [`MIGRATION_BATCH`] consecutive loan id slots of
//! the source pseudonym, moves every loan it finds to the destination, and
//! advances the persisted cursor by the full batch. Slots are probed in
//! strictly increasing order across calls, so no loan is moved twice or
//! skipped. The source entry and its cursor are dropped together once the
//! source map is empty.

use serde::{Deserialize, Serialize};
use tracing::debug;
use veil_types::error::LedgerError;
use veil_types::keys::{LoanId, UserKey};
use veil_types::state::{LedgerState, MigrationProgress};

pub const MIGRATION_BATCH: LoanId = 5;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStatus {
    /// The source pseudonym had no loans; nothing was written.
    Idle,
    InProgress,
    Complete,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub status: MigrationStatus,
    /// Loans moved by this call.
    pub moved: usize,
    /// Cursor after this call (0 when idle).
    pub last_probed: LoanId,
    /// Loans still under the source pseudonym.
    pub remaining: usize,
}

/// Rejects migrations that would interleave with another in-flight migration.
pub fn check_migration(
    state: &LedgerState,
    source: &UserKey,
    destination: &UserKey,
) -> Result<(), LedgerError> {
    if let Some(progress) = state.migration(source) {
        if progress.destination != *destination {
            return Err(LedgerError::MigrationTargetMismatch);
        }
    }
    if state.migration(destination).is_some() {
        return Err(LedgerError::DestinationMigrating);
    }
    Ok(())
}

/// Runs one batch. Callers must run [`check_migration`] first.
pub fn migrate_batch(state: &mut LedgerState, source: UserKey, destination: UserKey) -> MigrationReport {
    let progress = state.pin_migrations.get(&source).copied();
    if progress.is_none() && !state.ledger.contains_user(&source) {
        return MigrationReport {
            status: MigrationStatus::Idle,
            moved: 0,
            last_probed: 0,
            remaining: 0,
        };
    }

    let start = progress.map_or(0, |p| p.last_probed) + 1;
    let mut moved = 0usize;
    for offset in 0..MIGRATION_BATCH {
        if let Some(application) = state.ledger.take(&source, start + offset) {
            state.ledger.insert_renumbered(destination, application);
            moved += 1;
        }
    }
    let last_probed = start + MIGRATION_BATCH - 1;
    let remaining = state.ledger.size(&source);

    debug!(
        source = %source.short(),
        destination = %destination.short(),
        last_probed,
        moved,
        remaining,
        "migration batch"
    );

    if remaining == 0 {
        state.pin_migrations.remove(&source);
        state.ledger.remove(&source);
        return MigrationReport {
            status: MigrationStatus::Complete,
            moved,
            last_probed,
            remaining,
        };
    }

    state.pin_migrations.insert(
        source,
        MigrationProgress {
            last_probed,
            destination,
        },
    );
    MigrationReport {
        status: MigrationStatus::InProgress,
        moved,
        last_probed,
        remaining,
    }
}
