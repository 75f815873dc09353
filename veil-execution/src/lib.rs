pub mod attestation;
pub mod guards;
pub mod instructions;
pub mod migration;
pub mod tier;


use instructions::{admin, loan};
use migration::MigrationReport;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use veil_crypto::{Caller, PseudonymDeriver};
use veil_types::error::LedgerError;
use veil_types::instruction::LoanInstruction;
use veil_types::keys::{LoanId, Pin};
use veil_types::ledger::UserLoans;
use veil_types::loan::LoanApplication;
use veil_types::state::{LedgerState, MigrationProgress};

pub struct ExecutionContext<'a> {
    pub state: &'a mut LedgerState,
    pub deriver: &'a dyn PseudonymDeriver,
    pub height: u64,
}

/// What a successful call did.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    LoanCreated { loan_id: LoanId, application: LoanApplication },
    LoanUpdated { loan_id: LoanId, application: LoanApplication },
    PinMigration(MigrationReport),
    Applied,
}

pub fn execute_instruction(
    ix: &LoanInstruction,
    caller: &Caller,
    ctx: &mut ExecutionContext,
) -> Result<Outcome, LedgerError> {
    let result = dispatch(ix, caller, ctx);
    match &result {
        Ok(outcome) => info!(
            height = ctx.height,
            caller = %caller.wallet().short(),
            "{} applied: {:?}",
            ix.name(),
            outcome
        ),
        Err(e) => warn!(
            height = ctx.height,
            caller = %caller.wallet().short(),
            "{} rejected: {}",
            ix.name(),
            e
        ),
    }
    result
}

fn dispatch(ix: &LoanInstruction, caller: &Caller, ctx: &mut ExecutionContext) -> Result<Outcome, LedgerError> {
    match ix {
        LoanInstruction::RequestLoan { amount, pin, attestation } => {
            let (loan_id, application) = loan::request_loan(ctx, caller, *amount, *pin, attestation)?;
            Ok(Outcome::LoanCreated { loan_id, application })
        }
        LoanInstruction::RespondToLoan { loan_id, pin, accept } => {
            let application = loan::respond_to_loan(ctx, caller, *loan_id, *pin, *accept)?;
            Ok(Outcome::LoanUpdated {
                loan_id: *loan_id,
                application,
            })
        }
        LoanInstruction::ChangePin { old_pin, new_pin } => {
            let report = loan::change_pin(ctx, caller, *old_pin, *new_pin)?;
            Ok(Outcome::PinMigration(report))
        }
        LoanInstruction::BlacklistUser { wallet } => {
            admin::blacklist_user(ctx, caller, *wallet)?;
            Ok(Outcome::Applied)
        }
        LoanInstruction::RemoveBlacklistUser { wallet } => {
            admin::remove_blacklist_user(ctx, caller, *wallet)?;
            Ok(Outcome::Applied)
        }
        LoanInstruction::TransferAdmin { new_admin } => {
            admin::transfer_admin(ctx, caller, *new_admin)?;
            Ok(Outcome::Applied)
        }
        LoanInstruction::RegisterProvider { provider_id, public_key } => {
            admin::register_provider(ctx, caller, *provider_id, *public_key)?;
            Ok(Outcome::Applied)
        }
        LoanInstruction::RemoveProvider { provider_id } => {
            admin::remove_provider(ctx, caller, *provider_id)?;
            Ok(Outcome::Applied)
        }
    }
}

/// Runs `ix` against a copy of `state` and returns the resulting state.
/// `state` itself is never written.
pub fn execute_on_copy(
    ix: &LoanInstruction,
    caller: &Caller,
    state: &LedgerState,
    deriver: &dyn PseudonymDeriver,
    height: u64,
) -> Result<(LedgerState, Outcome), LedgerError> {
    let mut next = state.clone();
    let outcome = {
        let mut ctx = ExecutionContext {
            state: &mut next,
            deriver,
            height,
        };
        execute_instruction(ix, caller, &mut ctx)?
    };
    Ok((next, outcome))
}

/// Like [`execute_on_copy`], but swaps the result into `state` on success.
pub fn execute_atomic(
    ix: &LoanInstruction,
    caller: &Caller,
    state: &mut LedgerState,
    deriver: &dyn PseudonymDeriver,
    height: u64,
) -> Result<Outcome, LedgerError> {
    let (next, outcome) = execute_on_copy(ix, caller, state, deriver, height)?;
    *state = next;
    Ok(outcome)
}

/// The caller's loans under `pin`, if any.
pub fn user_loans<'s>(
    state: &'s LedgerState,
    deriver: &dyn PseudonymDeriver,
    caller: &Caller,
    pin: Pin,
) -> Option<&'s UserLoans> {
    state.ledger.loans(&caller.user_key(deriver, pin))
}

pub fn pin_migration(
    state: &LedgerState,
    deriver: &dyn PseudonymDeriver,
    caller: &Caller,
    pin: Pin,
) -> Option<MigrationProgress> {
    state.migration(&caller.user_key(deriver, pin)).copied()
}
