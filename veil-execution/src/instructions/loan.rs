use crate::attestation::verify_attestation;
use crate::guards::{require_no_migration, require_not_blacklisted};
use crate::migration::{check_migration, migrate_batch, MigrationReport};
use crate::tier::decide;
use crate::ExecutionContext;
use veil_crypto::Caller;
use veil_types::error::LedgerError;
use veil_types::keys::{LoanId, Pin};
use veil_types::loan::{Attestation, LoanApplication, LoanStatus};

pub fn request_loan(
    ctx: &mut ExecutionContext,
    caller: &Caller,
    amount: u64,
    pin: Pin,
    attestation: &Attestation,
) -> Result<(LoanId, LoanApplication), LedgerError> {
    let wallet = caller.wallet();
    require_not_blacklisted(ctx.state, &wallet)?;
    let user_key = caller.user_key(ctx.deriver, pin);
    require_no_migration(ctx.state, &user_key)?;
    if amount == 0 {
        return Err(LedgerError::ZeroAmount);
    }

    let profile = verify_attestation(ctx.state, &wallet, attestation)?;
    let application = decide(&profile, amount);
    let loan_id = ctx.state.ledger.create(user_key, application);
    Ok((loan_id, application))
}

pub fn respond_to_loan(
    ctx: &mut ExecutionContext,
    caller: &Caller,
    loan_id: LoanId,
    pin: Pin,
    accept: bool,
) -> Result<LoanApplication, LedgerError> {
    require_not_blacklisted(ctx.state, &caller.wallet())?;

    let user_key = caller.user_key(ctx.deriver, pin);
    let loan = *ctx.state.ledger.get(&user_key, loan_id)?;
    if loan.is_terminal() {
        return Err(LedgerError::NotProposed);
    }

    let updated = if accept {
        LoanApplication::new(LoanStatus::Approved, loan.authorized_amount)
    } else {
        LoanApplication::new(LoanStatus::NotAccepted, 0)
    };
    ctx.state
        .ledger
        .set_status(&user_key, loan_id, updated.status, updated.authorized_amount)?;
    Ok(updated)
}

pub fn change_pin(
    ctx: &mut ExecutionContext,
    caller: &Caller,
    old_pin: Pin,
    new_pin: Pin,
) -> Result<MigrationReport, LedgerError> {
    require_not_blacklisted(ctx.state, &caller.wallet())?;
    if old_pin == new_pin {
        return Err(LedgerError::SamePin);
    }

    let source = caller.user_key(ctx.deriver, old_pin);
    let destination = caller.user_key(ctx.deriver, new_pin);
    check_migration(ctx.state, &source, &destination)?;
    Ok(migrate_batch(ctx.state, source, destination))
}
