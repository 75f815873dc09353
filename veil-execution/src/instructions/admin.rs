use crate::guards::require_admin;
use crate::ExecutionContext;
use veil_crypto::Caller;
use veil_types::error::LedgerError;
use veil_types::keys::{ProviderId, ProviderPublicKey, WalletKey};

pub fn blacklist_user(ctx: &mut ExecutionContext, caller: &Caller, wallet: WalletKey) -> Result<(), LedgerError> {
    require_admin(ctx.state, &caller.wallet())?;
    ctx.state.blacklist.insert(wallet);
    Ok(())
}

pub fn remove_blacklist_user(
    ctx: &mut ExecutionContext,
    caller: &Caller,
    wallet: WalletKey,
) -> Result<(), LedgerError> {
    require_admin(ctx.state, &caller.wallet())?;
    ctx.state.blacklist.remove(&wallet);
    Ok(())
}

pub fn transfer_admin(ctx: &mut ExecutionContext, caller: &Caller, new_admin: WalletKey) -> Result<(), LedgerError> {
    require_admin(ctx.state, &caller.wallet())?;
    ctx.state.admin = new_admin;
    Ok(())
}

/// Overwrites an existing key for the same id.
pub fn register_provider(
    ctx: &mut ExecutionContext,
    caller: &Caller,
    provider_id: ProviderId,
    public_key: ProviderPublicKey,
) -> Result<(), LedgerError> {
    require_admin(ctx.state, &caller.wallet())?;
    ctx.state.providers.insert(provider_id, public_key);
    Ok(())
}

pub fn remove_provider(ctx: &mut ExecutionContext, caller: &Caller, provider_id: ProviderId) -> Result<(), LedgerError> {
    require_admin(ctx.state, &caller.wallet())?;
    ctx.state.providers.remove(&provider_id);
    Ok(())
}
