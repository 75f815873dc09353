use tracing::debug;
use veil_crypto::attestation::verify_attestation_signature;
use veil_crypto::signatures::SIGNATURE_LEN;
use veil_types::error::LedgerError;
use veil_types::keys::WalletKey;
use veil_types::loan::{Attestation, FinancialProfile};
use veil_types::state::LedgerState;

/// Returns the attested profile only if a registered provider signed it for `subject`.
pub fn verify_attestation(
    state: &LedgerState,
    subject: &WalletKey,
    attestation: &Attestation,
) -> Result<FinancialProfile, LedgerError> {
    let provider_key = state
        .provider(attestation.provider_id)
        .ok_or(LedgerError::UnknownProvider)?;

    if attestation.signature.len() != SIGNATURE_LEN {
        return Err(LedgerError::MalformedAttestation);
    }

    verify_attestation_signature(provider_key, subject, attestation).map_err(|e| {
        debug!(provider = attestation.provider_id, "attestation rejected: {}", e);
        LedgerError::InvalidAttestation
    })?;

    Ok(attestation.profile)
}
