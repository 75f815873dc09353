use crate::signatures::{sign, verify_signature, SigningKey};
use anyhow::Result;
use veil_types::keys::{ProviderId, ProviderPublicKey, WalletKey};
use veil_types::loan::{Attestation, FinancialProfile};

/// Issued by a provider for `subject`.
pub fn issue_attestation(
    provider_key: &SigningKey,
    provider_id: ProviderId,
    subject: &WalletKey,
    profile: FinancialProfile,
) -> Attestation {
    let message = Attestation::signing_bytes(subject, &profile);
    Attestation {
        profile,
        provider_id,
        signature: sign(provider_key, &message),
    }
}

pub fn verify_attestation_signature(
    provider_key: &ProviderPublicKey,
    subject: &WalletKey,
    attestation: &Attestation,
) -> Result<()> {
    let message = Attestation::signing_bytes(subject, &attestation.profile);
    verify_signature(provider_key, &message, &attestation.signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signatures::generate_keypair;

    fn profile() -> FinancialProfile {
        FinancialProfile {
            credit_score: 720,
            monthly_income: 2500,
            months_as_customer: 30,
        }
    }

    #[test]
    fn attestation_is_bound_to_subject_and_profile() {
        let provider = generate_keypair();
        let pk = provider.verifying_key().to_bytes();
        let alice = WalletKey([1u8; 32]);
        let bob = WalletKey([2u8; 32]);

        let att = issue_attestation(&provider, 1, &alice, profile());
        assert!(verify_attestation_signature(&pk, &alice, &att).is_ok());
        assert!(verify_attestation_signature(&pk, &bob, &att).is_err());

        let mut inflated = att.clone();
        inflated.profile.monthly_income = 9_000;
        assert!(verify_attestation_signature(&pk, &alice, &inflated).is_err());
    }
}
