use crate::keys::{ProviderId, WalletKey};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Approved,
    Rejected,
    /// Counter-offer awaiting the borrower's decision.
    Proposed,
    NotAccepted,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanApplication {
    pub authorized_amount: u64,
    pub status: LoanStatus,
}

impl LoanApplication {
    pub fn new(status: LoanStatus, authorized_amount: u64) -> Self {
        Self {
            authorized_amount,
            status,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status != LoanStatus::Proposed
    }
}

/// Private financial data a provider vouches for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinancialProfile {
    pub credit_score: u16,
    pub monthly_income: u64,
    pub months_as_customer: u16,
}

/// A provider-signed statement of a wallet's financial profile.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Attestation {
    pub profile: FinancialProfile,
    pub provider_id: ProviderId,
    pub signature: Vec<u8>,
}

impl Attestation {
    const DOMAIN: &'static [u8] = b"veil/attestation/v1";

    /// Canonical bytes a provider signs: domain tag, subject wallet, profile.
    pub fn signing_bytes(subject: &WalletKey, profile: &FinancialProfile) -> Vec<u8> {
        #[derive(Serialize)]
        struct SigningAttestation<'a> {
            subject: &'a WalletKey,
            profile: &'a FinancialProfile,
        }

        let body = bincode::serialize(&SigningAttestation { subject, profile })
            .expect("attestation signing serialization");
        let mut out = Vec::with_capacity(Self::DOMAIN.len() + body.len());
        out.extend_from_slice(Self::DOMAIN);
        out.extend_from_slice(&body);
        out
    }
}
