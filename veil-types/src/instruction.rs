use crate::keys::{LoanId, Pin, ProviderId, ProviderPublicKey, WalletKey};
use crate::loan::Attestation;
use serde::{Deserialize, Serialize};

/// Every call a client can submit to the ledger.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum LoanInstruction {
    // Borrower operations
    RequestLoan { amount: u64, pin: Pin, attestation: Attestation },
    RespondToLoan { loan_id: LoanId, pin: Pin, accept: bool },
    ChangePin { old_pin: Pin, new_pin: Pin },

    // Admin operations
    BlacklistUser { wallet: WalletKey },
    RemoveBlacklistUser { wallet: WalletKey },
    TransferAdmin { new_admin: WalletKey },
    RegisterProvider { provider_id: ProviderId, public_key: ProviderPublicKey },
    RemoveProvider { provider_id: ProviderId },
}

impl LoanInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            LoanInstruction::RequestLoan { .. } => "requestLoan",
            LoanInstruction::RespondToLoan { .. } => "respondToLoan",
            LoanInstruction::ChangePin { .. } => "changePin",
            LoanInstruction::BlacklistUser { .. } => "blacklistUser",
            LoanInstruction::RemoveBlacklistUser { .. } => "removeBlacklistUser",
            LoanInstruction::TransferAdmin { .. } => "transferAdmin",
            LoanInstruction::RegisterProvider { .. } => "registerProvider",
            LoanInstruction::RemoveProvider { .. } => "removeProvider",
        }
    }
}
