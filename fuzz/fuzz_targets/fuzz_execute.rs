#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use veil_crypto::attestation::issue_attestation;
use veil_crypto::signatures::SigningKey;
use veil_crypto::{Blake3Deriver, Caller, SecretKey};
use veil_execution::{execute_atomic, Outcome};
use veil_types::instruction::LoanInstruction;
use veil_types::loan::FinancialProfile;
use veil_types::state::LedgerState;

const CAST: usize = 3;

#[derive(Arbitrary, Debug)]
enum Op {
    Request { who: u8, amount: u16, pin: u8, score: u16, income: u16, tenure: u8, forge: bool },
    Respond { who: u8, loan_id: u8, pin: u8, accept: bool },
    ChangePin { who: u8, old_pin: u8, new_pin: u8 },
    Blacklist { who: u8, target: u8, remove: bool },
    TransferAdmin { who: u8, target: u8 },
}

fuzz_target!(|ops: Vec<Op>| {
    let cast: Vec<Caller> = (0..CAST)
        .map(|i| Caller::from_secret(SecretKey::from_bytes([i as u8 + 1; 32])))
        .collect();
    let provider = SigningKey::from_bytes(&[0x55; 32]);
    let deriver = Blake3Deriver::default();

    let mut state = LedgerState::new(cast[0].wallet());
    state.providers.insert(1, provider.verifying_key().to_bytes());

    let mut created = 0usize;
    for (height, op) in ops.iter().take(256).enumerate() {
        let (who, ix) = match op {
            Op::Request { who, amount, pin, score, income, tenure, forge } => {
                let caller = &cast[*who as usize % CAST];
                let profile = FinancialProfile {
                    credit_score: *score % 900,
                    monthly_income: *income as u64,
                    months_as_customer: *tenure as u16,
                };
                let mut attestation = issue_attestation(&provider, 1, &caller.wallet(), profile);
                if *forge {
                    attestation.profile.credit_score = attestation.profile.credit_score.wrapping_add(1);
                }
                (
                    *who,
                    LoanInstruction::RequestLoan { amount: *amount as u64, pin: (*pin % 4) as u16, attestation },
                )
            }
            Op::Respond { who, loan_id, pin, accept } => (
                *who,
                LoanInstruction::RespondToLoan {
                    loan_id: (*loan_id % 16) as u64,
                    pin: (*pin % 4) as u16,
                    accept: *accept,
                },
            ),
            Op::ChangePin { who, old_pin, new_pin } => (
                *who,
                LoanInstruction::ChangePin {
                    old_pin: (*old_pin % 4) as u16,
                    new_pin: (*new_pin % 4) as u16,
                },
            ),
            Op::Blacklist { who, target, remove } => {
                let wallet = cast[*target as usize % CAST].wallet();
                let ix = if *remove {
                    LoanInstruction::RemoveBlacklistUser { wallet }
                } else {
                    LoanInstruction::BlacklistUser { wallet }
                };
                (*who, ix)
            }
            Op::TransferAdmin { who, target } => (
                *who,
                LoanInstruction::TransferAdmin {
                    new_admin: cast[*target as usize % CAST].wallet(),
                },
            ),
        };

        let caller = &cast[who as usize % CAST];
        let before = state.clone();
        match execute_atomic(&ix, caller, &mut state, &deriver, height as u64) {
            Ok(Outcome::LoanCreated { .. }) => created += 1,
            Ok(_) => {}
            Err(_) => assert_eq!(state, before, "rejected call mutated state"),
        }

        // Migrations move loans, they never create or lose them.
        assert_eq!(state.ledger.total_loans(), created);
        for source in state.pin_migrations.keys() {
            assert!(state.ledger.size(source) > 0, "progress pointer without loans");
        }
        for (key, loans) in state.ledger.users() {
            assert!(!loans.is_empty() || state.pin_migrations.contains_key(key));
        }
    }
});
