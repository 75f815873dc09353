use anyhow::{bail, Result};
use clap::Parser;
use rand::Rng;
use std::time::Instant;
use veil_crypto::attestation::issue_attestation;
use veil_crypto::signatures::{generate_keypair, SigningKey};
use veil_crypto::{Blake3Deriver, Caller};
use veil_execution::migration::MigrationStatus;
use veil_execution::{execute_atomic, user_loans, Outcome};
use veil_types::instruction::LoanInstruction;
use veil_types::keys::{Pin, ProviderId};
use veil_types::loan::{FinancialProfile, LoanStatus};
use veil_types::state::LedgerState;

const PROVIDER: ProviderId = 1;

#[derive(Parser, Debug)]
#[command(author, version, about = "Veil ledger simulation runner")]
struct Args {
    /// Number of borrower wallets.
    #[arg(long, default_value_t = 200)]
    wallets: usize,
    /// Loan requests issued per wallet before its PIN change.
    #[arg(long, default_value_t = 12)]
    loans_per_wallet: usize,
    /// Upper bound (inclusive) on a requested amount.
    #[arg(long, default_value_t = 15_000)]
    max_amount: u64,
}

struct SimWallet {
    caller: Caller,
    pin: Pin,
    profile: FinancialProfile,
}

struct Sim {
    state: LedgerState,
    deriver: Blake3Deriver,
    provider: SigningKey,
    height: u64,
}

impl Sim {
    fn exec(&mut self, caller: &Caller, ix: &LoanInstruction) -> Result<Outcome, veil_types::LedgerError> {
        self.height += 1;
        execute_atomic(ix, caller, &mut self.state, &self.deriver, self.height)
    }
}

fn build_wallets(wallet_count: usize, rng: &mut impl Rng) -> Vec<SimWallet> {
    (0..wallet_count)
        .map(|_| SimWallet {
            caller: Caller::generate(),
            pin: rng.gen_range(0..Pin::MAX),
            profile: FinancialProfile {
                credit_score: rng.gen_range(500..=800),
                monthly_income: rng.gen_range(500..=4000),
                months_as_customer: rng.gen_range(0..=60),
            },
        })
        .collect()
}

fn setup(admin: &Caller) -> Result<Sim> {
    let mut sim = Sim {
        state: LedgerState::new(admin.wallet()),
        deriver: Blake3Deriver::default(),
        provider: generate_keypair(),
        height: 0,
    };
    let register = LoanInstruction::RegisterProvider {
        provider_id: PROVIDER,
        public_key: sim.provider.verifying_key().to_bytes(),
    };
    sim.exec(admin, &register)?;
    Ok(sim)
}

fn run_simulation(args: &Args) -> Result<()> {
    let mut rng = rand::thread_rng();
    let admin = Caller::generate();
    let mut sim = setup(&admin)?;
    let wallets = build_wallets(args.wallets, &mut rng);

    let start = Instant::now();
    let mut calls = 0u64;
    let mut counter_offers = 0u64;
    let mut rejected_profiles = 0u64;

    for wallet in &wallets {
        for _ in 0..args.loans_per_wallet {
            let attestation = issue_attestation(&sim.provider, PROVIDER, &wallet.caller.wallet(), wallet.profile);
            let ix = LoanInstruction::RequestLoan {
                amount: rng.gen_range(1..=args.max_amount),
                pin: wallet.pin,
                attestation,
            };
            calls += 1;
            if let Outcome::LoanCreated { loan_id, application } = sim.exec(&wallet.caller, &ix)? {
                match application.status {
                    LoanStatus::Proposed => {
                        counter_offers += 1;
                        let respond = LoanInstruction::RespondToLoan {
                            loan_id,
                            pin: wallet.pin,
                            accept: rng.gen_bool(0.5),
                        };
                        calls += 1;
                        sim.exec(&wallet.caller, &respond)?;
                    }
                    LoanStatus::Rejected => rejected_profiles += 1,
                    _ => {}
                }
            }
        }
    }

    let loans_before = sim.state.ledger.total_loans();
    let mut migration_calls = 0u64;
    for wallet in &wallets {
        let new_pin = wallet.pin.wrapping_add(1);
        let change = LoanInstruction::ChangePin {
            old_pin: wallet.pin,
            new_pin,
        };
        loop {
            calls += 1;
            migration_calls += 1;
            match sim.exec(&wallet.caller, &change)? {
                Outcome::PinMigration(report) if report.status == MigrationStatus::InProgress => continue,
                _ => break,
            }
        }

        let migrated = user_loans(&sim.state, &sim.deriver, &wallet.caller, new_pin).map_or(0, |l| l.len());
        if migrated != args.loans_per_wallet {
            bail!("wallet {} holds {} loans after migration", wallet.caller.wallet(), migrated);
        }
        if user_loans(&sim.state, &sim.deriver, &wallet.caller, wallet.pin).is_some() {
            bail!("wallet {} still has loans under its old pin", wallet.caller.wallet());
        }
    }

    if sim.state.ledger.total_loans() != loans_before {
        bail!("loan count changed during migration");
    }
    if !sim.state.pin_migrations.is_empty() {
        bail!("{} migrations left unfinished", sim.state.pin_migrations.len());
    }

    let elapsed = start.elapsed();
    let cps = if elapsed.as_secs_f64() > 0.0 {
        calls as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    println!("=== Veil Simulation ===");
    println!("Wallets: {}", wallets.len());
    println!("Loans issued: {}", loans_before);
    println!("Counter-offers: {}", counter_offers);
    println!("Rejected profiles: {}", rejected_profiles);
    println!("changePin calls: {}", migration_calls);
    println!("Calls executed: {}", calls);
    println!("Elapsed: {:.2?}", elapsed);
    println!("Calls/s: {:.2}", cps);
    println!("State root: {}", hex::encode(sim.state.root_hash()));

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    run_simulation(&args)
}
