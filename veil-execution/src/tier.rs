use veil_types::loan::{FinancialProfile, LoanApplication, LoanStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub min_credit_score: u16,
    pub min_monthly_income: u64,
    pub min_months_as_customer: u16,
    /// Largest amount approved outright.
    pub cap: u64,
}

impl Tier {
    fn admits(&self, profile: &FinancialProfile) -> bool {
        profile.credit_score >= self.min_credit_score
            && profile.monthly_income >= self.min_monthly_income
            && profile.months_as_customer >= self.min_months_as_customer
    }
}

/// Checked in order; the first admitting tier wins.
pub const TIERS: [Tier; 3] = [
    Tier {
        min_credit_score: 700,
        min_monthly_income: 2000,
        min_months_as_customer: 24,
        cap: 10_000,
    },
    Tier {
        min_credit_score: 600,
        min_monthly_income: 1500,
        min_months_as_customer: 0,
        cap: 7_000,
    },
    Tier {
        min_credit_score: 580,
        min_monthly_income: 0,
        min_months_as_customer: 0,
        cap: 3_000,
    },
];

/// Amounts within the cap are approved as asked; larger ones get a
/// counter-offer at the cap.
pub fn decide(profile: &FinancialProfile, requested_amount: u64) -> LoanApplication {
    match TIERS.iter().find(|t| t.admits(profile)) {
        None => LoanApplication::new(LoanStatus::Rejected, 0),
        Some(tier) if requested_amount <= tier.cap => {
            LoanApplication::new(LoanStatus::Approved, requested_amount)
        }
        Some(tier) => LoanApplication::new(LoanStatus::Proposed, tier.cap),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(credit_score: u16, monthly_income: u64, months_as_customer: u16) -> FinancialProfile {
        FinancialProfile {
            credit_score,
            monthly_income,
            months_as_customer,
        }
    }

    #[test]
    fn tier_one_boundary() {
        // A 10_000 request is approved only by the top tier.
        let approved = LoanApplication::new(LoanStatus::Approved, 10_000);
        let capped = LoanApplication::new(LoanStatus::Proposed, 7_000);
        assert_eq!(decide(&profile(700, 2000, 24), 10_000), approved);
        assert_eq!(decide(&profile(699, 2000, 24), 10_000), capped);
        assert_eq!(decide(&profile(700, 2000, 23), 10_000), capped);
        assert_eq!(decide(&profile(700, 1999, 24), 10_000), capped);
    }

    #[test]
    fn lower_tiers_and_rejection() {
        let third = LoanApplication::new(LoanStatus::Proposed, 3_000);
        assert_eq!(decide(&profile(600, 1499, 0), 5_000), third);
        assert_eq!(decide(&profile(580, 0, 0), 5_000), third);
        assert_eq!(
            decide(&profile(579, 100_000, 120), 5_000),
            LoanApplication::new(LoanStatus::Rejected, 0)
        );

        let rejected = decide(&profile(500, 5000, 60), 100);
        assert_eq!(rejected, LoanApplication::new(LoanStatus::Rejected, 0));
    }

    #[test]
    fn approves_within_cap_and_counter_offers_above() {
        let top = profile(750, 3000, 36);
        assert_eq!(decide(&top, 1500), LoanApplication::new(LoanStatus::Approved, 1500));
        assert_eq!(decide(&top, 10_000), LoanApplication::new(LoanStatus::Approved, 10_000));
        assert_eq!(decide(&top, 15_000), LoanApplication::new(LoanStatus::Proposed, 10_000));

        let mid = profile(650, 1600, 2);
        assert_eq!(decide(&mid, 7_001), LoanApplication::new(LoanStatus::Proposed, 7_000));

        let low = profile(590, 100, 0);
        assert_eq!(decide(&low, 2_999), LoanApplication::new(LoanStatus::Approved, 2_999));
        assert_eq!(decide(&low, 4_000), LoanApplication::new(LoanStatus::Proposed, 3_000));
    }

    #[test]
    fn decision_is_pure() {
        let p = profile(640, 1800, 10);
        for amount in [1, 6_999, 7_000, 7_001, u64::MAX] {
            assert_eq!(decide(&p, amount), decide(&p, amount));
        }
    }
}
