use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Country, Currency, TaxType};

/// One computed deduction or contribution, in whole local currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionLine {
    pub kind: TaxType,
    pub amount: Decimal,
}

/// Notes attached to a breakdown for display next to the figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxAdvisory {
    /// Gross income sits where the personal allowance is being withdrawn,
    /// so the marginal rate is well above the headline bracket rate.
    AllowanceWithdrawal {
        personal_allowance: Decimal,
        reduction: Decimal,
    },
    /// Church tax is levied on registered members only and is not included.
    ChurchTaxExcluded,
    /// The optional retirement contribution was switched off by the caller.
    RetirementContributionExcluded(TaxType),
}

impl TaxAdvisory {
    pub fn message(&self) -> String {
        match self {
            Self::AllowanceWithdrawal {
                personal_allowance,
                reduction,
            } => format!(
                "Personal allowance reduced by {reduction} to {personal_allowance}: \
                 income in this range is taxed at an effective 60% marginal rate"
            ),
            Self::ChurchTaxExcluded => "Church tax (8-9% of income tax) applies to registered \
                 members of a church and is not included in these figures"
                .to_string(),
            Self::RetirementContributionExcluded(kind) => {
                format!("{kind} contribution excluded from deductions")
            }
        }
    }
}

/// Take-home pay breakdown for one gross salary in one country.
///
/// Every amount is rounded to whole currency units, `total_deductions` is the
/// sum of `deductions`, and `net_annual == gross_annual - total_deductions`.
/// Employer-paid contributions are reported for information only and are
/// never part of `total_deductions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub country: Country,
    pub currency: Currency,
    pub gross_annual: Decimal,
    pub deductions: Vec<DeductionLine>,
    pub employer_contributions: Vec<DeductionLine>,
    pub advisories: Vec<TaxAdvisory>,
    pub total_deductions: Decimal,
    pub net_annual: Decimal,
    pub net_monthly: Decimal,
    /// Percentage with one decimal place.
    pub effective_tax_rate: Decimal,
}

impl TaxBreakdown {
    /// Amount deducted for `kind`, or zero when the breakdown has no such line.
    pub fn deduction(
        &self,
        kind: TaxType,
    ) -> Decimal {
        self.deductions
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.amount)
            .sum()
    }

    /// Employer-paid amount for `kind`, or zero.
    pub fn employer_contribution(
        &self,
        kind: TaxType,
    ) -> Decimal {
        self.employer_contributions
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.amount)
            .sum()
    }

    /// Whether the gross falls in the personal allowance withdrawal range.
    pub fn in_allowance_withdrawal_zone(&self) -> bool {
        self.advisories
            .iter()
            .any(|a| matches!(a, TaxAdvisory::AllowanceWithdrawal { .. }))
    }
}
