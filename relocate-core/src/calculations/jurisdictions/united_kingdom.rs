//! United Kingdom: income tax with personal allowance withdrawal, employee
//! National Insurance and the NHS Pension Scheme.
//!
//! The personal allowance is the upper bound of the zero-rate `Income Tax` row.
//! Above £100,000 it is withdrawn at £1 for every £2, so it is gone entirely at
//! `100,000 + 2 × allowance`. The withdrawal moves every bracket bound below
//! that point down by the same amount; bounds at or above it stay put.
//!
//! NHS Pension rows are tiers rather than brackets: the one tier containing the
//! gross salary sets a single rate applied to the whole salary.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::{BreakdownBuilder, TaxJurisdiction, TaxOptions, sanitize_gross};
use crate::calculations::common::{marginal_tax, rules_of};
use crate::models::{Country, TaxAdvisory, TaxBreakdown, TaxRule, TaxType};

const WITHDRAWAL_THRESHOLD: Decimal = dec!(100000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitedKingdom;

impl TaxJurisdiction for UnitedKingdom {
    fn country(&self) -> Country {
        Country::UnitedKingdom
    }

    fn compute(
        &self,
        gross: Decimal,
        rules: &[TaxRule],
        options: &TaxOptions,
    ) -> TaxBreakdown {
        let gross = sanitize_gross(Country::UnitedKingdom, gross);

        let brackets = rules_of(rules, TaxType::IncomeTax, None);
        let allowance = brackets
            .iter()
            .find(|b| b.rate_percent.is_zero())
            .and_then(|b| b.bracket_upper)
            .unwrap_or(Decimal::ZERO);
        let reduction = personal_allowance_reduction(gross, allowance);
        let exhausted_at = WITHDRAWAL_THRESHOLD + allowance * Decimal::TWO;

        let shifted: Vec<TaxRule> = brackets
            .iter()
            .map(|b| shift_bracket(b, reduction, exhausted_at))
            .collect();
        let shifted: Vec<&TaxRule> = shifted.iter().collect();
        let income_tax = marginal_tax(gross, &shifted);

        let ni_bands = rules_of(rules, TaxType::NationalInsurance, None);
        if ni_bands.is_empty() {
            debug!("no National Insurance rows; contribution is zero");
        }
        let national_insurance = marginal_tax(gross, &ni_bands);

        let mut builder = BreakdownBuilder::new(Country::UnitedKingdom, gross)
            .deduct(TaxType::IncomeTax, income_tax)
            .deduct(TaxType::NationalInsurance, national_insurance);

        if options.include_retirement {
            builder = builder.deduct(TaxType::NhsPension, nhs_pension(gross, rules));
        } else {
            builder =
                builder.advise(TaxAdvisory::RetirementContributionExcluded(TaxType::NhsPension));
        }

        if gross > WITHDRAWAL_THRESHOLD && gross < exhausted_at {
            builder = builder.advise(TaxAdvisory::AllowanceWithdrawal {
                personal_allowance: allowance - reduction,
                reduction,
            });
        }

        builder.build()
    }
}

/// Amount by which the personal allowance is reduced at `gross`: half the
/// income above £100,000, never more than the allowance itself.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use relocate_core::calculations::jurisdictions::personal_allowance_reduction;
///
/// assert_eq!(personal_allowance_reduction(dec!(90000), dec!(12570)), dec!(0));
/// assert_eq!(personal_allowance_reduction(dec!(110000), dec!(12570)), dec!(5000));
/// assert_eq!(personal_allowance_reduction(dec!(200000), dec!(12570)), dec!(12570));
/// ```
pub fn personal_allowance_reduction(
    gross: Decimal,
    allowance: Decimal,
) -> Decimal {
    let half_excess = ((gross - WITHDRAWAL_THRESHOLD) / Decimal::TWO).max(Decimal::ZERO);
    half_excess.min(allowance)
}

fn shift_bracket(
    bracket: &TaxRule,
    reduction: Decimal,
    exhausted_at: Decimal,
) -> TaxRule {
    let shift = |bound: Decimal| {
        if bound < exhausted_at {
            (bound - reduction).max(Decimal::ZERO)
        } else {
            bound
        }
    };
    TaxRule {
        bracket_lower: shift(bracket.bracket_lower),
        bracket_upper: bracket.bracket_upper.map(shift),
        ..bracket.clone()
    }
}

/// Employee NHS Pension contribution: the rate of the tier containing `gross`
/// applied to the whole of `gross`.
fn nhs_pension(
    gross: Decimal,
    rules: &[TaxRule],
) -> Decimal {
    match rules_of(rules, TaxType::NhsPension, None)
        .into_iter()
        .find(|tier| tier.contains(gross))
    {
        Some(tier) => tier.rate() * gross,
        None => {
            debug!(%gross, "no NHS Pension tier contains gross; contribution is zero");
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn row(
        tax_type: TaxType,
        lower: Decimal,
        upper: Option<Decimal>,
        rate: Decimal,
    ) -> TaxRule {
        TaxRule {
            country: Country::UnitedKingdom,
            region: None,
            tax_type,
            bracket_lower: lower,
            bracket_upper: upper,
            rate_percent: rate,
            is_estimate: false,
        }
    }

    fn rules_2024_25() -> Vec<TaxRule> {
        use TaxType::*;
        vec![
            row(IncomeTax, dec!(0), Some(dec!(12570)), dec!(0)),
            row(IncomeTax, dec!(12570), Some(dec!(50270)), dec!(20)),
            row(IncomeTax, dec!(50270), Some(dec!(125140)), dec!(40)),
            row(IncomeTax, dec!(125140), None, dec!(45)),
            row(NationalInsurance, dec!(0), Some(dec!(12570)), dec!(0)),
            row(NationalInsurance, dec!(12570), Some(dec!(50270)), dec!(8)),
            row(NationalInsurance, dec!(50270), None, dec!(2)),
            row(NhsPension, dec!(0), Some(dec!(13259)), dec!(5.2)),
            row(NhsPension, dec!(13259), Some(dec!(27288)), dec!(6.5)),
            row(NhsPension, dec!(27288), Some(dec!(33247)), dec!(8.3)),
            row(NhsPension, dec!(33247), Some(dec!(49913)), dec!(9.8)),
            row(NhsPension, dec!(49913), Some(dec!(63994)), dec!(10.7)),
            row(NhsPension, dec!(63994), None, dec!(12.5)),
        ]
    }

    #[test]
    fn compute_60k_with_pension() {
        let breakdown =
            UnitedKingdom.compute(dec!(60000), &rules_2024_25(), &TaxOptions::default());

        // 37700 × 20% + 9730 × 40%
        assert_eq!(breakdown.deduction(TaxType::IncomeTax), dec!(11432));
        // 37700 × 8% + 9730 × 2%
        assert_eq!(breakdown.deduction(TaxType::NationalInsurance), dec!(3211));
        // 10.7% tier on the whole salary
        assert_eq!(breakdown.deduction(TaxType::NhsPension), dec!(6420));
        assert_eq!(breakdown.total_deductions, dec!(21063));
        assert_eq!(breakdown.net_annual, dec!(38937));
        assert_eq!(breakdown.net_monthly, dec!(3245));
        assert_eq!(breakdown.effective_tax_rate, dec!(35.1));
        assert!(!breakdown.in_allowance_withdrawal_zone());
    }

    #[test]
    fn nhs_pension_tier_boundary_is_half_open() {
        let rules = rules_2024_25();

        assert_eq!(nhs_pension(dec!(49912), &rules), dec!(4891.376));
        assert_eq!(nhs_pension(dec!(49913), &rules), dec!(5340.691));
    }

    #[test]
    fn retirement_toggle_removes_pension_line() {
        let options = TaxOptions::default().without_retirement();

        let breakdown = UnitedKingdom.compute(dec!(60000), &rules_2024_25(), &options);

        assert_eq!(breakdown.deduction(TaxType::NhsPension), dec!(0));
        assert_eq!(breakdown.total_deductions, dec!(14643));
        assert_eq!(
            breakdown.advisories,
            vec![TaxAdvisory::RetirementContributionExcluded(TaxType::NhsPension)]
        );
    }

    #[test]
    fn allowance_is_withdrawn_above_100k() {
        let options = TaxOptions::default().without_retirement();

        let breakdown = UnitedKingdom.compute(dec!(110000), &rules_2024_25(), &options);

        // Allowance 7570: 37700 × 20% + (110000 - 45270) × 40%
        assert_eq!(breakdown.deduction(TaxType::IncomeTax), dec!(33432));
        assert!(breakdown.in_allowance_withdrawal_zone());
        assert!(breakdown.advisories.contains(&TaxAdvisory::AllowanceWithdrawal {
            personal_allowance: dec!(7570),
            reduction: dec!(5000),
        }));
    }

    #[test]
    fn allowance_fully_withdrawn_above_exhaustion_point() {
        let breakdown =
            UnitedKingdom.compute(dec!(150000), &rules_2024_25(), &TaxOptions::default());

        // 37700 × 20% + 87440 × 40% + 24860 × 45%
        assert_eq!(breakdown.deduction(TaxType::IncomeTax), dec!(53703));
        assert!(!breakdown.in_allowance_withdrawal_zone());
    }

    #[test]
    fn withdrawal_advisory_bounds_are_exclusive() {
        let rules = rules_2024_25();
        let options = TaxOptions::default();

        let in_zone = |gross| {
            UnitedKingdom
                .compute(gross, &rules, &options)
                .in_allowance_withdrawal_zone()
        };

        assert!(!in_zone(dec!(100000)));
        assert!(in_zone(dec!(100001)));
        assert!(!in_zone(dec!(125140)));
    }

    #[test]
    fn income_tax_is_continuous_across_withdrawal_range() {
        let rules = rules_2024_25();
        let options = TaxOptions::default().without_retirement();
        let tax_at = |gross| {
            UnitedKingdom
                .compute(gross, &rules, &options)
                .deduction(TaxType::IncomeTax)
        };

        // 60% effective marginal rate inside the range.
        assert_eq!(tax_at(dec!(102000)) - tax_at(dec!(100000)), dec!(1200));
        assert_eq!(tax_at(dec!(125140)), dec!(42516));
    }
}
