//! Germany: statutory income tax formula (§32a EStG, 2025), solidarity
//! surcharge and employee social insurance.
//!
//! Income tax is not a bracket table. The five zones below use closed-form
//! polynomials; the taxable amount is floored to whole euros before the zone
//! formula and the result is floored again.
//!
//! | Zone | Floored income `x`      | Tax |
//! |------|-------------------------|-----|
//! | 1    | `x <= 12_096`           | 0 |
//! | 2    | `x <= 17_443`           | `(932.30·y + 1_400)·y`, `y = (x - 12_096) / 10_000` |
//! | 3    | `x <= 68_480`           | `(176.64·z + 2_397)·z + 1_015.13`, `z = (x - 17_443) / 10_000` |
//! | 4    | `x <= 277_825`          | `0.42·x - 10_911.92` |
//! | 5    | above                   | `0.45·x - 19_246.67` |
//!
//! Health, pension, unemployment and long-term care insurance are each a flat
//! employee rate up to their contribution ceiling, read from the rule rows.
//! Church tax depends on membership and is never deducted.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::{BreakdownBuilder, TaxJurisdiction, TaxOptions, sanitize_gross};
use crate::calculations::common::{capped_flat, first_rule};
use crate::models::{Country, TaxAdvisory, TaxBreakdown, TaxRule, TaxType};

const BASIC_ALLOWANCE: Decimal = dec!(12096);
const ZONE_2_END: Decimal = dec!(17443);
const ZONE_3_END: Decimal = dec!(68480);
const ZONE_4_END: Decimal = dec!(277825);

const SOLIDARITY_EXEMPTION: Decimal = dec!(19950);
const SOLIDARITY_RATE: Decimal = dec!(0.055);
const SOLIDARITY_TAPER_RATE: Decimal = dec!(0.119);

const SOCIAL_INSURANCE: [TaxType; 4] = [
    TaxType::HealthInsurance,
    TaxType::PensionInsurance,
    TaxType::UnemploymentInsurance,
    TaxType::LongTermCareInsurance,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Germany;

impl TaxJurisdiction for Germany {
    fn country(&self) -> Country {
        Country::Germany
    }

    fn compute(
        &self,
        gross: Decimal,
        rules: &[TaxRule],
        _options: &TaxOptions,
    ) -> TaxBreakdown {
        let gross = sanitize_gross(Country::Germany, gross);

        let income_tax = income_tax_2025(gross);
        let solidarity = solidarity_surcharge(income_tax);

        let mut builder = BreakdownBuilder::new(Country::Germany, gross)
            .deduct(TaxType::IncomeTax, income_tax)
            .deduct(TaxType::SolidaritySurcharge, solidarity);

        for kind in SOCIAL_INSURANCE {
            let amount = match first_rule(rules, kind, None) {
                Some(rule) => capped_flat(gross, rule),
                None => {
                    debug!(%kind, "no German contribution rule; contribution is zero");
                    Decimal::ZERO
                }
            };
            builder = builder.deduct(kind, amount);
        }

        builder.advise(TaxAdvisory::ChurchTaxExcluded).build()
    }
}

/// Income tax for the 2025 tariff, in whole euros.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use relocate_core::calculations::jurisdictions::income_tax_2025;
///
/// assert_eq!(income_tax_2025(dec!(12096)), dec!(0));
/// assert_eq!(income_tax_2025(dec!(50000)), dec!(10691));
/// ```
pub fn income_tax_2025(taxable_income: Decimal) -> Decimal {
    let x = taxable_income.max(Decimal::ZERO).floor();

    let tax = if x <= BASIC_ALLOWANCE {
        Decimal::ZERO
    } else if x <= ZONE_2_END {
        let y = (x - BASIC_ALLOWANCE) / dec!(10000);
        (dec!(932.30) * y + dec!(1400)) * y
    } else if x <= ZONE_3_END {
        let z = (x - ZONE_2_END) / dec!(10000);
        (dec!(176.64) * z + dec!(2397)) * z + dec!(1015.13)
    } else if x <= ZONE_4_END {
        dec!(0.42) * x - dec!(10911.92)
    } else {
        dec!(0.45) * x - dec!(19246.67)
    };

    tax.floor()
}

/// Solidarity surcharge on assessed income tax, unrounded.
///
/// Nothing up to the exemption limit, then the lesser of the full 5.5 % rate
/// and 11.9 % of the tax above the limit.
pub fn solidarity_surcharge(income_tax: Decimal) -> Decimal {
    if income_tax <= SOLIDARITY_EXEMPTION {
        return Decimal::ZERO;
    }
    let full = SOLIDARITY_RATE * income_tax;
    let tapered = SOLIDARITY_TAPER_RATE * (income_tax - SOLIDARITY_EXEMPTION);
    full.min(tapered)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn contribution(
        tax_type: TaxType,
        ceiling: Decimal,
        rate: Decimal,
    ) -> TaxRule {
        TaxRule {
            country: Country::Germany,
            region: None,
            tax_type,
            bracket_lower: dec!(0),
            bracket_upper: Some(ceiling),
            rate_percent: rate,
            is_estimate: false,
        }
    }

    fn rules_2025() -> Vec<TaxRule> {
        vec![
            contribution(TaxType::HealthInsurance, dec!(66150), dec!(8.55)),
            contribution(TaxType::PensionInsurance, dec!(96600), dec!(9.3)),
            contribution(TaxType::UnemploymentInsurance, dec!(96600), dec!(1.3)),
            contribution(TaxType::LongTermCareInsurance, dec!(66150), dec!(1.8)),
        ]
    }

    // =========================================================================
    // income_tax_2025 tests
    // =========================================================================

    #[test]
    fn income_tax_at_zone_boundaries() {
        let cases = [
            (dec!(0), dec!(0)),
            (dec!(12096), dec!(0)),
            (dec!(17443), dec!(1015)),
            (dec!(50000), dec!(10691)),
            (dec!(68480), dec!(17849)),
            (dec!(277825), dec!(105774)),
            (dec!(277826), dec!(105775)),
        ];

        for (income, expected) in cases {
            assert_eq!(income_tax_2025(income), expected, "income tax on {income}");
        }
    }

    #[test]
    fn income_tax_floors_input_before_formula() {
        assert_eq!(income_tax_2025(dec!(50000.99)), income_tax_2025(dec!(50000)));
    }

    #[test]
    fn income_tax_is_continuous_between_zones_three_and_four() {
        // Zone 3 and zone 4 formulas agree at the boundary.
        let zone_3 = {
            let z = (dec!(68480) - ZONE_2_END) / dec!(10000);
            ((dec!(176.64) * z + dec!(2397)) * z + dec!(1015.13)).floor()
        };
        let zone_4 = (dec!(0.42) * dec!(68480) - dec!(10911.92)).floor();

        assert_eq!(zone_3, dec!(17849));
        assert_eq!(zone_4, dec!(17849));
    }

    #[test]
    fn income_tax_first_euro_above_allowance() {
        assert_eq!(income_tax_2025(dec!(12097)), dec!(0));
        // y = 0.1: (932.30 * 0.1 + 1400) * 0.1 = 149.323
        assert_eq!(income_tax_2025(dec!(13096)), dec!(149));
    }

    #[test]
    fn income_tax_zone_two_floors_input_and_result() {
        // y = 0.2904 gives 485.18.
        assert_eq!(income_tax_2025(dec!(15000)), dec!(485));
        // 12485 gives 55.87; the unfloored 12485.9 would give 56.003.
        assert_eq!(income_tax_2025(dec!(12485.9)), dec!(55));
    }

    // =========================================================================
    // solidarity_surcharge tests
    // =========================================================================

    #[test]
    fn solidarity_surcharge_thresholds() {
        assert_eq!(solidarity_surcharge(dec!(19950)), dec!(0));
        // Taper: 11.9% × 50 is below 5.5% × 20000.
        assert_eq!(solidarity_surcharge(dec!(20000)), dec!(5.95));
        // Full rate once the taper catches up.
        assert_eq!(solidarity_surcharge(dec!(105774)), dec!(5817.57));
    }

    // =========================================================================
    // compute tests
    // =========================================================================

    #[test]
    fn compute_60k_below_contribution_ceilings() {
        let breakdown = Germany.compute(dec!(60000), &rules_2025(), &TaxOptions::default());

        assert_eq!(breakdown.deduction(TaxType::IncomeTax), dec!(14415));
        assert_eq!(breakdown.deduction(TaxType::SolidaritySurcharge), dec!(0));
        assert_eq!(breakdown.deduction(TaxType::HealthInsurance), dec!(5130));
        assert_eq!(breakdown.deduction(TaxType::PensionInsurance), dec!(5580));
        assert_eq!(breakdown.deduction(TaxType::UnemploymentInsurance), dec!(780));
        assert_eq!(breakdown.deduction(TaxType::LongTermCareInsurance), dec!(1080));
        assert_eq!(breakdown.total_deductions, dec!(26985));
        assert_eq!(breakdown.net_annual, dec!(33015));
        assert_eq!(breakdown.net_monthly, dec!(2751));
        assert_eq!(breakdown.effective_tax_rate, dec!(45.0));
    }

    #[test]
    fn compute_100k_hits_ceilings_and_solidarity() {
        let breakdown = Germany.compute(dec!(100000), &rules_2025(), &TaxOptions::default());

        assert_eq!(breakdown.deduction(TaxType::IncomeTax), dec!(31088));
        // min(5.5% × 31088, 11.9% × 11138)
        assert_eq!(breakdown.deduction(TaxType::SolidaritySurcharge), dec!(1325));
        assert_eq!(breakdown.deduction(TaxType::HealthInsurance), dec!(5656));
        assert_eq!(breakdown.deduction(TaxType::PensionInsurance), dec!(8984));
        assert_eq!(breakdown.deduction(TaxType::UnemploymentInsurance), dec!(1256));
        assert_eq!(breakdown.deduction(TaxType::LongTermCareInsurance), dec!(1191));
    }

    #[test]
    fn church_tax_is_advisory_only() {
        let breakdown = Germany.compute(dec!(60000), &rules_2025(), &TaxOptions::default());

        assert_eq!(breakdown.advisories, vec![TaxAdvisory::ChurchTaxExcluded]);
        assert_eq!(
            breakdown.net_annual,
            breakdown.gross_annual - breakdown.total_deductions
        );
    }

    #[test]
    fn missing_contribution_rows_still_charge_income_tax() {
        let breakdown = Germany.compute(dec!(60000), &[], &TaxOptions::default());

        assert_eq!(breakdown.total_deductions, dec!(14415));
    }
}
