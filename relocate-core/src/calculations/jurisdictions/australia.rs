//! Australia: resident marginal rates, Medicare levy, superannuation guarantee.
//!
//! | Component                | Rule rows                         | Treatment |
//! |--------------------------|-----------------------------------|-----------|
//! | Income tax               | `Income Tax` brackets             | marginal sum |
//! | Medicare levy            | one `Medicare Levy` row           | zero / 10 % phase-in / flat on whole income |
//! | Superannuation guarantee | one `Superannuation Guarantee` row | employer-paid, reported only |
//!
//! The Medicare levy row reuses the bracket columns: `bracket_lower` is the
//! low-income threshold, `bracket_upper` the end of the phase-in range and
//! `rate_percent` the full levy rate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::{BreakdownBuilder, TaxJurisdiction, TaxOptions, sanitize_gross};
use crate::calculations::common::{capped_flat, first_rule, marginal_tax, rules_of};
use crate::models::{Country, TaxBreakdown, TaxRule, TaxType};

/// Rate applied to income above the threshold inside the phase-in range.
const MEDICARE_PHASE_IN_RATE: Decimal = dec!(0.10);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Australia;

impl TaxJurisdiction for Australia {
    fn country(&self) -> Country {
        Country::Australia
    }

    fn compute(
        &self,
        gross: Decimal,
        rules: &[TaxRule],
        _options: &TaxOptions,
    ) -> TaxBreakdown {
        let gross = sanitize_gross(Country::Australia, gross);

        let brackets = rules_of(rules, TaxType::IncomeTax, None);
        if brackets.is_empty() {
            debug!("no Australian income tax brackets; income tax is zero");
        }
        let income_tax = marginal_tax(gross, &brackets);

        let levy = match first_rule(rules, TaxType::MedicareLevy, None) {
            Some(rule) => medicare_levy(gross, rule),
            None => {
                debug!("no Medicare levy rule; levy is zero");
                Decimal::ZERO
            }
        };

        let super_guarantee = first_rule(rules, TaxType::SuperannuationGuarantee, None)
            .map_or(Decimal::ZERO, |rule| capped_flat(gross, rule));

        BreakdownBuilder::new(Country::Australia, gross)
            .deduct(TaxType::IncomeTax, income_tax)
            .deduct(TaxType::MedicareLevy, levy)
            .employer_paid(TaxType::SuperannuationGuarantee, super_guarantee)
            .build()
    }
}

/// Medicare levy for `gross`, unrounded.
///
/// - `gross <= threshold`: nothing.
/// - `threshold < gross <= ceiling`: 10 % of the excess over the threshold.
/// - `gross > ceiling`: the full rate on the whole income. This is not
///   marginal, so the levy jumps slightly just above the ceiling.
///
/// A rule without an upper bound has no phase-in range.
pub fn medicare_levy(
    gross: Decimal,
    rule: &TaxRule,
) -> Decimal {
    let threshold = rule.bracket_lower;
    let ceiling = rule.bracket_upper.unwrap_or(threshold);

    if gross <= threshold {
        Decimal::ZERO
    } else if gross <= ceiling {
        MEDICARE_PHASE_IN_RATE * (gross - threshold)
    } else {
        rule.rate() * gross
    }
}
