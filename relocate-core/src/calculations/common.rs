//! Common utility functions for tax and savings calculations.
//!
//! This module provides shared functionality used across the per-country
//! engines: rounding, rule selection, marginal bracket summation, and the
//! guarded division used by the recovery calculation.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{TaxRule, TaxType};

/// Rounds a decimal value to whole currency units using half-up rounding.
///
/// Values at exactly .5 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use relocate_core::calculations::common::round_currency;
///
/// assert_eq!(round_currency(dec!(41666.67)), dec!(41667));
/// assert_eq!(round_currency(dec!(680.5)), dec!(681));
/// assert_eq!(round_currency(dec!(680.49)), dec!(680));
/// assert_eq!(round_currency(dec!(-12.5)), dec!(-13));
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a percentage such as `32.5` into the fraction `0.325`.
pub fn percent(rate_percent: Decimal) -> Decimal {
    rate_percent / Decimal::ONE_HUNDRED
}

/// Divides `numerator` by `denominator`, substituting `1` for any
/// non-positive denominator.
///
/// The substitution only exists so the arithmetic stays defined. Whenever the
/// denominator is not positive the quotient is meaningless and must not be
/// shown; callers branch on their own "not applicable" condition first.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use relocate_core::calculations::common::safe_divide;
///
/// assert_eq!(safe_divide(dec!(100), dec!(4)), dec!(25));
/// assert_eq!(safe_divide(dec!(100), dec!(0)), dec!(100));
/// assert_eq!(safe_divide(dec!(100), dec!(-5)), dec!(100));
/// ```
pub fn safe_divide(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    let guarded = if denominator > Decimal::ZERO {
        denominator
    } else {
        Decimal::ONE
    };
    numerator / guarded
}

/// Effective rate as a percentage with one decimal place, zero for zero gross.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use relocate_core::calculations::common::effective_rate;
///
/// assert_eq!(effective_rate(dec!(31288), dec!(100000)), dec!(31.3));
/// assert_eq!(effective_rate(dec!(0), dec!(0)), dec!(0));
/// ```
pub fn effective_rate(
    total_deductions: Decimal,
    gross: Decimal,
) -> Decimal {
    if gross <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_currency(total_deductions / gross * Decimal::ONE_THOUSAND) / Decimal::TEN
}

/// Rows of `tax_type` for `region`, sorted by lower bound.
///
/// `region = None` selects national rows only.
pub fn rules_of<'a>(
    rules: &'a [TaxRule],
    tax_type: TaxType,
    region: Option<&str>,
) -> Vec<&'a TaxRule> {
    let mut selected: Vec<&TaxRule> = rules
        .iter()
        .filter(|r| r.tax_type == tax_type && r.matches_region(region))
        .collect();
    selected.sort_by(|a, b| a.bracket_lower.cmp(&b.bracket_lower));
    selected
}

/// First row of `tax_type` for `region`, if any.
pub fn first_rule<'a>(
    rules: &'a [TaxRule],
    tax_type: TaxType,
    region: Option<&str>,
) -> Option<&'a TaxRule> {
    rules_of(rules, tax_type, region).into_iter().next()
}

/// Marginal bracket tax: each row's rate applied to the slice of `income`
/// inside that row, summed.
pub fn marginal_tax(
    income: Decimal,
    brackets: &[&TaxRule],
) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    brackets
        .iter()
        .map(|b| b.overlap(income) * b.rate())
        .sum()
}

/// Capped flat contribution: `rate × min(income, cap)`. The rule's upper
/// bound is the cap; an absent upper bound means uncapped.
pub fn capped_flat(
    income: Decimal,
    rule: &TaxRule,
) -> Decimal {
    let base = match rule.bracket_upper {
        Some(cap) => income.min(cap),
        None => income,
    };
    base.max(Decimal::ZERO) * rule.rate()
}

/// Lowest positive marginal rate among `brackets`, as a fraction.
pub fn lowest_rate(brackets: &[&TaxRule]) -> Decimal {
    brackets
        .iter()
        .map(|b| b.rate())
        .filter(|r| *r > Decimal::ZERO)
        .min()
        .unwrap_or(Decimal::ZERO)
}
