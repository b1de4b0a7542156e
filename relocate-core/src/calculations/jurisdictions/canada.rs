//! Canada: federal and provincial income tax with payroll contributions.
//!
//! # Calculation order
//!
//! 1. Pension contributions: CPP + CPP2 outside Quebec, QPP + QPP2 in Quebec.
//!    Each row covers `[bracket_lower, bracket_upper)` of earnings (basic
//!    exemption to YMPE, YMPE to YAMPE).
//! 2. EI premium: `rate × min(gross, maximum insurable earnings)`. A row for
//!    the requested region overrides the national row.
//! 3. Federal tax: marginal `Income Tax` rows, less non-refundable credits on
//!    the basic personal amount, pension contributions and EI at the lowest
//!    federal rate. Quebec residents then receive the 16.5 % abatement.
//! 4. Provincial tax: marginal `Provincial Income Tax` rows for the region,
//!    less the same credits using the provincial basic personal amount at the
//!    lowest provincial rate.
//! 5. Ontario only: surtax on basic provincial tax and the health premium.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::{BreakdownBuilder, TaxJurisdiction, TaxOptions, sanitize_gross};
use crate::calculations::common::{capped_flat, lowest_rate, marginal_tax, rules_of};
use crate::models::{Country, TaxBreakdown, TaxRule, TaxType};

/// Federal basic personal amount.
const FEDERAL_BASIC_PERSONAL_AMOUNT: Decimal = dec!(15705);

/// Share of basic federal tax that remains after the Quebec abatement (1 - 16.5 %).
const QUEBEC_ABATEMENT_FACTOR: Decimal = dec!(0.835);

const ONTARIO_SURTAX_FIRST_THRESHOLD: Decimal = dec!(5554);
const ONTARIO_SURTAX_SECOND_THRESHOLD: Decimal = dec!(7108);
const ONTARIO_SURTAX_FIRST_RATE: Decimal = dec!(0.20);
const ONTARIO_SURTAX_SECOND_RATE: Decimal = dec!(0.16);

/// Provincial basic personal amounts by region code.
static PROVINCIAL_BASIC_PERSONAL_AMOUNTS: &[(&str, i64)] = &[
    ("AB", 21885),
    ("BC", 12580),
    ("MB", 15780),
    ("NB", 13396),
    ("NL", 10818),
    ("NS", 8744),
    ("ON", 12399),
    ("PE", 13500),
    ("QC", 18056),
    ("SK", 18491),
];

/// One step of the Ontario Health Premium: above `from`, the premium is
/// `base + rate × (gross - from)` until it reaches `cap`.
struct PremiumStep {
    from: i64,
    base: i64,
    rate_percent: i64,
    cap: i64,
}

static ONTARIO_HEALTH_PREMIUM_STEPS: &[PremiumStep] = &[
    PremiumStep { from: 20_000, base: 0, rate_percent: 6, cap: 300 },
    PremiumStep { from: 36_000, base: 300, rate_percent: 6, cap: 450 },
    PremiumStep { from: 48_000, base: 450, rate_percent: 25, cap: 600 },
    PremiumStep { from: 72_000, base: 600, rate_percent: 25, cap: 750 },
    PremiumStep { from: 200_000, base: 750, rate_percent: 25, cap: 900 },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Canada;

impl TaxJurisdiction for Canada {
    fn country(&self) -> Country {
        Country::Canada
    }

    fn compute(
        &self,
        gross: Decimal,
        rules: &[TaxRule],
        options: &TaxOptions,
    ) -> TaxBreakdown {
        let gross = sanitize_gross(Country::Canada, gross);
        let region = options.region().map(str::to_ascii_uppercase);
        let region = region.as_deref();
        let is_quebec = region == Some("QC");
        let is_ontario = region == Some("ON");

        let (base_type, top_up_type) = if is_quebec {
            (TaxType::Qpp, TaxType::Qpp2)
        } else {
            (TaxType::Cpp, TaxType::Cpp2)
        };
        let base_pension = regional_rule(rules, base_type, region)
            .map_or(Decimal::ZERO, |r| r.overlap(gross) * r.rate());
        let top_up_pension = regional_rule(rules, top_up_type, region)
            .map_or(Decimal::ZERO, |r| r.overlap(gross) * r.rate());
        let ei = regional_rule(rules, TaxType::Ei, region)
            .map_or(Decimal::ZERO, |r| capped_flat(gross, r));
        let credit_base = base_pension + top_up_pension + ei;

        let federal_brackets = rules_of(rules, TaxType::IncomeTax, None);
        let federal_credits =
            lowest_rate(&federal_brackets) * (FEDERAL_BASIC_PERSONAL_AMOUNT + credit_base);
        let mut federal_tax =
            (marginal_tax(gross, &federal_brackets) - federal_credits).max(Decimal::ZERO);
        if is_quebec {
            federal_tax *= QUEBEC_ABATEMENT_FACTOR;
        }

        let provincial_brackets = match region {
            Some(code) => rules_of(rules, TaxType::ProvincialIncomeTax, Some(code)),
            None => {
                debug!("no province selected; provincial tax is zero");
                Vec::new()
            }
        };
        let provincial_credits = lowest_rate(&provincial_brackets)
            * (provincial_basic_personal_amount(region) + credit_base);
        let provincial_tax =
            (marginal_tax(gross, &provincial_brackets) - provincial_credits).max(Decimal::ZERO);

        let (surtax, health_premium) = if is_ontario {
            (ontario_surtax(provincial_tax), ontario_health_premium(gross))
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        BreakdownBuilder::new(Country::Canada, gross)
            .deduct(TaxType::IncomeTax, federal_tax)
            .deduct(TaxType::ProvincialIncomeTax, provincial_tax)
            .deduct(TaxType::ProvincialSurtax, surtax)
            .deduct(TaxType::ProvincialHealthPremium, health_premium)
            .deduct(base_type, base_pension)
            .deduct(top_up_type, top_up_pension)
            .deduct(TaxType::Ei, ei)
            .build()
    }
}

/// The row of `tax_type` for `region`, falling back to the national row.
fn regional_rule<'a>(
    rules: &'a [TaxRule],
    tax_type: TaxType,
    region: Option<&str>,
) -> Option<&'a TaxRule> {
    let regional = region.and_then(|code| {
        rules
            .iter()
            .find(|r| r.tax_type == tax_type && r.matches_region(Some(code)))
    });
    let rule = regional.or_else(|| {
        rules
            .iter()
            .find(|r| r.tax_type == tax_type && r.matches_region(None))
    });
    if rule.is_none() {
        debug!(%tax_type, ?region, "no Canadian rule; contribution is zero");
    }
    rule
}

fn provincial_basic_personal_amount(region: Option<&str>) -> Decimal {
    region
        .and_then(|code| {
            PROVINCIAL_BASIC_PERSONAL_AMOUNTS
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, amount)| Decimal::from(*amount))
        })
        .unwrap_or(Decimal::ZERO)
}

/// Ontario surtax on basic Ontario tax (not on income), unrounded.
///
/// 20 % of the tax above the first threshold plus a further 16 % of the tax
/// above the second threshold.
pub fn ontario_surtax(basic_provincial_tax: Decimal) -> Decimal {
    let first = (basic_provincial_tax - ONTARIO_SURTAX_FIRST_THRESHOLD).max(Decimal::ZERO);
    let second = (basic_provincial_tax - ONTARIO_SURTAX_SECOND_THRESHOLD).max(Decimal::ZERO);
    ONTARIO_SURTAX_FIRST_RATE * first + ONTARIO_SURTAX_SECOND_RATE * second
}

/// Ontario Health Premium for a gross income, unrounded.
///
/// Zero up to 20,000, then alternating ramps and flat plateaus at 300, 450,
/// 600, 750 and 900.
pub fn ontario_health_premium(gross: Decimal) -> Decimal {
    let step = ONTARIO_HEALTH_PREMIUM_STEPS
        .iter()
        .rev()
        .find(|s| gross > Decimal::from(s.from));

    match step {
        Some(s) => {
            let ramp = Decimal::from(s.base)
                + Decimal::new(s.rate_percent, 2) * (gross - Decimal::from(s.from));
            ramp.min(Decimal::from(s.cap))
        }
        None => Decimal::ZERO,
    }
}
