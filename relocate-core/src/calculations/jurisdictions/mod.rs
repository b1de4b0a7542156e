//! Per-country take-home pay engines.
//!
//! Each supported destination implements [`TaxJurisdiction`]. The engines
//! share the output shape and the marginal-bracket helper in
//! [`crate::calculations::common`], but each keeps its own arithmetic: the
//! German zone formulas and the Ontario premium steps are not bracket tables.
//!
//! All engines are fail-soft. A tax type with no rule rows contributes zero;
//! nothing here returns an error.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use relocate_core::calculations::jurisdictions::{TaxOptions, compute_tax};
//! use relocate_core::Country;
//!
//! let breakdown = compute_tax(Country::Uae, dec!(500000), &[], &TaxOptions::default())
//!     .expect("the UAE has an engine");
//!
//! assert_eq!(breakdown.net_annual, dec!(500000));
//! assert_eq!(breakdown.net_monthly, dec!(41667));
//! assert_eq!(breakdown.effective_tax_rate, dec!(0));
//! ```

mod australia;
mod canada;
mod germany;
mod new_zealand;
mod uae;
mod united_kingdom;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use australia::{Australia, medicare_levy};
pub use canada::{Canada, ontario_health_premium, ontario_surtax};
pub use germany::{Germany, income_tax_2025, solidarity_surcharge};
pub use new_zealand::NewZealand;
pub use uae::Uae;
pub use united_kingdom::{UnitedKingdom, personal_allowance_reduction};

use crate::calculations::common::{effective_rate, round_currency};
use crate::models::{Country, DeductionLine, TaxAdvisory, TaxBreakdown, TaxRule, TaxType};

/// Caller-controlled switches that some engines honour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxOptions {
    /// Province/state code for countries with sub-national tax (Canada).
    pub region: Option<String>,
    /// Include the optional retirement contribution (UK NHS Pension,
    /// New Zealand KiwiSaver) in deductions.
    pub include_retirement: bool,
}

impl Default for TaxOptions {
    fn default() -> Self {
        Self {
            region: None,
            include_retirement: true,
        }
    }
}

impl TaxOptions {
    pub fn with_region(
        mut self,
        region: impl Into<String>,
    ) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn without_retirement(mut self) -> Self {
        self.include_retirement = false;
        self
    }

    pub(crate) fn region(&self) -> Option<&str> {
        self.region.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }
}

/// A country's take-home pay calculation.
pub trait TaxJurisdiction {
    fn country(&self) -> Country;

    /// Computes the breakdown for `gross` using this country's rows of `rules`.
    fn compute(
        &self,
        gross: Decimal,
        rules: &[TaxRule],
        options: &TaxOptions,
    ) -> TaxBreakdown;
}

/// Tagged dispatch over the six engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jurisdiction {
    Uae(Uae),
    Australia(Australia),
    Canada(Canada),
    Germany(Germany),
    UnitedKingdom(UnitedKingdom),
    NewZealand(NewZealand),
}

impl Jurisdiction {
    /// The engine for `country`, or `None` for countries without one.
    pub fn for_country(country: Country) -> Option<Self> {
        match country {
            Country::Uae => Some(Self::Uae(Uae)),
            Country::Australia => Some(Self::Australia(Australia)),
            Country::Canada => Some(Self::Canada(Canada)),
            Country::Germany => Some(Self::Germany(Germany)),
            Country::UnitedKingdom => Some(Self::UnitedKingdom(UnitedKingdom)),
            Country::NewZealand => Some(Self::NewZealand(NewZealand)),
            Country::India | Country::Ireland | Country::UnitedStates => None,
        }
    }

    fn engine(&self) -> &dyn TaxJurisdiction {
        match self {
            Self::Uae(e) => e,
            Self::Australia(e) => e,
            Self::Canada(e) => e,
            Self::Germany(e) => e,
            Self::UnitedKingdom(e) => e,
            Self::NewZealand(e) => e,
        }
    }
}

impl TaxJurisdiction for Jurisdiction {
    fn country(&self) -> Country {
        self.engine().country()
    }

    fn compute(
        &self,
        gross: Decimal,
        rules: &[TaxRule],
        options: &TaxOptions,
    ) -> TaxBreakdown {
        self.engine().compute(gross, rules, options)
    }
}

/// Computes the breakdown for `country`, or `None` when it has no engine.
pub fn compute_tax(
    country: Country,
    gross: Decimal,
    rules: &[TaxRule],
    options: &TaxOptions,
) -> Option<TaxBreakdown> {
    Jurisdiction::for_country(country).map(|j| j.compute(gross, rules, options))
}

/// Rounds gross to whole units; negative gross is treated as zero.
pub(crate) fn sanitize_gross(
    country: Country,
    gross: Decimal,
) -> Decimal {
    if gross < Decimal::ZERO {
        warn!(%country, %gross, "negative gross income; treating as zero");
        return Decimal::ZERO;
    }
    round_currency(gross)
}

/// Collects unrounded components and produces the rounded breakdown.
#[derive(Debug)]
pub(crate) struct BreakdownBuilder {
    country: Country,
    gross: Decimal,
    deductions: Vec<DeductionLine>,
    employer_contributions: Vec<DeductionLine>,
    advisories: Vec<TaxAdvisory>,
}

impl BreakdownBuilder {
    pub(crate) fn new(
        country: Country,
        gross: Decimal,
    ) -> Self {
        Self {
            country,
            gross,
            deductions: Vec::new(),
            employer_contributions: Vec::new(),
            advisories: Vec::new(),
        }
    }

    pub(crate) fn deduct(
        mut self,
        kind: TaxType,
        amount: Decimal,
    ) -> Self {
        self.deductions.push(DeductionLine {
            kind,
            amount: round_currency(amount),
        });
        self
    }

    pub(crate) fn employer_paid(
        mut self,
        kind: TaxType,
        amount: Decimal,
    ) -> Self {
        self.employer_contributions.push(DeductionLine {
            kind,
            amount: round_currency(amount),
        });
        self
    }

    pub(crate) fn advise(
        mut self,
        advisory: TaxAdvisory,
    ) -> Self {
        self.advisories.push(advisory);
        self
    }

    pub(crate) fn build(self) -> TaxBreakdown {
        let total_deductions: Decimal = self.deductions.iter().map(|l| l.amount).sum();
        let net_annual = self.gross - total_deductions;
        TaxBreakdown {
            country: self.country,
            currency: self.country.currency(),
            gross_annual: self.gross,
            deductions: self.deductions,
            employer_contributions: self.employer_contributions,
            advisories: self.advisories,
            total_deductions,
            net_annual,
            net_monthly: round_currency(net_annual / Decimal::from(12)),
            effective_tax_rate: effective_rate(total_deductions, self.gross),
        }
    }
}
