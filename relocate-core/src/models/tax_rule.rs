use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Country;

/// Closed set of deduction kinds.
///
/// Every variant except [`TaxType::ProvincialSurtax`] and
/// [`TaxType::ProvincialHealthPremium`] can appear as a rule row; those two
/// are derived from other components and only ever show up as breakdown lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxType {
    IncomeTax,
    NationalInsurance,
    NhsPension,
    MedicareLevy,
    SuperannuationGuarantee,
    ProvincialIncomeTax,
    ProvincialSurtax,
    ProvincialHealthPremium,
    Cpp,
    Cpp2,
    Qpp,
    Qpp2,
    Ei,
    SolidaritySurcharge,
    HealthInsurance,
    PensionInsurance,
    UnemploymentInsurance,
    LongTermCareInsurance,
    AccEarnersLevy,
    KiwiSaver,
}

impl TaxType {
    pub const ALL: [TaxType; 20] = [
        Self::IncomeTax,
        Self::NationalInsurance,
        Self::NhsPension,
        Self::MedicareLevy,
        Self::SuperannuationGuarantee,
        Self::ProvincialIncomeTax,
        Self::ProvincialSurtax,
        Self::ProvincialHealthPremium,
        Self::Cpp,
        Self::Cpp2,
        Self::Qpp,
        Self::Qpp2,
        Self::Ei,
        Self::SolidaritySurcharge,
        Self::HealthInsurance,
        Self::PensionInsurance,
        Self::UnemploymentInsurance,
        Self::LongTermCareInsurance,
        Self::AccEarnersLevy,
        Self::KiwiSaver,
    ];

    /// The tag used in source tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::IncomeTax => "Income Tax",
            Self::NationalInsurance => "National Insurance",
            Self::NhsPension => "NHS Pension",
            Self::MedicareLevy => "Medicare Levy",
            Self::SuperannuationGuarantee => "Superannuation Guarantee",
            Self::ProvincialIncomeTax => "Provincial Income Tax",
            Self::ProvincialSurtax => "Provincial Surtax",
            Self::ProvincialHealthPremium => "Provincial Health Premium",
            Self::Cpp => "CPP",
            Self::Cpp2 => "CPP2",
            Self::Qpp => "QPP",
            Self::Qpp2 => "QPP2",
            Self::Ei => "EI",
            Self::SolidaritySurcharge => "Solidarity Surcharge",
            Self::HealthInsurance => "Health Insurance",
            Self::PensionInsurance => "Pension Insurance",
            Self::UnemploymentInsurance => "Unemployment Insurance",
            Self::LongTermCareInsurance => "Long-term Care Insurance",
            Self::AccEarnersLevy => "ACC Earners Levy",
            Self::KiwiSaver => "KiwiSaver",
        }
    }

    /// Matches [`TaxType::label`] ignoring case, surrounding whitespace, and
    /// the hyphen/space difference in "Long-term".
    pub fn parse(s: &str) -> Option<Self> {
        let normalize = |v: &str| v.trim().to_ascii_lowercase().replace('-', " ");
        let key = normalize(s);
        Self::ALL.into_iter().find(|t| normalize(t.label()) == key)
    }
}

impl fmt::Display for TaxType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of a country's tax rule table.
///
/// Depending on `tax_type` a row is a marginal bracket, a capped flat rate
/// (`bracket_upper` is the cap), or a tier (NHS Pension).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRule {
    pub country: Country,
    /// Province or state code; `None` for national/federal rows.
    pub region: Option<String>,
    pub tax_type: TaxType,
    pub bracket_lower: Decimal,
    /// `None` means unbounded.
    pub bracket_upper: Option<Decimal>,
    pub rate_percent: Decimal,
    pub is_estimate: bool,
}

impl TaxRule {
    /// Rate as a fraction (`rate_percent / 100`).
    pub fn rate(&self) -> Decimal {
        self.rate_percent / Decimal::ONE_HUNDRED
    }

    /// Portion of `income` that falls inside `[bracket_lower, bracket_upper)`.
    pub fn overlap(
        &self,
        income: Decimal,
    ) -> Decimal {
        let top = match self.bracket_upper {
            Some(upper) => income.min(upper),
            None => income,
        };
        (top - self.bracket_lower).max(Decimal::ZERO)
    }

    /// Whether `income` lies in `[bracket_lower, bracket_upper)`.
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        income >= self.bracket_lower && self.bracket_upper.is_none_or(|upper| income < upper)
    }

    /// True when the row applies to `region`.
    ///
    /// Region codes compare case-insensitively; a row without a region only
    /// matches a `None` request.
    pub fn matches_region(
        &self,
        region: Option<&str>,
    ) -> bool {
        match (self.region.as_deref(), region) {
            (None, None) => true,
            (Some(own), Some(wanted)) => own.eq_ignore_ascii_case(wanted.trim()),
            _ => false,
        }
    }
}
