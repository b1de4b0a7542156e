use std::fmt;

use serde::{Deserialize, Serialize};

/// Currencies the estimator converts between. Every amount in a record is
/// denominated in its country's local currency except migration costs, which
/// are always INR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    Inr,
    Aed,
    Aud,
    Cad,
    Eur,
    Gbp,
    Nzd,
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 8] = [
        Self::Inr,
        Self::Aed,
        Self::Aud,
        Self::Cad,
        Self::Eur,
        Self::Gbp,
        Self::Nzd,
        Self::Usd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Aed => "AED",
            Self::Aud => "AUD",
            Self::Cad => "CAD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Nzd => "NZD",
            Self::Usd => "USD",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let code = s.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }
}

impl fmt::Display for Currency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Countries known to the estimator.
///
/// `India` is the fixed origin. The remaining variants are destinations; of
/// those only the ones returning `true` from [`Country::is_supported`] have a
/// tax engine, the rest show up as placeholder rows in comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Country {
    India,
    Uae,
    Australia,
    Canada,
    Germany,
    UnitedKingdom,
    NewZealand,
    Ireland,
    UnitedStates,
}

impl Country {
    /// Destinations in the order they are listed in comparisons.
    pub const DESTINATIONS: [Country; 8] = [
        Self::UnitedKingdom,
        Self::Australia,
        Self::Canada,
        Self::Germany,
        Self::NewZealand,
        Self::Uae,
        Self::Ireland,
        Self::UnitedStates,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::India => "IN",
            Self::Uae => "AE",
            Self::Australia => "AU",
            Self::Canada => "CA",
            Self::Germany => "DE",
            Self::UnitedKingdom => "UK",
            Self::NewZealand => "NZ",
            Self::Ireland => "IE",
            Self::UnitedStates => "US",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::India => "India",
            Self::Uae => "United Arab Emirates",
            Self::Australia => "Australia",
            Self::Canada => "Canada",
            Self::Germany => "Germany",
            Self::UnitedKingdom => "United Kingdom",
            Self::NewZealand => "New Zealand",
            Self::Ireland => "Ireland",
            Self::UnitedStates => "United States",
        }
    }

    pub fn currency(&self) -> Currency {
        match self {
            Self::India => Currency::Inr,
            Self::Uae => Currency::Aed,
            Self::Australia => Currency::Aud,
            Self::Canada => Currency::Cad,
            Self::Germany | Self::Ireland => Currency::Eur,
            Self::UnitedKingdom => Currency::Gbp,
            Self::NewZealand => Currency::Nzd,
            Self::UnitedStates => Currency::Usd,
        }
    }

    /// Whether a tax engine and source tables exist for this destination.
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            Self::Uae
                | Self::Australia
                | Self::Canada
                | Self::Germany
                | Self::UnitedKingdom
                | Self::NewZealand
        )
    }

    /// Accepts ISO-style codes (`AU`, `GB`/`UK`, ...) or the English name,
    /// case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase();
        match key.as_str() {
            "in" | "ind" | "india" => Some(Self::India),
            "ae" | "uae" | "united arab emirates" => Some(Self::Uae),
            "au" | "aus" | "australia" => Some(Self::Australia),
            "ca" | "can" | "canada" => Some(Self::Canada),
            "de" | "deu" | "germany" => Some(Self::Germany),
            "uk" | "gb" | "gbr" | "united kingdom" => Some(Self::UnitedKingdom),
            "nz" | "nzl" | "new zealand" => Some(Self::NewZealand),
            "ie" | "irl" | "ireland" => Some(Self::Ireland),
            "us" | "usa" | "united states" => Some(Self::UnitedStates),
            _ => None,
        }
    }
}

impl fmt::Display for Country {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}
