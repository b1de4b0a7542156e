use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Country, Currency};

static PUBLIC_SECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)public|government").expect("public-sector pattern is a valid regex")
});

/// Which point of a salary band a calculation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SalaryPoint {
    Min,
    #[default]
    Typical,
    Max,
}

impl SalaryPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Typical => "typical",
            Self::Max => "max",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" | "minimum" => Some(Self::Min),
            "typical" | "mid" => Some(Self::Typical),
            "max" | "maximum" => Some(Self::Max),
            _ => None,
        }
    }
}

/// Gross annual pay range for one career stage in one sector of one country.
///
/// `gross_annual_min <= gross_annual_typical <= gross_annual_max`; all three
/// may be equal when the source publishes a single pay point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBand {
    pub country: Country,
    pub career_stage: String,
    pub sector: String,
    pub gross_annual_min: Decimal,
    pub gross_annual_typical: Decimal,
    pub gross_annual_max: Decimal,
    pub currency: Currency,
    /// Private-sector and fee-for-service bands are rough estimates.
    pub is_estimate: bool,
    pub notes: Option<String>,
}

impl SalaryBand {
    pub fn gross_at(
        &self,
        point: SalaryPoint,
    ) -> Decimal {
        match point {
            SalaryPoint::Min => self.gross_annual_min,
            SalaryPoint::Typical => self.gross_annual_typical,
            SalaryPoint::Max => self.gross_annual_max,
        }
    }

    /// True when the sector name mentions "public" or "government", in any case.
    pub fn is_public_sector(&self) -> bool {
        PUBLIC_SECTOR.is_match(&self.sector)
    }

    /// True when all three pay points coincide.
    pub fn is_single_point(&self) -> bool {
        self.gross_annual_min == self.gross_annual_typical
            && self.gross_annual_typical == self.gross_annual_max
    }

    /// Checks `min <= typical <= max`.
    pub fn is_ordered(&self) -> bool {
        self.gross_annual_min <= self.gross_annual_typical
            && self.gross_annual_typical <= self.gross_annual_max
    }
}
