use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Country;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LifestyleLevel {
    Basic,
    #[default]
    Moderate,
    Premium,
}

impl LifestyleLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Moderate => "Moderate",
            Self::Premium => "Premium",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "moderate" => Some(Self::Moderate),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RentType {
    Shared,
    #[default]
    OneBhk,
    Family,
}

impl RentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shared => "Shared",
            Self::OneBhk => "1BHK",
            Self::Family => "Family",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Some(Self::Shared),
            "1bhk" | "one_bhk" | "onebhk" => Some(Self::OneBhk),
            "family" => Some(Self::Family),
            _ => None,
        }
    }
}

/// Itemized monthly living costs for one city at one lifestyle and
/// accommodation tier, in the country's local currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostOfLivingRow {
    pub country: Country,
    pub city: String,
    pub lifestyle: LifestyleLevel,
    pub rent_type: RentType,
    pub rent: Decimal,
    pub utilities: Decimal,
    pub transport: Decimal,
    pub groceries: Decimal,
    pub school_fees: Decimal,
    pub dining: Decimal,
    pub healthcare: Decimal,
    pub misc: Decimal,
    /// Precomputed by the source table; expected to equal [`Self::itemized_total`].
    pub total_monthly_cost: Decimal,
}

impl CostOfLivingRow {
    pub fn itemized_total(&self) -> Decimal {
        self.rent
            + self.utilities
            + self.transport
            + self.groceries
            + self.school_fees
            + self.dining
            + self.healthcare
            + self.misc
    }

    pub fn is_consistent(&self) -> bool {
        self.itemized_total() == self.total_monthly_cost
    }

    /// True when this row is the one for `city` at the given tier. City names
    /// compare case-insensitively.
    pub fn matches(
        &self,
        city: &str,
        lifestyle: LifestyleLevel,
        rent_type: RentType,
    ) -> bool {
        self.city.eq_ignore_ascii_case(city.trim())
            && self.lifestyle == lifestyle
            && self.rent_type == rent_type
    }
}

/// Finds the row for `city` at the given tier.
pub fn find_cost_row<'a>(
    rows: &'a [CostOfLivingRow],
    city: &str,
    lifestyle: LifestyleLevel,
    rent_type: RentType,
) -> Option<&'a CostOfLivingRow> {
    rows.iter().find(|r| r.matches(city, lifestyle, rent_type))
}
