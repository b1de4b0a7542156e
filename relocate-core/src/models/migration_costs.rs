use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Country;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MigrationCostCategory {
    ExamsAndRegistration,
    VisaAndImmigration,
    PreparationAndCoaching,
    TravelAndLogistics,
}

impl MigrationCostCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExamsAndRegistration => "Exams & Registration",
            Self::VisaAndImmigration => "Visa & Immigration",
            Self::PreparationAndCoaching => "Preparation & Coaching",
            Self::TravelAndLogistics => "Travel & Logistics",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "examsregistration" | "examsandregistration" => Some(Self::ExamsAndRegistration),
            "visaimmigration" | "visaandimmigration" => Some(Self::VisaAndImmigration),
            "preparationcoaching" | "preparationandcoaching" => {
                Some(Self::PreparationAndCoaching)
            }
            "travellogistics" | "travelandlogistics" => Some(Self::TravelAndLogistics),
            _ => None,
        }
    }
}

/// One itemized one-time cost of relocating, in INR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationCostItem {
    pub category: MigrationCostCategory,
    pub item: String,
    pub amount_inr: Decimal,
}

/// One-time costs of moving from India to `country`.
///
/// The line items describe a single-attempt baseline. The three totals are
/// scenario figures that already account for exam retakes and coaching tiers,
/// so they are not the sum of the items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationCosts {
    pub country: Country,
    pub items: Vec<MigrationCostItem>,
    pub total_min_inr: Decimal,
    pub total_typical_inr: Decimal,
    pub total_max_inr: Decimal,
}

impl MigrationCosts {
    /// A record with no items and zero totals.
    pub fn empty(country: Country) -> Self {
        Self {
            country,
            items: Vec::new(),
            total_min_inr: Decimal::ZERO,
            total_typical_inr: Decimal::ZERO,
            total_max_inr: Decimal::ZERO,
        }
    }

    pub fn line_item_total(&self) -> Decimal {
        self.items.iter().map(|i| i.amount_inr).sum()
    }

    pub fn category_total(
        &self,
        category: MigrationCostCategory,
    ) -> Decimal {
        self.items
            .iter()
            .filter(|i| i.category == category)
            .map(|i| i.amount_inr)
            .sum()
    }
}
