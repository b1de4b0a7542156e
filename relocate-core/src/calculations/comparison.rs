//! Cross-country comparison table.
//!
//! For every destination the engine produces one [`ComparisonRow`]:
//!
//! - Unsupported destinations get a placeholder row with no figures.
//! - The user's current country reuses the figures the caller already computed
//!   from the live selection, so the table agrees with the rest of the output.
//! - Every other country is synthesized: the equivalent career stage, that
//!   stage's public-sector band, the country's tax engine at a representative
//!   region and the cost of living in a representative city.
//!
//! Countries whose stage cannot be translated, or that have no public-sector
//! band for it, are left out of the table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::career::find_equivalent_stage;
use crate::calculations::jurisdictions::{TaxOptions, compute_tax};
use crate::calculations::savings::{Recovery, SavingsResult, compute_savings};
use crate::models::{
    CostOfLivingRow, Country, Currency, ExchangeRates, LifestyleLevel, MigrationCosts, RentType,
    SalaryBand, SalaryPoint, TaxBreakdown, TaxRule, find_cost_row,
};

/// City (and region, where tax depends on it) used for synthesized rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepresentativeLocation {
    pub city: &'static str,
    pub region: Option<&'static str>,
}

static REPRESENTATIVE_LOCATIONS: &[(Country, RepresentativeLocation)] = &[
    (Country::Uae, RepresentativeLocation { city: "Dubai", region: None }),
    (Country::Australia, RepresentativeLocation { city: "Sydney", region: None }),
    (Country::Canada, RepresentativeLocation { city: "Toronto", region: Some("ON") }),
    (Country::Germany, RepresentativeLocation { city: "Berlin", region: None }),
    (Country::UnitedKingdom, RepresentativeLocation { city: "London", region: None }),
    (Country::NewZealand, RepresentativeLocation { city: "Auckland", region: None }),
];

pub fn representative_location(country: Country) -> Option<RepresentativeLocation> {
    REPRESENTATIVE_LOCATIONS
        .iter()
        .find(|(c, _)| *c == country)
        .map(|(_, location)| *location)
}

/// Source records for one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryData {
    pub country: Country,
    pub salary_bands: Vec<SalaryBand>,
    pub tax_rules: Vec<TaxRule>,
    pub cost_of_living: Vec<CostOfLivingRow>,
    pub migration_costs: MigrationCosts,
}

impl CountryData {
    pub fn new(country: Country) -> Self {
        Self {
            country,
            salary_bands: Vec::new(),
            tax_rules: Vec::new(),
            cost_of_living: Vec::new(),
            migration_costs: MigrationCosts::empty(country),
        }
    }

    /// The first public-sector band for `career_stage`.
    pub fn public_band(
        &self,
        career_stage: &str,
    ) -> Option<&SalaryBand> {
        let stage = career_stage.trim();
        self.salary_bands
            .iter()
            .find(|b| b.career_stage.trim() == stage && b.is_public_sector())
    }

    /// Monthly cost at the given tier, or zero when the table has no such row.
    pub fn monthly_cost(
        &self,
        city: &str,
        lifestyle: LifestyleLevel,
        rent_type: RentType,
    ) -> Decimal {
        match find_cost_row(&self.cost_of_living, city, lifestyle, rent_type) {
            Some(row) => row.total_monthly_cost,
            None => {
                debug!(
                    country = %self.country,
                    city,
                    lifestyle = lifestyle.as_str(),
                    rent_type = rent_type.as_str(),
                    "no cost-of-living row; monthly cost is zero"
                );
                Decimal::ZERO
            }
        }
    }
}

/// Everything needed to compute one country's figures from a gross salary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureInputs<'s> {
    pub gross_annual: Decimal,
    pub region: Option<&'s str>,
    pub city: &'s str,
    pub lifestyle: LifestyleLevel,
    pub rent_type: RentType,
    pub include_retirement: bool,
}

/// Tax, cost and savings for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonFigures {
    pub gross_annual: Decimal,
    pub breakdown: TaxBreakdown,
    pub monthly_cost_local: Decimal,
    pub rate_to_inr: Decimal,
    pub savings: SavingsResult,
}

/// Runs the tax engine and savings calculation for `data`'s country.
///
/// Returns `None` only when the country has no tax engine.
pub fn compute_figures(
    data: &CountryData,
    rates: &ExchangeRates,
    inputs: &FigureInputs<'_>,
) -> Option<ComparisonFigures> {
    let options = TaxOptions {
        region: inputs.region.map(str::to_string),
        include_retirement: inputs.include_retirement,
    };
    let breakdown = compute_tax(data.country, inputs.gross_annual, &data.tax_rules, &options)?;
    let monthly_cost_local = data.monthly_cost(inputs.city, inputs.lifestyle, inputs.rent_type);
    let rate_to_inr = rates.to_inr(data.country.currency());
    let savings = compute_savings(
        breakdown.net_monthly,
        monthly_cost_local,
        rate_to_inr,
        &data.migration_costs,
    );

    Some(ComparisonFigures {
        gross_annual: inputs.gross_annual,
        breakdown,
        monthly_cost_local,
        rate_to_inr,
        savings,
    })
}

/// The user's choices plus the figures already computed for their own country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonSelection {
    pub current_country: Country,
    pub current_city: String,
    pub career_stage: String,
    pub salary_point: SalaryPoint,
    pub lifestyle: LifestyleLevel,
    pub rent_type: RentType,
    pub include_retirement: bool,
    pub current_figures: Option<ComparisonFigures>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonBadge {
    BestSavings,
    FastestRecovery,
}

impl ComparisonBadge {
    pub fn label(&self) -> &'static str {
        match self {
            Self::BestSavings => "Best savings",
            Self::FastestRecovery => "Fastest recovery",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub country: Country,
    pub currency: Currency,
    pub city: Option<String>,
    pub career_stage: Option<String>,
    pub is_current_country: bool,
    /// `None` for destinations without data.
    pub figures: Option<ComparisonFigures>,
    pub badge: Option<ComparisonBadge>,
}

impl ComparisonRow {
    fn placeholder(country: Country) -> Self {
        Self {
            country,
            currency: country.currency(),
            city: None,
            career_stage: None,
            is_current_country: false,
            figures: None,
            badge: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.figures.is_some()
    }

    /// Figures of an available row with non-negative savings.
    fn saving_figures(&self) -> Option<&ComparisonFigures> {
        self.figures
            .as_ref()
            .filter(|f| !f.savings.is_negative_savings)
    }
}

/// Builds the comparison table from per-country data and resolved rates.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonEngine<'a> {
    datasets: &'a [CountryData],
    rates: &'a ExchangeRates,
}

impl<'a> ComparisonEngine<'a> {
    pub fn new(
        datasets: &'a [CountryData],
        rates: &'a ExchangeRates,
    ) -> Self {
        Self { datasets, rates }
    }

    fn data_for(
        &self,
        country: Country,
    ) -> Option<&'a CountryData> {
        self.datasets.iter().find(|d| d.country == country)
    }

    /// One row per destination in [`Country::DESTINATIONS`] order, with badges.
    pub fn compute_rows(
        &self,
        selection: &ComparisonSelection,
    ) -> Vec<ComparisonRow> {
        let mut rows: Vec<ComparisonRow> = Country::DESTINATIONS
            .into_iter()
            .filter_map(|country| self.compute_row(country, selection))
            .collect();
        assign_badges(&mut rows);
        rows
    }

    fn compute_row(
        &self,
        country: Country,
        selection: &ComparisonSelection,
    ) -> Option<ComparisonRow> {
        if !country.is_supported() {
            return Some(ComparisonRow::placeholder(country));
        }

        if country == selection.current_country {
            return Some(ComparisonRow {
                country,
                currency: country.currency(),
                city: Some(selection.current_city.clone()),
                career_stage: Some(selection.career_stage.clone()),
                is_current_country: true,
                figures: selection.current_figures.clone(),
                badge: None,
            });
        }

        let Some(stage) =
            find_equivalent_stage(selection.current_country, &selection.career_stage, country)
        else {
            debug!(%country, stage = %selection.career_stage, "no equivalent stage; skipping");
            return None;
        };

        let Some(data) = self.data_for(country) else {
            debug!(%country, "no data loaded; skipping");
            return None;
        };

        let Some(band) = data.public_band(stage) else {
            debug!(%country, stage, "no public-sector band; skipping");
            return None;
        };

        let location = representative_location(country)?;
        let inputs = FigureInputs {
            gross_annual: band.gross_at(selection.salary_point),
            region: location.region,
            city: location.city,
            lifestyle: selection.lifestyle,
            rent_type: selection.rent_type,
            include_retirement: selection.include_retirement,
        };

        Some(ComparisonRow {
            country,
            currency: country.currency(),
            city: Some(location.city.to_string()),
            career_stage: Some(stage.to_string()),
            is_current_country: false,
            figures: compute_figures(data, self.rates, &inputs),
            badge: None,
        })
    }
}

/// Best savings goes to the highest INR monthly savings; fastest recovery to
/// the lowest typical recovery among the remaining rows. Only available rows
/// with non-negative savings qualify, and ties keep the earlier row.
fn assign_badges(rows: &mut [ComparisonRow]) {
    let mut best: Option<(usize, Decimal)> = None;
    for (i, figures) in rows
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.saving_figures().map(|f| (i, f)))
    {
        let savings = figures.savings.monthly_savings_inr;
        if best.is_none_or(|(_, top)| savings > top) {
            best = Some((i, savings));
        }
    }

    let mut fastest: Option<(usize, u32)> = None;
    for (i, figures) in rows
        .iter()
        .enumerate()
        .filter(|(i, _)| best.is_none_or(|(b, _)| b != *i))
        .filter_map(|(i, r)| r.saving_figures().map(|f| (i, f)))
    {
        let Recovery::Months(months) = figures.savings.recovery.typical else {
            continue;
        };
        if fastest.is_none_or(|(_, low)| months < low) {
            fastest = Some((i, months));
        }
    }

    if let Some((i, _)) = best {
        rows[i].badge = Some(ComparisonBadge::BestSavings);
    }
    if let Some((i, _)) = fastest {
        rows[i].badge = Some(ComparisonBadge::FastestRecovery);
    }
}
