use std::fmt;
use std::fs::File;
use std::path::Path;

use relocate_core::calculations::CountryData;
use relocate_core::{
    CostOfLivingRow, Country, ExchangeRates, LifestyleLevel, MigrationCosts, RentType,
    SalaryBand, TaxRule,
};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::DataLoadError;
use crate::loader::{
    parse_cost_of_living, parse_exchange_rates, parse_migration_costs, parse_salary_bands,
    parse_tax_rules,
};

pub const SALARY_BANDS_FILE: &str = "salary_bands.csv";
pub const TAX_RULES_FILE: &str = "tax_rules.csv";
pub const COST_OF_LIVING_FILE: &str = "cost_of_living.csv";
pub const MIGRATION_COSTS_FILE: &str = "migration_costs.csv";
pub const MIGRATION_TOTALS_FILE: &str = "migration_totals.csv";
pub const EXCHANGE_RATES_FILE: &str = "exchange_rates.csv";

/// Every source table, as loaded from one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub salary_bands: Vec<SalaryBand>,
    pub tax_rules: Vec<TaxRule>,
    pub cost_of_living: Vec<CostOfLivingRow>,
    pub migration_costs: Vec<MigrationCosts>,
    /// Bundled rates used when live rates are unavailable.
    pub fallback_rates: ExchangeRates,
}

/// A data problem that does not stop loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataWarning {
    /// A supported destination has no tax rule rows; its deductions will be zero.
    MissingTaxRules(Country),
    /// `total_monthly_cost` differs from the sum of the itemized costs.
    CostTotalMismatch {
        country: Country,
        city: String,
        lifestyle: LifestyleLevel,
        rent_type: RentType,
        itemized: Decimal,
        total: Decimal,
    },
    /// A band whose pay points are not `min <= typical <= max`.
    UnorderedBand {
        country: Country,
        career_stage: String,
        sector: String,
    },
    /// A supported destination has no exchange rate to INR.
    MissingFallbackRate(Country),
}

impl fmt::Display for DataWarning {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::MissingTaxRules(country) => {
                write!(f, "{country}: no tax rules; deductions will be zero")
            }
            Self::CostTotalMismatch {
                country,
                city,
                lifestyle,
                rent_type,
                itemized,
                total,
            } => write!(
                f,
                "{country}: {city} {} {} total {total} differs from itemized sum {itemized}",
                lifestyle.as_str(),
                rent_type.as_str()
            ),
            Self::UnorderedBand {
                country,
                career_stage,
                sector,
            } => write!(
                f,
                "{country}: band {career_stage} ({sector}) is not ordered min <= typical <= max"
            ),
            Self::MissingFallbackRate(country) => write!(
                f,
                "{country}: no fallback {} rate; savings will convert to zero",
                country.currency()
            ),
        }
    }
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn in_file<T>(
    path: &Path,
    result: Result<T, DataLoadError>,
) -> Result<T, DataLoadError> {
    result.map_err(|e| match e {
        io @ DataLoadError::Io { .. } => io,
        other => DataLoadError::File {
            path: path.to_path_buf(),
            source: Box::new(other),
        },
    })
}

impl Dataset {
    /// Loads all six tables from `dir`.
    ///
    /// # Errors
    ///
    /// * [`DataLoadError::Io`] when a file is missing or unreadable.
    /// * [`DataLoadError::File`] wrapping the parse error of the offending file.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let dir = dir.as_ref();
        let path = |name: &str| dir.join(name);

        let bands_path = path(SALARY_BANDS_FILE);
        let salary_bands = in_file(&bands_path, open(&bands_path).and_then(parse_salary_bands))?;

        let rules_path = path(TAX_RULES_FILE);
        let tax_rules = in_file(&rules_path, open(&rules_path).and_then(parse_tax_rules))?;

        let cost_path = path(COST_OF_LIVING_FILE);
        let cost_of_living = in_file(&cost_path, open(&cost_path).and_then(parse_cost_of_living))?;

        let items_path = path(MIGRATION_COSTS_FILE);
        let totals_path = path(MIGRATION_TOTALS_FILE);
        let items = open(&items_path)?;
        let totals = open(&totals_path)?;
        let migration_costs = in_file(&items_path, parse_migration_costs(items, totals))?;

        let rates_path = path(EXCHANGE_RATES_FILE);
        let fallback_rates =
            in_file(&rates_path, open(&rates_path).and_then(parse_exchange_rates))?;

        info!(
            dir = %dir.display(),
            salary_bands = salary_bands.len(),
            tax_rules = tax_rules.len(),
            cost_of_living = cost_of_living.len(),
            migration_costs = migration_costs.len(),
            exchange_rates = fallback_rates.len(),
            "loaded dataset"
        );

        Ok(Self {
            salary_bands,
            tax_rules,
            cost_of_living,
            migration_costs,
            fallback_rates,
        })
    }

    /// The records belonging to `country`.
    pub fn for_country(
        &self,
        country: Country,
    ) -> CountryData {
        CountryData {
            country,
            salary_bands: self
                .salary_bands
                .iter()
                .filter(|b| b.country == country)
                .cloned()
                .collect(),
            tax_rules: self
                .tax_rules
                .iter()
                .filter(|r| r.country == country)
                .cloned()
                .collect(),
            cost_of_living: self
                .cost_of_living
                .iter()
                .filter(|r| r.country == country)
                .cloned()
                .collect(),
            migration_costs: self
                .migration_costs
                .iter()
                .find(|m| m.country == country)
                .cloned()
                .unwrap_or_else(|| MigrationCosts::empty(country)),
        }
    }

    /// Per-country records for every supported destination, in comparison order.
    pub fn destinations(&self) -> Vec<CountryData> {
        Country::DESTINATIONS
            .into_iter()
            .filter(Country::is_supported)
            .map(|c| self.for_country(c))
            .collect()
    }

    /// Reports, without rejecting, data that will make results less useful.
    /// Each warning is also logged.
    pub fn validate(&self) -> Vec<DataWarning> {
        let mut warnings = Vec::new();

        for country in Country::DESTINATIONS.into_iter().filter(Country::is_supported) {
            // The UAE levies no income tax and needs no rules.
            if country != Country::Uae && !self.tax_rules.iter().any(|r| r.country == country) {
                warnings.push(DataWarning::MissingTaxRules(country));
            }
            if self.fallback_rates.get(country.currency()).is_none() {
                warnings.push(DataWarning::MissingFallbackRate(country));
            }
        }

        warnings.extend(
            self.cost_of_living
                .iter()
                .filter(|r| !r.is_consistent())
                .map(|r| DataWarning::CostTotalMismatch {
                    country: r.country,
                    city: r.city.clone(),
                    lifestyle: r.lifestyle,
                    rent_type: r.rent_type,
                    itemized: r.itemized_total(),
                    total: r.total_monthly_cost,
                }),
        );

        warnings.extend(
            self.salary_bands
                .iter()
                .filter(|b| !b.is_ordered())
                .map(|b| DataWarning::UnorderedBand {
                    country: b.country,
                    career_stage: b.career_stage.clone(),
                    sector: b.sector.clone(),
                }),
        );

        for warning in &warnings {
            warn!("{warning}");
        }
        warnings
    }
}
