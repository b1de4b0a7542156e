//! Loading of the estimator's source tables from CSV.

mod dataset;
mod error;
mod loader;

pub use dataset::{
    COST_OF_LIVING_FILE, DataWarning, Dataset, EXCHANGE_RATES_FILE, MIGRATION_COSTS_FILE,
    MIGRATION_TOTALS_FILE, SALARY_BANDS_FILE, TAX_RULES_FILE,
};
pub use error::DataLoadError;
pub use loader::{
    parse_cost_of_living, parse_exchange_rates, parse_migration_costs, parse_salary_bands,
    parse_tax_rules,
};
