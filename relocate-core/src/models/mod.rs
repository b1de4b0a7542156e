mod cost_of_living;
mod country;
mod exchange_rate;
mod migration_costs;
mod salary_band;
mod tax_breakdown;
mod tax_rule;

pub use cost_of_living::{CostOfLivingRow, LifestyleLevel, RentType, find_cost_row};
pub use country::{Country, Currency};
pub use exchange_rate::{ExchangeRate, ExchangeRates};
pub use migration_costs::{MigrationCostCategory, MigrationCostItem, MigrationCosts};
pub use salary_band::{SalaryBand, SalaryPoint};
pub use tax_breakdown::{DeductionLine, TaxAdvisory, TaxBreakdown};
pub use tax_rule::{TaxRule, TaxType};
