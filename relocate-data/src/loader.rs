//! CSV readers for the source tables.
//!
//! Every file is headered; headers are matched by name so column order does
//! not matter. Values are trimmed and the column count is strict. Empty cells
//! in optional columns (`region`, `bracket_upper`, `notes`) read as absent.
//!
//! | File                   | Columns |
//! |------------------------|---------|
//! | `salary_bands.csv`     | `country,career_stage,sector,gross_annual_min,gross_annual_typical,gross_annual_max,currency,is_estimate,notes` |
//! | `tax_rules.csv`        | `country,region,tax_type,bracket_lower,bracket_upper,rate_percent,is_estimate` |
//! | `cost_of_living.csv`   | `country,city,lifestyle,rent_type,rent,utilities,transport,groceries,school_fees,dining,healthcare,misc,total_monthly_cost` |
//! | `migration_costs.csv`  | `country,category,item,amount_inr` |
//! | `migration_totals.csv` | `country,total_min,total_typical,total_max` |
//! | `exchange_rates.csv`   | `currency,rate_to_inr,as_of` (`as_of` is `YYYY-MM-DD`) |
//!
//! Closed-set cells (country, currency, tax type, lifestyle, rent type,
//! category, flags) that do not parse are reported with their 1-based row.

use std::io::Read;

use chrono::NaiveDate;
use relocate_core::{
    CostOfLivingRow, Country, Currency, ExchangeRate, ExchangeRates, LifestyleLevel,
    MigrationCostCategory, MigrationCostItem, MigrationCosts, RentType, SalaryBand, TaxRule,
    TaxType,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// Serde-compatible rows that mirror the CSV layouts exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SalaryBandRow {
    country: String,
    career_stage: String,
    sector: String,
    gross_annual_min: Decimal,
    gross_annual_typical: Decimal,
    gross_annual_max: Decimal,
    currency: String,
    is_estimate: String,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaxRuleRow {
    country: String,
    region: Option<String>,
    tax_type: String,
    bracket_lower: Decimal,
    bracket_upper: Option<Decimal>,
    rate_percent: Decimal,
    is_estimate: String,
}

#[derive(Debug, Deserialize)]
struct CostOfLivingCsvRow {
    country: String,
    city: String,
    lifestyle: String,
    rent_type: String,
    rent: Decimal,
    utilities: Decimal,
    transport: Decimal,
    groceries: Decimal,
    school_fees: Decimal,
    dining: Decimal,
    healthcare: Decimal,
    misc: Decimal,
    total_monthly_cost: Decimal,
}

#[derive(Debug, Deserialize)]
struct MigrationItemRow {
    country: String,
    category: String,
    item: String,
    amount_inr: Decimal,
}

#[derive(Debug, Deserialize)]
struct MigrationTotalsRow {
    country: String,
    total_min: Decimal,
    total_typical: Decimal,
    total_max: Decimal,
}

#[derive(Debug, Deserialize)]
struct ExchangeRateRow {
    currency: String,
    rate_to_inr: Decimal,
    as_of: NaiveDate,
}

// ---------------------------------------------------------------------------
// Shared plumbing
// ---------------------------------------------------------------------------

/// Deserializes every row of `reader`, handing each to `convert` with its
/// 1-based row number.
fn read_rows<R, Row, T>(
    reader: R,
    mut convert: impl FnMut(Row, usize) -> Result<T, DataLoadError>,
) -> Result<Vec<T>, DataLoadError>
where
    R: Read,
    Row: DeserializeOwned,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    csv_reader
        .deserialize::<Row>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert(row, idx + 1)
        })
        .collect()
}

fn country(
    value: &str,
    row: usize,
) -> Result<Country, DataLoadError> {
    Country::parse(value).ok_or_else(|| DataLoadError::invalid("country", value, row))
}

fn currency(
    value: &str,
    row: usize,
) -> Result<Currency, DataLoadError> {
    Currency::parse(value).ok_or_else(|| DataLoadError::invalid("currency", value, row))
}

fn flag(
    field: &'static str,
    value: &str,
    row: usize,
) -> Result<bool, DataLoadError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" | "" => Ok(false),
        _ => Err(DataLoadError::invalid(field, value, row)),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Public parsers
// ---------------------------------------------------------------------------

pub fn parse_salary_bands<R: Read>(reader: R) -> Result<Vec<SalaryBand>, DataLoadError> {
    read_rows(reader, |row: SalaryBandRow, n| {
        Ok(SalaryBand {
            country: country(&row.country, n)?,
            career_stage: row.career_stage,
            sector: row.sector,
            gross_annual_min: row.gross_annual_min,
            gross_annual_typical: row.gross_annual_typical,
            gross_annual_max: row.gross_annual_max,
            currency: currency(&row.currency, n)?,
            is_estimate: flag("is_estimate", &row.is_estimate, n)?,
            notes: non_empty(row.notes),
        })
    })
}

pub fn parse_tax_rules<R: Read>(reader: R) -> Result<Vec<TaxRule>, DataLoadError> {
    read_rows(reader, |row: TaxRuleRow, n| {
        let tax_type = TaxType::parse(&row.tax_type)
            .ok_or_else(|| DataLoadError::invalid("tax_type", &row.tax_type, n))?;
        if matches!(
            tax_type,
            TaxType::ProvincialSurtax | TaxType::ProvincialHealthPremium
        ) {
            // Derived components are computed, never read from rule rows.
            return Err(DataLoadError::invalid("tax_type", row.tax_type, n));
        }
        Ok(TaxRule {
            country: country(&row.country, n)?,
            region: non_empty(row.region).map(|r| r.to_ascii_uppercase()),
            tax_type,
            bracket_lower: row.bracket_lower,
            bracket_upper: row.bracket_upper,
            rate_percent: row.rate_percent,
            is_estimate: flag("is_estimate", &row.is_estimate, n)?,
        })
    })
}

pub fn parse_cost_of_living<R: Read>(reader: R) -> Result<Vec<CostOfLivingRow>, DataLoadError> {
    read_rows(reader, |row: CostOfLivingCsvRow, n| {
        Ok(CostOfLivingRow {
            country: country(&row.country, n)?,
            city: row.city,
            lifestyle: LifestyleLevel::parse(&row.lifestyle)
                .ok_or_else(|| DataLoadError::invalid("lifestyle", &row.lifestyle, n))?,
            rent_type: RentType::parse(&row.rent_type)
                .ok_or_else(|| DataLoadError::invalid("rent_type", &row.rent_type, n))?,
            rent: row.rent,
            utilities: row.utilities,
            transport: row.transport,
            groceries: row.groceries,
            school_fees: row.school_fees,
            dining: row.dining,
            healthcare: row.healthcare,
            misc: row.misc,
            total_monthly_cost: row.total_monthly_cost,
        })
    })
}

/// Reads migration line items and scenario totals and joins them by country.
///
/// Records come back in the order countries first appear in the totals file,
/// followed by any country that only has line items. A country without a
/// totals row keeps zero totals.
pub fn parse_migration_costs<R1: Read, R2: Read>(
    items: R1,
    totals: R2,
) -> Result<Vec<MigrationCosts>, DataLoadError> {
    let mut records: Vec<MigrationCosts> = read_rows(totals, |row: MigrationTotalsRow, n| {
        Ok(MigrationCosts {
            total_min_inr: row.total_min,
            total_typical_inr: row.total_typical,
            total_max_inr: row.total_max,
            ..MigrationCosts::empty(country(&row.country, n)?)
        })
    })?;

    let items = read_rows(items, |row: MigrationItemRow, n| {
        let item = MigrationCostItem {
            category: MigrationCostCategory::parse(&row.category)
                .ok_or_else(|| DataLoadError::invalid("category", &row.category, n))?,
            item: row.item,
            amount_inr: row.amount_inr,
        };
        Ok((country(&row.country, n)?, item))
    })?;

    for (country, item) in items {
        match records.iter_mut().find(|r| r.country == country) {
            Some(record) => record.items.push(item),
            None => {
                warn!(%country, "migration line items without scenario totals");
                let mut record = MigrationCosts::empty(country);
                record.items.push(item);
                records.push(record);
            }
        }
    }

    Ok(records)
}

pub fn parse_exchange_rates<R: Read>(reader: R) -> Result<ExchangeRates, DataLoadError> {
    let rates = read_rows(reader, |row: ExchangeRateRow, n| {
        Ok(ExchangeRate {
            currency: currency(&row.currency, n)?,
            rate_to_inr: row.rate_to_inr,
            is_live: false,
            as_of: row.as_of,
        })
    })?;
    Ok(rates.into_iter().collect())
}
