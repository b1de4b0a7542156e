use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use relocate_core::calculations::{
    ComparisonEngine, ComparisonSelection, CountryData, FigureInputs, TaxOptions, career_level,
    compute_figures, compute_tax, representative_location, stages_for,
};
use relocate_core::{
    Country, Currency, ExchangeRates, LifestyleLevel, RateSource, RentType, SalaryBand,
    SalaryPoint, StaticRateSource, resolve_rates,
};
use relocate_data::Dataset;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::Config;
use crate::live_rates::HttpRateSource;
use crate::output::{render_breakdown, render_comparison, render_stages, render_warnings};

// ─── argument parsers ────────────────────────────────────────────────────────

fn parse_country(s: &str) -> Result<Country, String> {
    Country::parse(s).ok_or_else(|| format!("unknown country '{s}'"))
}

fn parse_point(s: &str) -> Result<SalaryPoint, String> {
    SalaryPoint::parse(s).ok_or_else(|| format!("expected min, typical or max, got '{s}'"))
}

fn parse_lifestyle(s: &str) -> Result<LifestyleLevel, String> {
    LifestyleLevel::parse(s)
        .ok_or_else(|| format!("expected basic, moderate or premium, got '{s}'"))
}

fn parse_rent_type(s: &str) -> Result<RentType, String> {
    RentType::parse(s).ok_or_else(|| format!("expected shared, 1bhk or family, got '{s}'"))
}

// ─── argument sets ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TaxArgs {
    /// Country code or name (UK, AU, CA, DE, NZ, UAE).
    #[arg(long, value_parser = parse_country)]
    country: Country,

    /// Gross annual salary in local currency.
    #[arg(long)]
    gross: Decimal,

    /// Province or state code, e.g. ON or QC.
    #[arg(long)]
    region: Option<String>,

    /// Leave out the optional retirement contribution (NHS Pension, KiwiSaver).
    #[arg(long)]
    no_retirement: bool,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// The country you work in now.
    #[arg(long, value_parser = parse_country)]
    country: Country,

    /// Your career stage, as listed by `relocate stages`.
    #[arg(long)]
    stage: String,

    /// Sector of your own band; matched case-insensitively against the band's sector.
    /// The stage name is matched exactly.
    /// Defaults to the public-sector band.
    #[arg(long)]
    sector: Option<String>,

    /// Point of each salary band to use.
    #[arg(long, value_parser = parse_point, default_value = "typical")]
    point: SalaryPoint,

    /// Use this gross annual salary for your own country instead of a band.
    #[arg(long)]
    gross: Option<Decimal>,

    #[arg(long, value_parser = parse_lifestyle, default_value = "moderate")]
    lifestyle: LifestyleLevel,

    #[arg(long, value_parser = parse_rent_type, default_value = "1bhk")]
    rent_type: RentType,

    /// Your province or state, where tax depends on it.
    #[arg(long)]
    region: Option<String>,

    /// Your city; defaults to the country's representative city.
    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    no_retirement: bool,
}

#[derive(Debug, Args)]
pub struct StagesArgs {
    #[arg(long, value_parser = parse_country)]
    country: Country,
}

// ─── helpers ─────────────────────────────────────────────────────────────────

fn load_dataset(config: &Config) -> Result<Dataset> {
    Dataset::load_dir(&config.data_dir)
        .with_context(|| format!("failed to load data from {}", config.data_dir.display()))
}

/// Live rates for every destination currency, falling back to the bundled table.
async fn exchange_rates(
    config: &Config,
    dataset: &Dataset,
) -> Result<ExchangeRates> {
    let currencies: Vec<Currency> = Country::DESTINATIONS
        .into_iter()
        .filter(Country::is_supported)
        .map(|c| c.currency())
        .collect();

    let source: Arc<dyn RateSource> = if config.offline {
        info!("offline: using bundled exchange rates");
        Arc::new(StaticRateSource::from(&dataset.fallback_rates))
    } else {
        Arc::new(
            HttpRateSource::new(config.rate_endpoint.clone(), config.rate_timeout)
                .context("failed to set up live exchange rates")?,
        )
    };

    Ok(resolve_rates(source, &dataset.fallback_rates, &currencies, config.rate_timeout).await)
}

fn own_band<'d>(
    data: &'d CountryData,
    stage: &str,
    sector: Option<&str>,
) -> Option<&'d SalaryBand> {
    match sector {
        None => data.public_band(stage),
        Some(sector) => {
            let sector = sector.to_lowercase();
            data.salary_bands.iter().find(|b| {
                b.career_stage.trim() == stage.trim() && b.sector.to_lowercase().contains(&sector)
            })
        }
    }
}

fn stage_list(country: Country) -> String {
    stages_for(country)
        .iter()
        .map(|(stage, _)| *stage)
        .collect::<Vec<_>>()
        .join(", ")
}

// ─── commands ────────────────────────────────────────────────────────────────

pub fn tax(
    config: &Config,
    args: TaxArgs,
) -> Result<String> {
    let dataset = load_dataset(config)?;
    let data = dataset.for_country(args.country);

    let mut options = TaxOptions::default();
    if let Some(region) = args.region {
        options = options.with_region(region);
    }
    if args.no_retirement {
        options = options.without_retirement();
    }

    let breakdown = compute_tax(args.country, args.gross, &data.tax_rules, &options)
        .ok_or_else(|| anyhow!("no tax engine for {}", args.country))?;

    Ok(render_breakdown(&breakdown, config.format)?)
}

pub async fn compare(
    config: &Config,
    args: CompareArgs,
) -> Result<String> {
    if !args.country.is_supported() {
        bail!("{} is not a supported country", args.country);
    }
    if career_level(args.country, &args.stage).is_none() {
        warn!(
            country = %args.country,
            stage = %args.stage,
            "stage has no equivalent elsewhere; known stages: {}",
            stage_list(args.country)
        );
    }

    let dataset = load_dataset(config)?;
    let rates = exchange_rates(config, &dataset).await?;
    let destinations = dataset.destinations();
    let own = destinations
        .iter()
        .find(|d| d.country == args.country)
        .ok_or_else(|| anyhow!("no data for {}", args.country))?;

    let gross_annual = match args.gross {
        Some(gross) => gross,
        None => own_band(own, &args.stage, args.sector.as_deref())
            .map(|band| band.gross_at(args.point))
            .with_context(|| {
                format!(
                    "no {} salary band for '{}' in {}; pass --gross or pick one of: {}",
                    args.sector.as_deref().unwrap_or("public-sector"),
                    args.stage,
                    args.country,
                    stage_list(args.country)
                )
            })?,
    };

    let location = representative_location(args.country);
    let city = args
        .city
        .or_else(|| location.map(|l| l.city.to_string()))
        .unwrap_or_default();
    let region = args
        .region
        .or_else(|| location.and_then(|l| l.region).map(str::to_string));

    let include_retirement = !args.no_retirement;
    let current_figures = compute_figures(
        own,
        &rates,
        &FigureInputs {
            gross_annual,
            region: region.as_deref(),
            city: &city,
            lifestyle: args.lifestyle,
            rent_type: args.rent_type,
            include_retirement,
        },
    );

    let selection = ComparisonSelection {
        current_country: args.country,
        current_city: city,
        career_stage: args.stage,
        salary_point: args.point,
        lifestyle: args.lifestyle,
        rent_type: args.rent_type,
        include_retirement,
        current_figures,
    };

    let rows = ComparisonEngine::new(&destinations, &rates).compute_rows(&selection);
    Ok(render_comparison(&rows, config.format)?)
}

pub fn stages(
    config: &Config,
    args: StagesArgs,
) -> Result<String> {
    let stages = stages_for(args.country);
    if stages.is_empty() {
        bail!("no career stages are mapped for {}", args.country);
    }
    Ok(render_stages(args.country, stages, config.format)?)
}

pub fn validate(config: &Config) -> Result<String> {
    let dataset = load_dataset(config)?;
    Ok(render_warnings(&dataset.validate(), config.format)?)
}
