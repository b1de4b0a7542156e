//! Plain-text tables and JSON for each command's result.

use std::fmt::Write as _;

use clap::ValueEnum;
use relocate_core::calculations::{CareerLevel, ComparisonRow};
use relocate_core::{Country, TaxBreakdown};
use relocate_data::DataWarning;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Whole units with thousands separators: `-1234567.6` becomes `-1,234,568`.
pub fn format_amount(value: Decimal) -> String {
    let rounded = relocate_core::calculations::common::round_currency(value);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn render_breakdown(
    breakdown: &TaxBreakdown,
    format: OutputFormat,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(breakdown);
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) gross {}",
        breakdown.country,
        breakdown.currency,
        format_amount(breakdown.gross_annual)
    );
    for line in &breakdown.deductions {
        let _ = writeln!(
            out,
            "  {:<28}{:>12}",
            line.kind.label(),
            format_amount(line.amount)
        );
    }
    let _ = writeln!(
        out,
        "  {:<28}{:>12}",
        "Total deductions",
        format_amount(breakdown.total_deductions)
    );
    let _ = writeln!(out, "  {:<28}{:>12}", "Net annual", format_amount(breakdown.net_annual));
    let _ = writeln!(out, "  {:<28}{:>12}", "Net monthly", format_amount(breakdown.net_monthly));
    let _ = writeln!(out, "  {:<28}{:>11}%", "Effective rate", breakdown.effective_tax_rate);
    for line in &breakdown.employer_contributions {
        let _ = writeln!(
            out,
            "  {:<28}{:>12}",
            format!("{} (employer)", line.kind.label()),
            format_amount(line.amount)
        );
    }
    for advisory in &breakdown.advisories {
        let _ = writeln!(out, "Note: {}", advisory.message());
    }
    Ok(out)
}

pub fn render_comparison(
    rows: &[ComparisonRow],
    format: OutputFormat,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(rows);
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16}{:<26}{:<11}{:>13}{:>13}{:>16}{:>11}  {}",
        "Country", "Stage", "City", "Net/mo", "Cost/mo", "Savings INR/mo", "Recovery", "Badge"
    );
    for row in rows {
        let name = if row.is_current_country {
            format!("{} *", row.country)
        } else {
            row.country.to_string()
        };
        let Some(figures) = &row.figures else {
            let _ = writeln!(out, "{name:<16}not available");
            continue;
        };
        let _ = writeln!(
            out,
            "{:<16}{:<26}{:<11}{:>13}{:>13}{:>16}{:>11}  {}",
            name,
            row.career_stage.as_deref().unwrap_or("-"),
            row.city.as_deref().unwrap_or("-"),
            format!("{} {}", format_amount(figures.breakdown.net_monthly), row.currency),
            format!("{} {}", format_amount(figures.monthly_cost_local), row.currency),
            format_amount(figures.savings.monthly_savings_inr),
            figures.savings.recovery.typical.to_string(),
            row.badge.map(|b| b.label()).unwrap_or("")
        );
    }
    let _ = writeln!(out, "* current country");
    Ok(out)
}

#[derive(Debug, Serialize)]
struct StageView<'a> {
    stage: &'a str,
    level: &'a str,
}

#[derive(Debug, Serialize)]
struct StagesView<'a> {
    country: Country,
    stages: Vec<StageView<'a>>,
}

pub fn render_stages(
    country: Country,
    stages: &[(&str, CareerLevel)],
    format: OutputFormat,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        let view = StagesView {
            country,
            stages: stages
                .iter()
                .map(|(stage, level)| StageView {
                    stage,
                    level: level.label(),
                })
                .collect(),
        };
        return serde_json::to_string_pretty(&view);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{country}");
    for (stage, level) in stages {
        let _ = writeln!(out, "  {stage:<28}{level}");
    }
    Ok(out)
}

pub fn render_warnings(
    warnings: &[DataWarning],
    format: OutputFormat,
) -> serde_json::Result<String> {
    let messages: Vec<String> = warnings.iter().map(ToString::to_string).collect();
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(&messages);
    }
    if messages.is_empty() {
        return Ok("data OK: no problems found\n".to_string());
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} problem(s) found:", messages.len());
    for message in messages {
        let _ = writeln!(out, "  - {message}");
    }
    Ok(out)
}
