//! Take-home pay, savings and cross-country comparison.
//!
//! Everything in this module is synchronous and fail-soft: missing rule rows,
//! cost rows or exchange rates produce zeros rather than errors.

pub mod career;
pub mod common;
pub mod comparison;
pub mod jurisdictions;
pub mod savings;

pub use career::{CareerLevel, career_level, find_equivalent_stage, stages_for};
pub use comparison::{
    ComparisonBadge, ComparisonEngine, ComparisonFigures, ComparisonRow, ComparisonSelection,
    CountryData, FigureInputs, RepresentativeLocation, compute_figures, representative_location,
};
pub use jurisdictions::{Jurisdiction, TaxJurisdiction, TaxOptions, compute_tax};
pub use savings::{Recovery, RecoveryMonths, SavingsResult, compute_savings};
