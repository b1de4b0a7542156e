use rust_decimal::Decimal;

use super::{BreakdownBuilder, TaxJurisdiction, TaxOptions, sanitize_gross};
use crate::models::{Country, TaxBreakdown, TaxRule};

/// United Arab Emirates: no personal income tax, so net pay is gross pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Uae;

impl TaxJurisdiction for Uae {
    fn country(&self) -> Country {
        Country::Uae
    }

    fn compute(
        &self,
        gross: Decimal,
        _rules: &[TaxRule],
        _options: &TaxOptions,
    ) -> TaxBreakdown {
        let gross = sanitize_gross(Country::Uae, gross);
        BreakdownBuilder::new(Country::Uae, gross).build()
    }
}
