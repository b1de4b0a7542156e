use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Currency;

/// Conversion rate from one unit of `currency` to INR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub currency: Currency,
    pub rate_to_inr: Decimal,
    /// `false` when the value came from the static fallback table.
    pub is_live: bool,
    pub as_of: NaiveDate,
}

/// Resolved rates keyed by currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRates {
    rates: BTreeMap<Currency, ExchangeRate>,
}

impl ExchangeRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        rate: ExchangeRate,
    ) {
        self.rates.insert(rate.currency, rate);
    }

    pub fn get(
        &self,
        currency: Currency,
    ) -> Option<&ExchangeRate> {
        self.rates.get(&currency)
    }

    /// Rate to INR, `1` for INR itself and `0` for an unknown currency.
    ///
    /// A zero rate makes every converted saving zero, which the savings
    /// calculator treats as "not saving" rather than failing.
    pub fn to_inr(
        &self,
        currency: Currency,
    ) -> Decimal {
        if currency == Currency::Inr {
            return Decimal::ONE;
        }
        self.rates
            .get(&currency)
            .map_or(Decimal::ZERO, |r| r.rate_to_inr)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExchangeRate> {
        self.rates.values()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<ExchangeRate> for ExchangeRates {
    fn from_iter<I: IntoIterator<Item = ExchangeRate>>(iter: I) -> Self {
        let mut rates = Self::new();
        for rate in iter {
            rates.insert(rate);
        }
        rates
    }
}
