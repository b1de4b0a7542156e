//! Exchange-rate resolution.
//!
//! A [`RateSource`] supplies live rates to INR. [`resolve_rates`] asks it for
//! every currency concurrently, bounds each request with a timeout, and
//! replaces any failure with the bundled fallback rate. Resolution itself never
//! fails: a currency with neither a live nor a fallback rate is simply absent,
//! and [`ExchangeRates::to_inr`] reports zero for it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::models::{Currency, ExchangeRate, ExchangeRates};

#[derive(Debug, Error)]
pub enum RateError {
    #[error("no rate available for {0}")]
    Unavailable(Currency),

    #[error("rate for {currency} is not positive: {rate}")]
    NonPositive { currency: Currency, rate: Decimal },

    #[error("rate source error: {0}")]
    Source(String),

    #[error("rate request timed out after {0:?}")]
    Timeout(Duration),
}

/// Where live exchange rates come from.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Short identifier used in log output.
    fn name(&self) -> &'static str;

    /// Units of INR per one unit of `currency`.
    async fn fetch(
        &self,
        currency: Currency,
    ) -> Result<Decimal, RateError>;
}

/// Serves rates from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticRateSource {
    rates: HashMap<Currency, Decimal>,
}

impl StaticRateSource {
    pub fn new(rates: impl IntoIterator<Item = (Currency, Decimal)>) -> Self {
        Self {
            rates: rates.into_iter().collect(),
        }
    }
}

impl From<&ExchangeRates> for StaticRateSource {
    fn from(rates: &ExchangeRates) -> Self {
        Self::new(rates.iter().map(|r| (r.currency, r.rate_to_inr)))
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(
        &self,
        currency: Currency,
    ) -> Result<Decimal, RateError> {
        self.rates
            .get(&currency)
            .copied()
            .ok_or(RateError::Unavailable(currency))
    }
}

/// Resolves a rate for each of `currencies`, live where possible.
///
/// One task per currency runs on a [`JoinSet`]; each is cut off after
/// `timeout`. Live rates are dated today. Anything that fails, times out or
/// returns a non-positive rate falls back to the entry in `fallbacks`. INR is
/// never fetched and always resolves to 1.
pub async fn resolve_rates(
    source: Arc<dyn RateSource>,
    fallbacks: &ExchangeRates,
    currencies: &[Currency],
    timeout: Duration,
) -> ExchangeRates {
    let today = Utc::now().date_naive();
    let mut resolved = ExchangeRates::new();
    resolved.insert(ExchangeRate {
        currency: Currency::Inr,
        rate_to_inr: Decimal::ONE,
        is_live: false,
        as_of: today,
    });

    let mut tasks = JoinSet::new();
    for &currency in currencies.iter().filter(|c| **c != Currency::Inr) {
        let source = Arc::clone(&source);
        tasks.spawn(async move {
            let outcome = match tokio::time::timeout(timeout, source.fetch(currency)).await {
                Ok(Ok(rate)) if rate > Decimal::ZERO => Ok(rate),
                Ok(Ok(rate)) => Err(RateError::NonPositive { currency, rate }),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(RateError::Timeout(timeout)),
            };
            (currency, outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((currency, Ok(rate))) => {
                debug!(source = source.name(), %currency, %rate, "live rate resolved");
                resolved.insert(ExchangeRate {
                    currency,
                    rate_to_inr: rate,
                    is_live: true,
                    as_of: today,
                });
            }
            Ok((currency, Err(e))) => {
                warn!(
                    source = source.name(),
                    %currency,
                    error = %e,
                    "live rate unavailable; using fallback"
                );
            }
            Err(e) => warn!(error = %e, "rate task failed; using fallback"),
        }
    }

    for &currency in currencies {
        if resolved.get(currency).is_some() {
            continue;
        }
        match fallbacks.get(currency) {
            Some(fallback) => resolved.insert(ExchangeRate {
                is_live: false,
                ..fallback.clone()
            }),
            None => warn!(%currency, "no fallback rate; amounts in this currency convert to zero"),
        }
    }

    resolved
}
