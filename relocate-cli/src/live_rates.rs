//! Live exchange rates over HTTP.
//!
//! The endpoint is queried as `GET {endpoint}/{CODE}` and must answer with a
//! JSON body carrying an INR quote in a `rates` map:
//!
//! ```json
//! { "result": "success", "rates": { "INR": 107.42, "USD": 1.27 } }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use relocate_core::{Currency, RateError, RateSource};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    rates: HashMap<String, Decimal>,
}

/// Extracts the INR quote from a response body.
fn inr_rate(
    currency: Currency,
    body: &str,
) -> Result<Decimal, RateError> {
    let response: LatestRatesResponse =
        serde_json::from_str(body).map_err(|e| RateError::Source(format!("bad response: {e}")))?;

    match response.result.as_deref() {
        None | Some("success") => {}
        Some(other) => return Err(RateError::Source(format!("endpoint reported '{other}'"))),
    }

    response
        .rates
        .get(Currency::Inr.as_str())
        .copied()
        .ok_or(RateError::Unavailable(currency))
}

pub struct HttpRateSource {
    client: Client,
    endpoint: String,
}

impl HttpRateSource {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RateError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RateError::Source(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn url(
        &self,
        currency: Currency,
    ) -> String {
        format!("{}/{}", self.endpoint, currency.as_str())
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(
        &self,
        currency: Currency,
    ) -> Result<Decimal, RateError> {
        let url = self.url(currency);
        debug!(%url, "fetching live rate");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateError::Source(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::Source(format!("{url} returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RateError::Source(e.to_string()))?;
        inr_rate(currency, &body)
    }
}
