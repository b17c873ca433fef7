//! Alpha Vantage API client
//!
//! Only the `OVERVIEW` endpoint is used; it carries the valuation and
//! profitability ratios behind the fundamentals snapshot.

use super::InfoMap;
use crate::error::{Result, StockError};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Get the company overview as a raw key/value map
    #[instrument(skip(self))]
    pub async fn get_company_overview(&self, symbol: &str) -> Result<InfoMap> {
        let params = [
            ("function", "OVERVIEW"),
            ("symbol", symbol),
            ("apikey", self.api_key.as_str()),
        ];

        let response = self.client.get(&self.base_url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(StockError::Provider(format!(
                "Alpha Vantage HTTP error: {}",
                response.status()
            )));
        }

        let data: Value = response.json().await?;
        let overview = parse_overview(symbol, data)?;
        debug!("Alpha Vantage overview returned {} fields", overview.len());

        Ok(overview)
    }
}

/// Unwrap an overview payload, mapping API-level errors to provider errors
fn parse_overview(symbol: &str, data: Value) -> Result<InfoMap> {
    let Value::Object(map) = data else {
        return Err(StockError::Provider(
            "Alpha Vantage returned a non-object overview".to_string(),
        ));
    };

    if let Some(error) = map.get("Error Message") {
        return Err(StockError::Provider(format!("Alpha Vantage: {error}")));
    }

    // "Note" and "Information" carry rate-limit and quota notices
    if let Some(note) = map.get("Note").or_else(|| map.get("Information")) {
        return Err(StockError::Provider(format!("Alpha Vantage: {note}")));
    }

    if map.is_empty() {
        return Err(StockError::Provider(format!(
            "Alpha Vantage has no overview for {symbol}"
        )));
    }

    Ok(map)
}
