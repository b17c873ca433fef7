//! Market-data provider clients
//!
//! [`MarketDataProvider`] is the seam between the pipeline and the outside
//! world. Only the price history fetcher and the fundamentals fetcher call
//! it, so retry and timeout policy live in one place.

pub mod alpha_vantage;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageClient;
pub use yahoo::YahooFinanceClient;

use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::models::{Period, PriceSeries};
use async_trait::async_trait;

/// Raw key/value company information as returned by the provider
pub type InfoMap = serde_json::Map<String, serde_json::Value>;

/// External market-data provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily closes for `ticker` over `period`; may be empty
    async fn get_history(&self, ticker: &str, period: Period) -> Result<PriceSeries>;

    /// Company overview fields (valuation and profitability ratios)
    async fn get_info(&self, ticker: &str) -> Result<InfoMap>;
}

/// Production provider: Yahoo Finance for prices, Alpha Vantage for ratios
#[derive(Debug, Clone)]
pub struct MarketData {
    yahoo: YahooFinanceClient,
    alpha_vantage: Option<AlphaVantageClient>,
}

impl MarketData {
    pub fn new(yahoo: YahooFinanceClient, alpha_vantage: Option<AlphaVantageClient>) -> Self {
        Self {
            yahoo,
            alpha_vantage,
        }
    }

    /// Build from configuration; fundamentals need an Alpha Vantage key
    pub fn from_config(config: &StockConfig) -> Result<Self> {
        let alpha_vantage = config
            .alpha_vantage_api_key
            .as_ref()
            .map(|key| AlphaVantageClient::new(key.clone(), config.request_timeout))
            .transpose()?;

        Ok(Self::new(YahooFinanceClient::new(), alpha_vantage))
    }
}

#[async_trait]
impl MarketDataProvider for MarketData {
    async fn get_history(&self, ticker: &str, period: Period) -> Result<PriceSeries> {
        self.yahoo.get_history(ticker, period).await
    }

    async fn get_info(&self, ticker: &str) -> Result<InfoMap> {
        match &self.alpha_vantage {
            Some(client) => client.get_company_overview(ticker).await,
            None => Err(StockError::ConfigError(
                "Alpha Vantage API key required for fundamental data".to_string(),
            )),
        }
    }
}
