//! Configuration for stock brief operations

use crate::error::{Result, StockError};
use crate::indicators::{MAX_WINDOW, check_window};
use crate::models::Period;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TICKERS_PATH: &str = "data/company_tickers.json";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for stock brief operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Ticker reference dataset (SEC `company_tickers.json` shape)
    pub tickers_path: PathBuf,

    /// Price history lookback
    pub period: Period,

    /// Maximum number of attempts for price history retrieval
    pub max_retries: u32,

    /// Fixed wait between retrieval attempts
    pub retry_backoff: Duration,

    /// Upper bound on a single provider call
    pub request_timeout: Duration,

    /// SMA/EMA window used when the caller does not pass one
    pub default_window: usize,

    /// Alpha Vantage API key (optional, enables fundamentals)
    pub alpha_vantage_api_key: Option<String>,

    /// Text-generation model for narrative reports
    pub model: String,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            tickers_path: PathBuf::from(DEFAULT_TICKERS_PATH),
            period: Period::OneYear,
            max_retries: 3,
            retry_backoff: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            default_window: 14,
            alpha_vantage_api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(StockError::ConfigError(
                "max_retries must be greater than 0".to_string(),
            ));
        }

        if check_window(self.default_window).is_err() {
            return Err(StockError::ConfigError(format!(
                "default_window must be between 1 and {MAX_WINDOW}"
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(StockError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(StockError::ConfigError("model must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    tickers_path: Option<PathBuf>,
    period: Option<Period>,
    max_retries: Option<u32>,
    retry_backoff: Option<Duration>,
    request_timeout: Option<Duration>,
    default_window: Option<usize>,
    alpha_vantage_api_key: Option<String>,
    model: Option<String>,
}

impl StockConfigBuilder {
    /// Set the ticker reference dataset path
    pub fn tickers_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tickers_path = Some(path.into());
        self
    }

    /// Set the price history lookback
    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    /// Set maximum retrieval attempts
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the wait between retrieval attempts
    pub fn retry_backoff(mut self, duration: Duration) -> Self {
        self.retry_backoff = Some(duration);
        self
    }

    /// Set the per-call timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the default SMA/EMA window
    pub fn default_window(mut self, window: usize) -> Self {
        self.default_window = Some(window);
        self
    }

    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set the text-generation model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Load Alpha Vantage API key from `ALPHA_VANTAGE_API_KEY`
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            if !key.trim().is_empty() {
                self.alpha_vantage_api_key = Some(key);
            }
        }
        self
    }

    /// Load the text-generation model from `BRIEF_MODEL`
    pub fn from_env_model(mut self) -> Self {
        if let Ok(model) = std::env::var("BRIEF_MODEL") {
            if !model.trim().is_empty() {
                self.model = Some(model);
            }
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            tickers_path: self.tickers_path.unwrap_or(defaults.tickers_path),
            period: self.period.unwrap_or(defaults.period),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff: self.retry_backoff.unwrap_or(defaults.retry_backoff),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            default_window: self.default_window.unwrap_or(defaults.default_window),
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            model: self.model.unwrap_or(defaults.model),
        };

        config.validate()?;
        Ok(config)
    }
}
