//! Error types for stock brief operations

use thiserror::Error;

/// Stock brief specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Company name or ticker could not be resolved
    #[error("Could not find ticker for input: '{0}'. Please try a valid company name or ticker.")]
    NotFound(String),

    /// No usable price series after all retries; `reason` is the user-facing message
    #[error("{reason}")]
    DataUnavailable {
        symbol: String,
        attempts: u32,
        reason: String,
    },

    /// SMA/EMA window outside the accepted range
    #[error("Invalid window: {0} (must be between 1 and {max})", max = crate::indicators::MAX_WINDOW)]
    InvalidWindow(usize),

    /// Unknown history period
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Market-data provider failure (Yahoo Finance, Alpha Vantage)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the ticker reference file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    IndicatorError(String),

    /// Text generation failed
    #[error("Report generation failed: {0}")]
    Generation(#[from] brief_llm::LLMError),

    /// Prompt template error
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

impl From<minijinja::Error> for StockError {
    fn from(err: minijinja::Error) -> Self {
        StockError::Template(err.to_string())
    }
}
