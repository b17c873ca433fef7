//! Price history retrieval with bounded retry
//!
//! Every component that needs price history goes through
//! [`PriceHistoryFetcher`], so the retry and timeout policy is applied
//! uniformly. An attempt fails when the provider errors, times out, or
//! returns an empty series; the fetcher then waits a fixed backoff and tries
//! again, up to `max_retries` attempts in total.

use crate::api::MarketDataProvider;
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::models::{Period, PriceSeries};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, instrument, warn};

/// Retry policy for price history retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts
    pub max_retries: u32,

    /// Fixed wait between attempts
    pub backoff: Duration,

    /// Upper bound on a single provider call
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_secs(1),
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &StockConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff: config.retry_backoff,
            attempt_timeout: config.request_timeout,
        }
    }
}

/// Sole entry point for price history
#[derive(Clone)]
pub struct PriceHistoryFetcher {
    provider: Arc<dyn MarketDataProvider>,
    policy: RetryPolicy,
    period: Period,
}

impl PriceHistoryFetcher {
    pub fn new(provider: Arc<dyn MarketDataProvider>, policy: RetryPolicy, period: Period) -> Self {
        Self {
            provider,
            policy,
            period,
        }
    }

    /// Fetch with the configured period and retry count
    pub async fn history(&self, ticker: &str) -> Result<PriceSeries> {
        self.fetch(ticker, self.period, self.policy.max_retries).await
    }

    /// Latest close, routed through the retrying fetch
    pub async fn latest_price(&self, ticker: &str) -> Result<f64> {
        let series = self.history(ticker).await?;
        series
            .latest()
            .map(|p| p.close)
            .ok_or_else(|| StockError::DataUnavailable {
                symbol: ticker.to_string(),
                attempts: self.policy.max_retries,
                reason: format!("No price data available for {ticker}"),
            })
    }

    /// Fetch a non-empty series, trying up to `max_retries` times
    #[instrument(skip(self))]
    pub async fn fetch(&self, ticker: &str, period: Period, max_retries: u32) -> Result<PriceSeries> {
        let mut last_error: Option<StockError> = None;

        for attempt in 1..=max_retries {
            debug!("Fetching history attempt {}/{}", attempt, max_retries);

            let outcome = match timeout(
                self.policy.attempt_timeout,
                self.provider.get_history(ticker, period),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(StockError::Provider(format!(
                    "request timed out after {:?}",
                    self.policy.attempt_timeout
                ))),
            };

            match outcome {
                Ok(series) if !series.is_empty() => {
                    if attempt > 1 {
                        debug!("History for {} succeeded after {} retries", ticker, attempt - 1);
                    }
                    return Ok(series);
                }
                Ok(_) => {
                    warn!("Empty history for {} (attempt {}/{})", ticker, attempt, max_retries);
                }
                Err(e) => {
                    if attempt == max_retries {
                        return Err(StockError::DataUnavailable {
                            symbol: ticker.to_string(),
                            attempts: max_retries,
                            reason: format!(
                                "Failed to fetch data for {ticker} after {max_retries} attempts: {e}"
                            ),
                        });
                    }
                    warn!(
                        "History fetch for {} failed (attempt {}/{}): {}",
                        ticker, attempt, max_retries, e
                    );
                    last_error = Some(e);
                }
            }

            if attempt < max_retries {
                sleep(self.policy.backoff).await;
            }
        }

        let reason = match last_error {
            Some(e) => format!("No data available for {ticker} (last error: {e})"),
            None => format!("No data available for {ticker}"),
        };

        Err(StockError::DataUnavailable {
            symbol: ticker.to_string(),
            attempts: max_retries,
            reason,
        })
    }
}
