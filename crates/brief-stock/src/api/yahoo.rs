//! Yahoo Finance API client

use crate::error::{Result, StockError};
use crate::models::{Period, PricePoint, PriceSeries};
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
#[derive(Debug, Clone, Default)]
pub struct YahooFinanceClient {}

/// Daily bar reduced to what the pipeline reads
#[derive(Debug, Clone, Copy)]
struct Bar {
    timestamp: DateTime<Utc>,
    close: f64,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    async fn bars(&self, symbol: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Bar>> {
        let provider = yahoo::YahooConnector::new().map_err(|e| StockError::Provider(e.to_string()))?;

        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| StockError::Provider(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| StockError::Provider(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| StockError::Provider(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| StockError::Provider(e.to_string()))?;

        Ok(quotes
            .iter()
            .filter_map(|q| {
                let secs = i64::try_from(q.timestamp).ok()?;
                Some(Bar {
                    timestamp: DateTime::from_timestamp(secs, 0)?,
                    close: q.close,
                })
            })
            .collect())
    }

    /// Daily close series for a lookback period ending now
    #[instrument(skip(self))]
    pub async fn get_history(&self, symbol: &str, period: Period) -> Result<PriceSeries> {
        let end = Utc::now();
        let bars = self.bars(symbol, period.start_from(end), end).await?;

        debug!("Yahoo returned {} bars", bars.len());

        Ok(bars_to_series(&bars))
    }
}

/// One point per trading day; bars without a finite close are dropped
fn bars_to_series(bars: &[Bar]) -> PriceSeries {
    bars.iter()
        .filter(|q| q.close.is_finite())
        .map(|q| PricePoint::new(q.timestamp.date_naive(), q.close))
        .collect()
}
