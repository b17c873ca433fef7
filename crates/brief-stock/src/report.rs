//! Response payloads and their assembly
//!
//! Field names here are the wire contract consumed by the presentation layer:
//! `metrics_data.valuation_and_profitability.*`,
//! `metrics_data.technical_indicators.*` and `chart_data[].{Date,Close,SMA,EMA}`.

use crate::error::{Result, StockError};
use crate::fundamentals::FundamentalsSnapshot;
use crate::indicators::{IndicatorSet, ema_series, sma_series};
use crate::models::PriceSeries;
use crate::narrative::NarrativeWriter;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

/// One chart row: close with the rolling SMA/EMA at that day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Close")]
    pub close: f64,
    /// `None` until the SMA window is full
    #[serde(rename = "SMA")]
    pub sma: Option<f64>,
    #[serde(rename = "EMA")]
    pub ema: f64,
}

/// Indicator block of the metrics payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TechnicalIndicators {
    pub window: usize,
    pub sma: f64,
    pub ema: f64,
    pub rsi: f64,
    pub macd_line: f64,
    pub signal_line: f64,
    pub macd_histogram: f64,
}

impl From<&IndicatorSet> for TechnicalIndicators {
    fn from(set: &IndicatorSet) -> Self {
        Self {
            window: set.window,
            sma: set.sma,
            ema: set.ema,
            rsi: set.rsi,
            macd_line: set.macd_line,
            signal_line: set.signal_line,
            macd_histogram: set.macd_histogram,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsData {
    pub valuation_and_profitability: FundamentalsSnapshot,
    pub technical_indicators: TechnicalIndicators,
}

/// Structured metrics for one ticker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsPayload {
    pub ticker: String,
    pub price: f64,
    pub metrics_data: MetricsData,
    pub chart_data: Vec<ChartPoint>,
}

/// Narrative report for one ticker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPayload {
    pub report: String,
    pub chart_data: Vec<ChartPoint>,
    pub ticker: String,
    pub price: f64,
}

/// Per-request result: a payload or a human-readable failure
///
/// Serializes as `{"success": true, ...payload}` or
/// `{"success": false, "error": message}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure { message: String },
}

impl<T> Outcome<T> {
    pub fn failure(message: impl fmt::Display) -> Self {
        Self::Failure {
            message: message.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { message } => Some(message),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(payload) => Self::Success(payload),
            Err(e) => Self::failure(e),
        }
    }
}

#[derive(Serialize)]
struct SuccessEnvelope<'a, T> {
    success: bool,
    #[serde(flatten)]
    payload: &'a T,
}

#[derive(Serialize)]
struct FailureEnvelope<'a> {
    success: bool,
    error: &'a str,
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Success(payload) => SuccessEnvelope {
                success: true,
                payload,
            }
            .serialize(serializer),
            Self::Failure { message } => FailureEnvelope {
                success: false,
                error: message,
            }
            .serialize(serializer),
        }
    }
}

/// Builds metrics and report payloads from computed inputs
#[derive(Clone, Default)]
pub struct ReportAssembler {
    writer: Option<NarrativeWriter>,
}

impl ReportAssembler {
    pub fn new(writer: Option<NarrativeWriter>) -> Self {
        Self { writer }
    }

    pub fn has_writer(&self) -> bool {
        self.writer.is_some()
    }

    /// Rolling SMA/EMA recomputed at every point of the series
    pub fn chart_series(series: &PriceSeries, window: usize) -> Result<Vec<ChartPoint>> {
        let closes = series.closes();
        let sma = sma_series(&closes, window)?;
        let ema = ema_series(&closes, window)?;

        Ok(series
            .points()
            .iter()
            .zip(sma.into_iter().zip(ema))
            .map(|(point, (sma, ema))| ChartPoint {
                date: point.date.format("%Y-%m-%d").to_string(),
                close: point.close,
                sma: sma.is_finite().then_some(sma),
                ema,
            })
            .collect())
    }

    /// Metrics payload; `indicators` are rounded here
    pub fn assemble(
        &self,
        ticker: &str,
        indicators: &IndicatorSet,
        fundamentals: FundamentalsSnapshot,
        series: &PriceSeries,
        window: usize,
    ) -> Result<MetricsPayload> {
        let rounded = indicators.rounded();
        let chart_data = Self::chart_series(series, window)?;
        debug!("Assembled metrics for {} ({} chart points)", ticker, chart_data.len());

        Ok(MetricsPayload {
            ticker: ticker.to_string(),
            price: rounded.price,
            metrics_data: MetricsData {
                valuation_and_profitability: fundamentals,
                technical_indicators: TechnicalIndicators::from(&rounded),
            },
            chart_data,
        })
    }

    /// Narrative report payload, delegating the prose to the writer
    pub async fn narrate(
        &self,
        ticker: &str,
        indicators: &IndicatorSet,
        fundamentals: &FundamentalsSnapshot,
        series: &PriceSeries,
        window: usize,
    ) -> Result<ReportPayload> {
        let writer = self.writer.as_ref().ok_or_else(|| {
            StockError::ConfigError("Text generation is not configured".to_string())
        })?;

        let rounded = indicators.rounded();
        let chart_data = Self::chart_series(series, window)?;
        let report = writer.write(ticker, &rounded, fundamentals).await?;

        Ok(ReportPayload {
            report,
            chart_data,
            ticker: ticker.to_string(),
            price: rounded.price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fundamentals::Ratio;
    use crate::models::PricePoint;
    use chrono::NaiveDate;

    fn series() -> PriceSeries {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        PriceSeries::new(vec![
            PricePoint::new(day(4), 10.0),
            PricePoint::new(day(5), 11.0),
            PricePoint::new(day(6), 12.0),
            PricePoint::new(day(7), 13.0),
        ])
    }

    #[test]
    fn test_chart_series() {
        let chart = ReportAssembler::chart_series(&series(), 3).unwrap();

        assert_eq!(chart.len(), 4);
        assert_eq!(chart[0].date, "2024-03-04");
        assert_eq!(chart[0].sma, None);
        assert_eq!(chart[1].sma, None);
        assert_eq!(chart[2].sma, Some(11.0));
        assert_eq!(chart[3].sma, Some(12.0));
        assert_eq!(chart[0].ema, 10.0);
        assert_eq!(chart[1].ema, 10.5);

        let json = serde_json::to_value(&chart[0]).unwrap();
        assert_eq!(json["Date"], "2024-03-04");
        assert_eq!(json["Close"], 10.0);
        assert!(json["SMA"].is_null());
        assert_eq!(json["EMA"], 10.0);
    }

    #[test]
    fn test_assemble_metrics_shape() {
        let series = series();
        let indicators = IndicatorSet::compute(&series, 3).unwrap();
        let fundamentals = FundamentalsSnapshot {
            pe_ratio: Ratio::Value(29.5),
            ..Default::default()
        };

        let payload = ReportAssembler::default()
            .assemble("AAPL", &indicators, fundamentals, &series, 3)
            .unwrap();
        let json = serde_json::to_value(Outcome::Success(payload)).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["ticker"], "AAPL");
        assert_eq!(json["price"], 13.0);
        assert_eq!(
            json["metrics_data"]["valuation_and_profitability"]["pe_ratio"],
            29.5
        );
        assert_eq!(
            json["metrics_data"]["valuation_and_profitability"]["roe"],
            "N/A"
        );
        assert_eq!(json["metrics_data"]["technical_indicators"]["window"], 3);
        assert_eq!(json["metrics_data"]["technical_indicators"]["sma"], 12.0);
        assert_eq!(json["metrics_data"]["technical_indicators"]["rsi"], 100.0);
        assert_eq!(json["chart_data"].as_array().unwrap().len(), 4);

        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["success", "ticker", "price", "metrics_data", "chart_data"]);
    }

    #[test]
    fn test_failure_serialization() {
        let outcome: Outcome<MetricsPayload> =
            Err(StockError::NotFound("Invalid Company".to_string())).into();

        assert!(!outcome.is_success());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(
            json["error"],
            "Could not find ticker for input: 'Invalid Company'. Please try a valid company name or ticker."
        );
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_narrate_without_writer_fails() {
        let series = series();
        let indicators = IndicatorSet::compute(&series, 3).unwrap();

        let result = ReportAssembler::default()
            .narrate(
                "AAPL",
                &indicators,
                &FundamentalsSnapshot::unavailable(),
                &series,
                3,
            )
            .await;

        assert!(matches!(result, Err(StockError::ConfigError(_))));
    }
}
