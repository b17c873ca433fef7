//! Stock brief pipeline
//!
//! Turns a free-text company name or ticker into a quick stock brief:
//!
//! - Ticker resolution against the SEC company ticker dataset
//! - Daily price history from Yahoo Finance, with bounded retry
//! - Technical indicators (SMA, EMA, Wilder RSI, MACD) via `ta`
//! - Valuation and profitability ratios from Alpha Vantage
//! - Metrics and chart payloads, plus an optional narrative report written
//!   by a text-generation model
//!
//! # Example
//!
//! ```rust,ignore
//! use brief_stock::{StockBrief, StockConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = StockConfig::builder().with_env_api_key().build()?;
//!     let brief = StockBrief::from_config(config, None)?;
//!
//!     let outcome = brief.metrics_for("Apple", 14).await;
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod fundamentals;
pub mod indicators;
pub mod models;
pub mod narrative;
pub mod normalize;
pub mod prompts;
pub mod report;
pub mod resolver;
pub mod service;

// Re-export main types for convenience
pub use api::{InfoMap, MarketData, MarketDataProvider};
pub use config::{StockConfig, StockConfigBuilder};
pub use error::{Result, StockError};
pub use fetcher::{PriceHistoryFetcher, RetryPolicy};
pub use fundamentals::{FundamentalsFetcher, FundamentalsSnapshot, Ratio};
pub use indicators::IndicatorSet;
pub use models::{Period, PricePoint, PriceSeries};
pub use narrative::NarrativeWriter;
pub use normalize::normalize_title;
pub use report::{ChartPoint, MetricsPayload, Outcome, ReportAssembler, ReportPayload};
pub use resolver::{MatchKind, Resolution, TickerEntry, TickerResolver};
pub use service::StockBrief;
