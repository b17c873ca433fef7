//! Request-scoped pipeline: resolve, fetch, compute, assemble
//!
//! [`StockBrief`] is what the request layer talks to. Its only shared state
//! is the read-only ticker table; every call runs its own pipeline and every
//! failure comes back as [`Outcome::Failure`] rather than an error.

use crate::api::{MarketData, MarketDataProvider};
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::fetcher::{PriceHistoryFetcher, RetryPolicy};
use crate::fundamentals::FundamentalsFetcher;
use crate::indicators::{IndicatorSet, check_window, round2};
use crate::narrative::NarrativeWriter;
use crate::report::{MetricsPayload, Outcome, ReportAssembler, ReportPayload};
use crate::resolver::{Resolution, TickerResolver};
use brief_llm::LLMProvider;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Stock brief service
#[derive(Clone)]
pub struct StockBrief {
    resolver: Arc<TickerResolver>,
    fetcher: PriceHistoryFetcher,
    fundamentals: FundamentalsFetcher,
    assembler: ReportAssembler,
    config: Arc<StockConfig>,
}

impl StockBrief {
    /// Wire the pipeline from explicit collaborators
    pub fn new(
        resolver: Arc<TickerResolver>,
        provider: Arc<dyn MarketDataProvider>,
        writer: Option<NarrativeWriter>,
        config: Arc<StockConfig>,
    ) -> Self {
        let fetcher = PriceHistoryFetcher::new(
            provider.clone(),
            RetryPolicy::from_config(&config),
            config.period,
        );

        Self {
            resolver,
            fetcher,
            fundamentals: FundamentalsFetcher::new(provider),
            assembler: ReportAssembler::new(writer),
            config,
        }
    }

    /// Load the ticker table and build production providers
    ///
    /// Without `llm` the service still answers metrics requests; report
    /// requests fail with a configuration message.
    pub fn from_config(config: StockConfig, llm: Option<Arc<dyn LLMProvider>>) -> Result<Self> {
        config.validate()?;

        let resolver = Arc::new(TickerResolver::load(&config.tickers_path)?);
        let provider: Arc<dyn MarketDataProvider> = Arc::new(MarketData::from_config(&config)?);
        let writer = llm
            .map(|llm| NarrativeWriter::new(llm, config.model.clone()))
            .transpose()?;

        if config.alpha_vantage_api_key.is_none() {
            warn!("ALPHA_VANTAGE_API_KEY not set; fundamentals will be reported as N/A");
        }

        info!(
            "Stock brief ready ({} lookup keys, period {}, {} retries)",
            resolver.len(),
            config.period,
            config.max_retries
        );

        Ok(Self::new(resolver, provider, writer, Arc::new(config)))
    }

    pub fn config(&self) -> &StockConfig {
        &self.config
    }

    pub fn resolver(&self) -> &TickerResolver {
        &self.resolver
    }

    pub fn resolve_ticker(&self, input: &str) -> Result<String> {
        self.resolver.resolve(input)
    }

    pub fn resolve_detailed(&self, input: &str) -> Result<Resolution> {
        self.resolver.resolve_detailed(input)
    }

    /// Latest close rounded to 2 decimal places
    pub async fn get_stock_price(&self, ticker: &str) -> Result<f64> {
        self.fetcher.latest_price(ticker).await.map(round2)
    }

    /// Structured metrics for an already-resolved ticker
    #[instrument(skip(self))]
    pub async fn get_metrics(&self, ticker: &str, window: usize) -> Outcome<MetricsPayload> {
        self.metrics(ticker, window).await.into_outcome("metrics", ticker)
    }

    /// Narrative report for an already-resolved ticker
    #[instrument(skip(self))]
    pub async fn get_report(&self, ticker: &str, window: usize) -> Outcome<ReportPayload> {
        self.report(ticker, window).await.into_outcome("report", ticker)
    }

    /// Resolve free text, then build metrics
    pub async fn metrics_for(&self, input: &str, window: usize) -> Outcome<MetricsPayload> {
        match self.resolve_ticker(input) {
            Ok(ticker) => self.get_metrics(&ticker, window).await,
            Err(e) => failed("metrics", input, e),
        }
    }

    /// Resolve free text, then build the narrative report
    pub async fn report_for(&self, input: &str, window: usize) -> Outcome<ReportPayload> {
        match self.resolve_ticker(input) {
            Ok(ticker) => self.get_report(&ticker, window).await,
            Err(e) => failed("report", input, e),
        }
    }

    async fn metrics(&self, ticker: &str, window: usize) -> Result<MetricsPayload> {
        check_window(window)?;

        let (series, fundamentals) =
            tokio::join!(self.fetcher.history(ticker), self.fundamentals.fetch(ticker));
        let series = series?;

        let indicators = IndicatorSet::compute(&series, window)?;
        self.assembler
            .assemble(ticker, &indicators, fundamentals, &series, window)
    }

    async fn report(&self, ticker: &str, window: usize) -> Result<ReportPayload> {
        check_window(window)?;

        if !self.assembler.has_writer() {
            return Err(StockError::ConfigError(
                "Text generation is not configured".to_string(),
            ));
        }

        let (series, fundamentals) =
            tokio::join!(self.fetcher.history(ticker), self.fundamentals.fetch(ticker));
        let series = series?;

        let indicators = IndicatorSet::compute(&series, window)?;
        self.assembler
            .narrate(ticker, &indicators, &fundamentals, &series, window)
            .await
    }
}

fn failed<T>(operation: &str, subject: &str, error: StockError) -> Outcome<T> {
    warn!("{} request for '{}' failed: {}", operation, subject, error);
    Outcome::failure(error)
}

trait IntoOutcome<T> {
    fn into_outcome(self, operation: &str, subject: &str) -> Outcome<T>;
}

impl<T> IntoOutcome<T> for Result<T> {
    fn into_outcome(self, operation: &str, subject: &str) -> Outcome<T> {
        match self {
            Ok(payload) => Outcome::Success(payload),
            Err(e) => failed(operation, subject, e),
        }
    }
}
