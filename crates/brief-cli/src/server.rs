//! HTTP request layer
//!
//! Routes:
//! - `POST /api/stock_data` narrative report for `{company_input, window?}`
//! - `POST /api/metrics` structured metrics for the same body
//! - `GET /health`
//!
//! Pipeline failures are answered with HTTP 200 and
//! `{"success": false, "error": ...}`.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use brief_stock::{MetricsPayload, Outcome, ReportPayload, StockBrief};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub brief: Arc<StockBrief>,
}

/// Body of both POST endpoints
#[derive(Debug, Deserialize)]
pub struct StockRequest {
    pub company_input: String,
    #[serde(default)]
    pub window: Option<usize>,
}

impl AppState {
    fn window(&self, request: &StockRequest) -> usize {
        request.window.unwrap_or(self.brief.config().default_window)
    }
}

pub async fn stock_data_handler(
    State(state): State<AppState>,
    Json(request): Json<StockRequest>,
) -> Json<Outcome<ReportPayload>> {
    let window = state.window(&request);
    info!("Report request for '{}' (window {})", request.company_input, window);
    Json(state.brief.report_for(&request.company_input, window).await)
}

pub async fn metrics_handler(
    State(state): State<AppState>,
    Json(request): Json<StockRequest>,
) -> Json<Outcome<MetricsPayload>> {
    let window = state.window(&request);
    info!("Metrics request for '{}' (window {})", request.company_input, window);
    Json(state.brief.metrics_for(&request.company_input, window).await)
}

pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "lookup_keys": state.brief.resolver().len(),
    }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/stock_data", post(stock_data_handler))
        .route("/api/metrics", post(metrics_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the axum server
pub async fn serve(brief: Arc<StockBrief>, port: u16) -> anyhow::Result<()> {
    let app = router(AppState { brief });

    info!("Registering routes:");
    info!("  POST /api/stock_data");
    info!("  POST /api/metrics");
    info!("  GET /health");

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use brief_stock::{
        InfoMap, MarketDataProvider, Period, PricePoint, PriceSeries, StockConfig, StockError,
        TickerEntry, TickerResolver,
    };
    use chrono::{Duration, NaiveDate};

    struct FlatMarket;

    #[async_trait]
    impl MarketDataProvider for FlatMarket {
        async fn get_history(&self, _ticker: &str, _period: Period) -> brief_stock::Result<PriceSeries> {
            let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
            Ok((0..40)
                .map(|i| PricePoint::new(start + Duration::days(i), 50.0))
                .collect())
        }

        async fn get_info(&self, _ticker: &str) -> brief_stock::Result<InfoMap> {
            Err(StockError::ConfigError("no key".to_string()))
        }
    }

    fn state() -> AppState {
        let resolver = Arc::new(TickerResolver::new(vec![TickerEntry::new(
            "Apple Inc.",
            "AAPL",
        )]));
        let brief = StockBrief::new(
            resolver,
            Arc::new(FlatMarket),
            None,
            Arc::new(StockConfig::default()),
        );
        AppState {
            brief: Arc::new(brief),
        }
    }

    fn request(input: &str, window: Option<usize>) -> Json<StockRequest> {
        Json(StockRequest {
            company_input: input.to_string(),
            window,
        })
    }

    #[test]
    fn test_request_window_defaults() {
        let body: StockRequest = serde_json::from_str(r#"{"company_input": "Apple"}"#).unwrap();
        assert_eq!(body.window, None);
        assert_eq!(state().window(&body), 14);
    }

    #[tokio::test]
    async fn test_metrics_handler() {
        let Json(outcome) = metrics_handler(State(state()), request("Apple", Some(10))).await;

        let payload = outcome.payload().unwrap();
        assert_eq!(payload.ticker, "AAPL");
        assert_eq!(payload.price, 50.0);
        assert_eq!(payload.metrics_data.technical_indicators.window, 10);
        assert_eq!(payload.chart_data.len(), 40);
    }

    #[tokio::test]
    async fn test_stock_data_handler_unknown_company() {
        let Json(outcome) = stock_data_handler(State(state()), request("Invalid Company", None)).await;

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().starts_with("Could not find ticker"));
    }

    #[tokio::test]
    async fn test_huge_window_is_rejected() {
        let body: StockRequest =
            serde_json::from_str(r#"{"company_input": "Apple", "window": 1099511627776}"#).unwrap();
        let Json(outcome) = metrics_handler(State(state()), Json(body)).await;

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().starts_with("Invalid window: 1099511627776"));

        let Json(report) = stock_data_handler(State(state()), request("Apple", Some(usize::MAX))).await;
        assert!(!report.is_success());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let Json(body) = health_handler(State(state())).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["lookup_keys"], 2);
    }
}
