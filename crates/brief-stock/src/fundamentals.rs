//! Valuation and profitability ratios
//!
//! [`FundamentalsFetcher::fetch`] never fails. A provider error yields an
//! all-`N/A` snapshot, and each ratio the provider omits or reports as
//! non-numeric becomes `N/A` on its own.

use crate::api::{InfoMap, MarketDataProvider};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const NOT_AVAILABLE: &str = "N/A";

/// A ratio value or the explicit "not available" sentinel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Ratio {
    Value(f64),
    #[default]
    NotAvailable,
}

impl Ratio {
    /// Interpret a raw provider field; anything non-numeric is `N/A`
    pub fn from_field(value: Option<&Value>) -> Self {
        let parsed = match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match parsed {
            Some(v) if v.is_finite() => Self::Value(v),
            _ => Self::NotAvailable,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v:?}"),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// Fixed set of fundamental ratios; every field is always present
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FundamentalsSnapshot {
    pub pe_ratio: Ratio,
    pub pb_ratio: Ratio,
    pub ps_ratio: Ratio,
    pub peg_ratio: Ratio,
    pub roa: Ratio,
    pub roe: Ratio,
}

impl FundamentalsSnapshot {
    /// Every field `N/A`
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Build from an Alpha Vantage `OVERVIEW` map
    pub fn from_overview(info: &InfoMap) -> Self {
        let field = |key: &str| Ratio::from_field(info.get(key));

        Self {
            pe_ratio: field("PERatio"),
            pb_ratio: field("PriceToBookRatio"),
            ps_ratio: field("PriceToSalesRatioTTM"),
            peg_ratio: field("PEGRatio"),
            roa: field("ReturnOnAssetsTTM"),
            roe: field("ReturnOnEquityTTM"),
        }
    }

    /// Names of the fields that are `N/A`
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("pe_ratio", self.pe_ratio),
            ("pb_ratio", self.pb_ratio),
            ("ps_ratio", self.ps_ratio),
            ("peg_ratio", self.peg_ratio),
            ("roa", self.roa),
            ("roe", self.roe),
        ]
        .into_iter()
        .filter(|(_, ratio)| !ratio.is_available())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Fetches the fundamentals snapshot, absorbing every failure
#[derive(Clone)]
pub struct FundamentalsFetcher {
    provider: Arc<dyn MarketDataProvider>,
}

impl FundamentalsFetcher {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, ticker: &str) -> FundamentalsSnapshot {
        let info = match self.provider.get_info(ticker).await {
            Ok(info) => info,
            Err(e) => {
                warn!("Fundamentals unavailable for {}: {}", ticker, e);
                return FundamentalsSnapshot::unavailable();
            }
        };

        let snapshot = FundamentalsSnapshot::from_overview(&info);
        let missing = snapshot.missing();
        if missing.is_empty() {
            debug!("All fundamentals available for {}", ticker);
        } else {
            warn!("Fundamentals for {} missing: {}", ticker, missing.join(", "));
        }

        snapshot
    }
}
