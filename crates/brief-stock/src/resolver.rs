//! Ticker resolution from company names or symbols
//!
//! The resolver is built once from the ticker reference dataset and is
//! immutable afterwards, so one `Arc<TickerResolver>` can serve every request.
//!
//! Each reference entry contributes two keys to a single table: its
//! normalized title and its upper-cased ticker. When two entries produce the
//! same key, the entry loaded last wins and the collision is logged.

use crate::error::{Result, StockError};
use crate::normalize::normalize_title;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// One row of the ticker reference dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerEntry {
    /// Display name, e.g. "Apple Inc."
    pub title: String,
    /// Exchange symbol, e.g. "AAPL"
    pub ticker: String,
}

impl TickerEntry {
    pub fn new(title: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ticker: ticker.into(),
        }
    }
}

/// Which lookup path produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Input matched a ticker key directly (case-insensitive)
    Ticker,
    /// Input matched after name normalization
    Name,
}

/// Successful resolution with diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub ticker: String,
    pub matched_by: MatchKind,
}

/// Immutable name/ticker lookup table
#[derive(Debug, Clone, Default)]
pub struct TickerResolver {
    keys: HashMap<String, String>,
    entries: usize,
    collisions: usize,
}

impl TickerResolver {
    /// Build the lookup table from entries in load order
    pub fn new(entries: impl IntoIterator<Item = TickerEntry>) -> Self {
        let mut resolver = Self::default();

        for entry in entries {
            let ticker = entry.ticker.trim().to_uppercase();
            if ticker.is_empty() {
                debug!("Skipping reference entry without ticker: {:?}", entry.title);
                continue;
            }

            let title = normalize_title(&entry.title);
            if !title.is_empty() {
                resolver.insert(title, &ticker);
            }
            resolver.insert(ticker.clone(), &ticker);
            resolver.entries += 1;
        }

        if resolver.collisions > 0 {
            warn!(
                "{} lookup key collisions in ticker reference data (last entry wins)",
                resolver.collisions
            );
        }

        resolver
    }

    /// Parse the SEC `company_tickers.json` shape
    ///
    /// Accepts either an object of `{row_key: {title, ticker, ...}}` (iterated
    /// in document order) or a plain array of entries.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows = match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => map.into_iter().map(|(_, row)| row).collect(),
            Value::Array(rows) => rows,
            other => {
                return Err(StockError::ConfigError(format!(
                    "ticker reference data must be an object or array, got {other}"
                )));
            }
        };

        let entries = rows
            .into_iter()
            .map(serde_json::from_value::<TickerEntry>)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self::new(entries))
    }

    /// Load the reference dataset from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let resolver = Self::from_json_str(&json)?;

        info!(
            "Loaded {} ticker reference entries ({} lookup keys) from {}",
            resolver.entries,
            resolver.keys.len(),
            path.display()
        );

        Ok(resolver)
    }

    fn insert(&mut self, key: String, ticker: &str) {
        if let Some(previous) = self.keys.insert(key.clone(), ticker.to_string()) {
            if previous != ticker {
                self.collisions += 1;
                debug!("Lookup key '{}' remapped from {} to {}", key, previous, ticker);
            }
        }
    }

    /// Resolve free text to a canonical ticker
    pub fn resolve(&self, input: &str) -> Result<String> {
        self.resolve_detailed(input).map(|r| r.ticker)
    }

    /// Resolve free text and report which lookup path matched
    ///
    /// The direct ticker key is tried before the normalized name, since a
    /// ticker string can collide with another company's normalized name.
    pub fn resolve_detailed(&self, input: &str) -> Result<Resolution> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(StockError::NotFound(input.to_string()));
        }

        if let Some(ticker) = self.keys.get(&trimmed.to_uppercase()) {
            return Ok(Resolution {
                ticker: ticker.clone(),
                matched_by: MatchKind::Ticker,
            });
        }

        let normalized = normalize_title(trimmed);
        if !normalized.is_empty() {
            if let Some(ticker) = self.keys.get(&normalized) {
                return Ok(Resolution {
                    ticker: ticker.clone(),
                    matched_by: MatchKind::Name,
                });
            }
        }

        Err(StockError::NotFound(input.to_string()))
    }

    /// Number of distinct lookup keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of reference entries loaded
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Number of keys that were overwritten by a later entry
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TickerResolver {
        TickerResolver::new(vec![
            TickerEntry::new("Apple Inc.", "AAPL"),
            TickerEntry::new("MICROSOFT CORP", "MSFT"),
            TickerEntry::new("NVIDIA CORP", "nvda"),
        ])
    }

    #[test]
    fn test_resolve_by_ticker_and_title() {
        let resolver = sample();

        for (input, expected) in [
            ("AAPL", "AAPL"),
            ("aapl", "AAPL"),
            ("Apple Inc.", "AAPL"),
            ("Apple", "AAPL"),
            ("apple", "AAPL"),
            ("Microsoft", "MSFT"),
            ("MSFT", "MSFT"),
            ("NVIDIA CORP", "NVDA"),
            ("nvda", "NVDA"),
        ] {
            assert_eq!(resolver.resolve(input).unwrap(), expected, "input: {input}");
        }
    }

    #[test]
    fn test_match_kind() {
        let resolver = sample();
        assert_eq!(
            resolver.resolve_detailed("aapl").unwrap().matched_by,
            MatchKind::Ticker
        );
        assert_eq!(
            resolver.resolve_detailed("Apple Inc.").unwrap().matched_by,
            MatchKind::Name
        );
    }

    #[test]
    fn test_not_found() {
        let resolver = sample();
        let err = resolver.resolve("totally-unknown-co").unwrap_err();
        assert!(matches!(err, StockError::NotFound(ref input) if input == "totally-unknown-co"));
        assert!(matches!(resolver.resolve("Invalid Company"), Err(StockError::NotFound(_))));
    }

    #[test]
    fn test_blank_input_is_not_found() {
        let resolver = TickerResolver::new(vec![TickerEntry::new("Holdings Inc", "HLD")]);
        assert!(matches!(resolver.resolve(""), Err(StockError::NotFound(_))));
        assert!(matches!(resolver.resolve("  "), Err(StockError::NotFound(_))));
        // A title that normalizes to nothing must not become a catch-all key
        assert!(matches!(resolver.resolve("Inc"), Err(StockError::NotFound(_))));
        assert_eq!(resolver.resolve("hld").unwrap(), "HLD");
    }

    #[test]
    fn test_ticker_match_wins_over_name() {
        // "meta" is also a name key for MTA; the ticker key META is tried first
        let resolver = TickerResolver::new(vec![
            TickerEntry::new("META", "MTA"),
            TickerEntry::new("Meta Platforms, Inc.", "META"),
        ]);
        assert_eq!(resolver.resolve("meta").unwrap(), "META");
    }

    #[test]
    fn test_last_entry_wins_on_collision() {
        let resolver = TickerResolver::new(vec![
            TickerEntry::new("Alphabet Inc.", "GOOGL"),
            TickerEntry::new("Alphabet Inc.", "GOOG"),
        ]);
        assert_eq!(resolver.resolve("Alphabet").unwrap(), "GOOG");
        assert_eq!(resolver.resolve("GOOGL").unwrap(), "GOOGL");
        assert_eq!(resolver.collisions(), 1);
        assert_eq!(resolver.entries(), 2);
    }

    #[test]
    fn test_from_json_preserves_document_order() {
        let json = r#"{
            "0": {"cik_str": 1652044, "ticker": "GOOGL", "title": "Alphabet Inc."},
            "10": {"cik_str": 1652044, "ticker": "GOOG", "title": "Alphabet Inc."},
            "2": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}
        }"#;

        let resolver = TickerResolver::from_json_str(json).unwrap();
        assert_eq!(resolver.entries(), 3);
        assert_eq!(resolver.resolve("alphabet").unwrap(), "GOOG");
        assert_eq!(resolver.resolve("Apple").unwrap(), "AAPL");
        // alphabet, GOOGL, GOOG, apple, AAPL
        assert_eq!(resolver.len(), 5);
    }

    #[test]
    fn test_from_json_array() {
        let json = r#"[{"ticker": "MSFT", "title": "Microsoft Corp"}]"#;
        let resolver = TickerResolver::from_json_str(json).unwrap();
        assert_eq!(resolver.resolve("microsoft").unwrap(), "MSFT");
    }

    #[test]
    fn test_from_json_rejects_scalar() {
        assert!(matches!(
            TickerResolver::from_json_str("42"),
            Err(StockError::ConfigError(_))
        ));
        assert!(matches!(
            TickerResolver::from_json_str(r#"{"0": {"title": "No ticker"}}"#),
            Err(StockError::Json(_))
        ));
    }
}
