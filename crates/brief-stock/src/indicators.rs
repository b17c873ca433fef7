//! Technical indicator engine
//!
//! All series functions return one value per input close, so callers can zip
//! them back onto the price series. Values are kept at full precision; only
//! [`IndicatorSet::rounded`] rounds, at the output boundary.

use crate::error::{Result, StockError};
use crate::models::PriceSeries;
use serde::Serialize;
use ta::Next;
use ta::indicators::{ExponentialMovingAverage, SimpleMovingAverage};

/// RSI lookback
pub const RSI_PERIOD: usize = 14;

/// MACD fast EMA span
pub const MACD_FAST: usize = 12;

/// MACD slow EMA span
pub const MACD_SLOW: usize = 26;

/// MACD signal EMA span
pub const MACD_SIGNAL: usize = 9;

/// Largest accepted SMA/EMA window, about one year of trading days
pub const MAX_WINDOW: usize = 250;

fn indicator_error(e: impl std::fmt::Display) -> StockError {
    StockError::IndicatorError(e.to_string())
}

/// Reject windows outside `1..=MAX_WINDOW`
pub fn check_window(window: usize) -> Result<usize> {
    if (1..=MAX_WINDOW).contains(&window) {
        Ok(window)
    } else {
        Err(StockError::InvalidWindow(window))
    }
}

/// Trailing mean over `window` closes; NaN until the window is full
///
/// A window longer than the series never fills, so the result is all NaN.
pub fn sma_series(values: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(StockError::InvalidWindow(window));
    }
    if window > values.len() {
        return Ok(vec![f64::NAN; values.len()]);
    }

    let mut sma = SimpleMovingAverage::new(window).map_err(indicator_error)?;

    Ok(values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let avg = sma.next(v);
            if i + 1 < window { f64::NAN } else { avg }
        })
        .collect())
}

/// EMA with `alpha = 2 / (span + 1)`, seeded by the first value
pub fn ema_series(values: &[f64], span: usize) -> Result<Vec<f64>> {
    check_window(span)?;
    let mut ema = ExponentialMovingAverage::new(span).map_err(indicator_error)?;
    Ok(values.iter().map(|&v| ema.next(v)).collect())
}

/// Wilder-smoothed RSI
///
/// Wilder smoothing is an EMA with `alpha = 1 / period`, i.e. a span of
/// `2 * period - 1`. The first point has no change and is NaN. A window
/// with no down moves reports 100.
pub fn rsi_series(closes: &[f64], period: usize) -> Result<Vec<f64>> {
    check_window(period)?;

    let span = 2 * period - 1;
    let mut avg_up = ExponentialMovingAverage::new(span).map_err(indicator_error)?;
    let mut avg_down = ExponentialMovingAverage::new(span).map_err(indicator_error)?;

    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return Ok(out);
    }
    out.push(f64::NAN);

    for pair in closes.windows(2) {
        let delta = pair[1] - pair[0];
        let up = avg_up.next(delta.max(0.0));
        let down = avg_down.next((-delta).max(0.0));

        let rsi = if down == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + up / down)
        };
        out.push(rsi);
    }

    Ok(out)
}

/// MACD line, signal line and histogram, one value per close
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd_series(closes: &[f64]) -> Result<MacdSeries> {
    let fast = ema_series(closes, MACD_FAST)?;
    let slow = ema_series(closes, MACD_SLOW)?;

    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema_series(&line, MACD_SIGNAL)?;
    let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    Ok(MacdSeries {
        line,
        signal,
        histogram,
    })
}

/// Round to 2 decimal places; -0.0 becomes 0.0 and NaN stays NaN
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

/// Indicator values at the latest point of a price series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub window: usize,
    pub price: f64,
    pub sma: f64,
    pub ema: f64,
    pub rsi: f64,
    pub macd_line: f64,
    pub signal_line: f64,
    pub macd_histogram: f64,
}

impl IndicatorSet {
    /// Compute every indicator over the full series at full precision
    pub fn compute(series: &PriceSeries, window: usize) -> Result<Self> {
        check_window(window)?;

        let closes = series.closes();
        let Some(&price) = closes.last() else {
            return Err(StockError::IndicatorError(
                "cannot compute indicators on an empty price series".to_string(),
            ));
        };

        let last = |values: Vec<f64>| values.last().copied().unwrap_or(f64::NAN);
        let macd = macd_series(&closes)?;

        Ok(Self {
            window,
            price,
            sma: last(sma_series(&closes, window)?),
            ema: last(ema_series(&closes, window)?),
            rsi: last(rsi_series(&closes, RSI_PERIOD)?),
            macd_line: last(macd.line),
            signal_line: last(macd.signal),
            macd_histogram: last(macd.histogram),
        })
    }

    /// Copy with every scalar rounded to 2 decimal places
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            window: self.window,
            price: round2(self.price),
            sma: round2(self.sma),
            ema: round2(self.ema),
            rsi: round2(self.rsi),
            macd_line: round2(self.macd_line),
            signal_line: round2(self.signal_line),
            macd_histogram: round2(self.macd_histogram),
        }
    }
}
