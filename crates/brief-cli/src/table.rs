//! Terminal rendering of metrics payloads

use brief_stock::{MetricsPayload, Ratio};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

fn header(title: &str) -> Vec<Cell> {
    vec![
        Cell::new(title).add_attribute(Attribute::Bold),
        Cell::new("Value")
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
    ]
}

fn row(label: impl Into<String>, value: impl Into<String>) -> Vec<Cell> {
    vec![
        Cell::new(label.into()),
        Cell::new(value.into()).set_alignment(CellAlignment::Right),
    ]
}

fn scalar(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "N/A".to_string()
    }
}

fn ratio(value: Ratio) -> String {
    value.value().map_or_else(|| value.to_string(), scalar)
}

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Two tables: valuation ratios and technical indicators
pub fn render_metrics(payload: &MetricsPayload) -> String {
    let fundamentals = &payload.metrics_data.valuation_and_profitability;
    let technical = &payload.metrics_data.technical_indicators;

    let mut valuation = table();
    valuation.set_header(header(&format!("{} valuation", payload.ticker)));
    valuation.add_row(row("P/E Ratio", ratio(fundamentals.pe_ratio)));
    valuation.add_row(row("P/B Ratio", ratio(fundamentals.pb_ratio)));
    valuation.add_row(row("P/S Ratio", ratio(fundamentals.ps_ratio)));
    valuation.add_row(row("PEG Ratio", ratio(fundamentals.peg_ratio)));
    valuation.add_row(row("Return on Assets (ROA)", ratio(fundamentals.roa)));
    valuation.add_row(row("Return on Equity (ROE)", ratio(fundamentals.roe)));

    let mut indicators = table();
    indicators.set_header(header(&format!("{} technicals", payload.ticker)));
    indicators.add_row(row("Latest Price", format!("${}", scalar(payload.price))));
    indicators.add_row(row(format!("{}-day SMA", technical.window), scalar(technical.sma)));
    indicators.add_row(row(format!("{}-day EMA", technical.window), scalar(technical.ema)));
    indicators.add_row(row("RSI", scalar(technical.rsi)));
    indicators.add_row(row("MACD Line", scalar(technical.macd_line)));
    indicators.add_row(row("MACD Signal Line", scalar(technical.signal_line)));
    indicators.add_row(row("MACD Histogram", scalar(technical.macd_histogram)));

    format!(
        "{valuation}\n{indicators}\n{} chart points",
        payload.chart_data.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_formatting() {
        assert_eq!(ratio(Ratio::Value(29.456)), "29.46");
        assert_eq!(ratio(Ratio::NotAvailable), "N/A");
        assert_eq!(scalar(f64::NAN), "N/A");
    }
}
