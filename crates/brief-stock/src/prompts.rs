//! Prompt templates for narrative reports

use crate::error::Result;
use crate::fundamentals::FundamentalsSnapshot;
use crate::indicators::IndicatorSet;
use minijinja::{Environment, context};

const REPORT_TEMPLATE_NAME: &str = "stock.user.report";

const REPORT_TEMPLATE: &str = "\
You are a helpful financial assistant. Generate a clean Markdown report for a retail investor. \
Avoid backslashes or code formatting. Use standard bold headers and readable bullet points.

### {{ ticker }} Stock Analysis

**Valuation & Profitability Metrics:**
- P/E Ratio: {{ pe_ratio }}
- P/B Ratio: {{ pb_ratio }}
- P/S Ratio: {{ ps_ratio }}
- PEG Ratio: {{ peg_ratio }}
- Return on Assets (ROA): {{ roa }}
- Return on Equity (ROE): {{ roe }}

**Technical Indicators:**
- Latest Price: ${{ price }}
- {{ window }}-day SMA: {{ sma }}
- {{ window }}-day EMA: {{ ema }}
- RSI: {{ rsi }}
- MACD Line: {{ macd_line }}
- MACD Signal Line: {{ signal_line }}
- MACD Histogram: {{ macd_histogram }}
";

/// Renders the report brief sent to the text-generation model
pub struct ReportPrompt {
    env: Environment<'static>,
}

impl ReportPrompt {
    /// Parse the built-in template
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the brief; `indicators` should already be rounded
    pub fn render(
        &self,
        ticker: &str,
        indicators: &IndicatorSet,
        fundamentals: &FundamentalsSnapshot,
    ) -> Result<String> {
        let template = self.env.get_template(REPORT_TEMPLATE_NAME)?;

        let rendered = template.render(context! {
            ticker,
            pe_ratio => fundamentals.pe_ratio.to_string(),
            pb_ratio => fundamentals.pb_ratio.to_string(),
            ps_ratio => fundamentals.ps_ratio.to_string(),
            peg_ratio => fundamentals.peg_ratio.to_string(),
            roa => fundamentals.roa.to_string(),
            roe => fundamentals.roe.to_string(),
            window => indicators.window,
            price => scalar(indicators.price),
            sma => scalar(indicators.sma),
            ema => scalar(indicators.ema),
            rsi => scalar(indicators.rsi),
            macd_line => scalar(indicators.macd_line),
            signal_line => scalar(indicators.signal_line),
            macd_histogram => scalar(indicators.macd_histogram),
        })?;

        Ok(rendered)
    }
}

impl std::fmt::Debug for ReportPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportPrompt")
            .field("template", &REPORT_TEMPLATE_NAME)
            .finish()
    }
}

/// Shortest round-trip form with a trailing `.0` on whole numbers
fn scalar(value: f64) -> String {
    if value.is_finite() {
        format!("{value:?}")
    } else {
        "N/A".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fundamentals::Ratio;

    fn indicators() -> IndicatorSet {
        IndicatorSet {
            window: 14,
            price: 189.1,
            sma: 185.42,
            ema: 186.03,
            rsi: 61.7,
            macd_line: 1.23,
            signal_line: 0.98,
            macd_histogram: 0.25,
        }
    }

    #[test]
    fn test_render_report_prompt() {
        let fundamentals = FundamentalsSnapshot {
            pe_ratio: Ratio::Value(29.5),
            roe: Ratio::Value(1.47),
            ..Default::default()
        };

        let prompt = ReportPrompt::new()
            .unwrap()
            .render("AAPL", &indicators(), &fundamentals)
            .unwrap();

        assert!(prompt.starts_with("You are a helpful financial assistant."));
        assert!(prompt.contains("### AAPL Stock Analysis"));
        assert!(prompt.contains("- P/E Ratio: 29.5\n"));
        assert!(prompt.contains("- P/B Ratio: N/A\n"));
        assert!(prompt.contains("- Return on Equity (ROE): 1.47\n"));
        assert!(prompt.contains("- Latest Price: $189.1\n"));
        assert!(prompt.contains("- 14-day SMA: 185.42\n"));
        assert!(prompt.contains("- 14-day EMA: 186.03\n"));
        assert!(prompt.contains("- MACD Histogram: 0.25"));
    }

    #[test]
    fn test_whole_numbers_keep_decimal_point() {
        let set = IndicatorSet {
            price: 185.0,
            rsi: 100.0,
            ..indicators()
        };
        let fundamentals = FundamentalsSnapshot {
            pe_ratio: Ratio::Value(30.0),
            ..Default::default()
        };

        let prompt = ReportPrompt::new()
            .unwrap()
            .render("AAPL", &set, &fundamentals)
            .unwrap();

        assert!(prompt.contains("- Latest Price: $185.0\n"));
        assert!(prompt.contains("- RSI: 100.0\n"));
        assert!(prompt.contains("- P/E Ratio: 30.0\n"));
        assert_eq!(scalar(-0.25), "-0.25");
    }

    #[test]
    fn test_undefined_indicator_renders_not_available() {
        let set = IndicatorSet {
            rsi: f64::NAN,
            ..indicators()
        };

        let prompt = ReportPrompt::new()
            .unwrap()
            .render("NEWCO", &set, &FundamentalsSnapshot::unavailable())
            .unwrap();

        assert!(prompt.contains("- RSI: N/A\n"));
    }
}
