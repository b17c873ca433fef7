//! stockbrief: quick stock briefs from a company name or ticker
//!
//! # Usage
//!
//! ```bash
//! # Optional: fundamentals and narrative reports
//! export ALPHA_VANTAGE_API_KEY="..."
//! export OPENAI_API_KEY="..."
//!
//! stockbrief resolve "Apple"
//! stockbrief metrics nvidia --window 20
//! stockbrief report msft
//! stockbrief serve --port 5000
//! ```

mod server;
mod table;

use anyhow::{Context, bail};
use brief_llm::LLMProvider;
use brief_llm::providers::OpenAIProvider;
use brief_stock::{MatchKind, Outcome, Period, StockBrief, StockConfig};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "stockbrief")]
#[command(about = "Quick stock briefs from a company name or ticker", long_about = None)]
#[command(version)]
struct Cli {
    /// Ticker reference dataset (SEC company_tickers.json)
    #[arg(long, global = true)]
    tickers: Option<PathBuf>,

    /// Price history lookback (1mo, 6mo, 1y, ...)
    #[arg(long, global = true)]
    period: Option<Period>,

    /// Text-generation model for reports
    #[arg(long, global = true)]
    model: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a company name or ticker
    Resolve { input: String },

    /// Valuation ratios and technical indicators
    Metrics {
        input: String,

        /// SMA/EMA window in trading days
        #[arg(short, long)]
        window: Option<usize>,

        /// Print the raw JSON payload
        #[arg(long)]
        json: bool,
    },

    /// Narrative Markdown report (needs OPENAI_API_KEY)
    Report {
        input: String,

        /// SMA/EMA window in trading days
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// Start the HTTP server
    Serve {
        #[arg(short, long, default_value_t = 5000)]
        port: u16,
    },
}

fn build_config(cli: &Cli) -> anyhow::Result<StockConfig> {
    let mut builder = StockConfig::builder().with_env_api_key().from_env_model();

    if let Some(path) = &cli.tickers {
        builder = builder.tickers_path(path);
    }
    if let Some(period) = cli.period {
        builder = builder.period(period);
    }
    if let Some(model) = &cli.model {
        builder = builder.model(model);
    }

    Ok(builder.build()?)
}

fn text_provider() -> Option<Arc<dyn LLMProvider>> {
    match OpenAIProvider::from_env() {
        Ok(provider) => Some(Arc::new(provider)),
        Err(e) => {
            warn!("Narrative reports disabled: {}", e);
            None
        }
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn finish<T>(outcome: &Outcome<T>) -> anyhow::Result<()> {
    match outcome.error() {
        Some(message) => bail!("{message}"),
        None => Ok(()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    brief_utils::init_tracing_with("warn,brief_stock=info,brief_cli=info", cli.log_json);

    let config = build_config(&cli)?;
    let tickers_path = config.tickers_path.clone();
    let llm = match cli.command {
        Command::Report { .. } | Command::Serve { .. } => text_provider(),
        _ => None,
    };

    let brief = StockBrief::from_config(config, llm).with_context(|| {
        format!("failed to initialise from {}", tickers_path.display())
    })?;

    match cli.command {
        Command::Resolve { input } => {
            let resolution = brief.resolve_detailed(&input)?;
            let via = match resolution.matched_by {
                MatchKind::Ticker => "ticker",
                MatchKind::Name => "company name",
            };
            println!("{} (matched by {via})", resolution.ticker);
        }
        Command::Metrics {
            input,
            window,
            json,
        } => {
            let window = window.unwrap_or(brief.config().default_window);
            let outcome = brief.metrics_for(&input, window).await;

            if json {
                print_json(&outcome)?;
            } else if let Some(payload) = outcome.payload() {
                println!("{}", table::render_metrics(payload));
            }
            finish(&outcome)?;
        }
        Command::Report { input, window } => {
            let window = window.unwrap_or(brief.config().default_window);
            let outcome = brief.report_for(&input, window).await;
            print_json(&outcome)?;
            finish(&outcome)?;
        }
        Command::Serve { port } => {
            info!("Starting stockbrief server on port {}", port);
            server::serve(Arc::new(brief), port).await?;
        }
    }

    Ok(())
}
