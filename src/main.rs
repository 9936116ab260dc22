use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{error, info};
use qrd_engine::config::AnalysisConfig;
use qrd_engine::engine::run_analysis;
use qrd_engine::marketdata::MarketDataClient;
use qrd_engine::models::{EngineError, SignalKind};
use serde_json::json;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qrd-engine")]
#[command(about = "Technical-indicator backtest, Monte Carlo and sensitivity analysis engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch prices for one ticker, run the full analysis pass and
    /// emit the dashboard data products as JSON
    Analyze {
        /// Ticker symbol (defaults to the configured ticker)
        #[arg(long)]
        ticker: Option<String>,
        /// Lookback period in calendar days
        #[arg(long)]
        period: Option<u32>,
        /// Signal family to backtest
        #[arg(long, value_enum)]
        signal: Option<SignalKind>,
        /// Write the JSON to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print the S&P 500 ticker list
    Tickers,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AnalysisConfig::from_env()?;
    let client = MarketDataClient::new()?;

    match cli.command {
        Commands::Analyze {
            ticker,
            period,
            signal,
            output,
        } => {
            let ticker = ticker
                .map(|t| t.trim().to_uppercase())
                .unwrap_or_else(|| config.default_ticker.clone());
            let period = period.unwrap_or(config.default_period_days);
            let signal = signal.unwrap_or(config.default_signal);

            let result = match client.load_prices(&ticker, period).await {
                Ok(candles) => run_analysis(&candles, &ticker, signal, &config),
                Err(err) => Err(err),
            };

            match result {
                Ok(dashboard) => {
                    let body = serde_json::to_string_pretty(&dashboard)?;
                    write_output(output.as_deref(), &body)?;
                    info!(
                        "Analysis complete for {} ({} bars)",
                        dashboard.ticker,
                        dashboard.stats.returns.len()
                    );
                }
                Err(err) => {
                    // Render a structured fallback instead of a chart,
                    // then fail the process with the typed error.
                    render_failure(output.as_deref(), &err)?;
                    return Err(err.into());
                }
            }
        }
        Commands::Tickers => {
            let tickers = client.list_tickers().await?;
            info!("Fetched {} tickers", tickers.len());
            for ticker in tickers {
                println!("{ticker}");
            }
        }
    }

    Ok(())
}

fn render_failure(output: Option<&std::path::Path>, err: &EngineError) -> Result<()> {
    error!("Analysis failed: {err}");
    let fallback = json!({
        "error": {
            "kind": err.kind(),
            "message": err.to_string(),
        }
    });
    write_output(output, &serde_json::to_string_pretty(&fallback)?)
}

fn write_output(output: Option<&std::path::Path>, body: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, body)?;
            info!("Wrote {}", path.display());
        }
        None => println!("{body}"),
    }
    Ok(())
}
