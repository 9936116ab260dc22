use log::info;

use crate::backtester;
use crate::config::AnalysisConfig;
use crate::indicators::log_returns;
use crate::models::{Candle, Dashboard, EngineError, IndicatorReport, SignalKind};
use crate::monte_carlo;
use crate::sensitivity;
use crate::signal;
use crate::stats;

/// Runs one full analysis pass over an ascending candle series and
/// returns the six data products as one plain value. Sequential,
/// stateless between invocations; every failure propagates as a typed
/// error for the presentation boundary to match on.
pub fn run_analysis(
    candles: &[Candle],
    ticker: &str,
    kind: SignalKind,
    config: &AnalysisConfig,
) -> Result<Dashboard, EngineError> {
    if candles.is_empty() {
        return Err(EngineError::Computation(format!(
            "empty price series for {ticker}"
        )));
    }

    let dates: Vec<_> = candles.iter().map(|c| c.date).collect();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let returns = log_returns(&closes);
    let tcost = config.transaction_cost();

    info!(
        "Analyzing {} ({} bars, signal {}, tcost {:.4})",
        ticker,
        candles.len(),
        kind.as_str(),
        tcost
    );

    let (fast_span, slow_span) = kind.default_spans();
    let series = signal::generate(&closes, kind, fast_span, slow_span);

    let backtest = backtester::run_backtest(&dates, &returns, &series.positions, tcost);
    let stats = stats::summarize_returns(ticker, &dates, &returns);
    let monte_carlo = monte_carlo::simulate(&returns, &backtest.net_equity, &config.simulation)?;
    let sensitivity = sensitivity::sweep(
        &closes,
        &returns,
        kind,
        &config.fast_windows,
        &config.slow_windows,
        tcost,
    );

    let indicator = IndicatorReport {
        kind,
        fast_span,
        slow_span,
        dates,
        close: closes,
        fast_ema: series.fast_ema,
        slow_ema: series.slow_ema,
        positions: series.positions,
    };

    Ok(Dashboard {
        ticker: ticker.to_string(),
        signal: kind,
        stats,
        indicator,
        backtest,
        monte_carlo,
        sensitivity,
    })
}
