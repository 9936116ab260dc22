use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One daily price bar, ascending by date, immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Which indicator family drives the long/flat signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum SignalKind {
    /// Fast/slow EMA crossover (spans 50/100 by default).
    #[value(name = "ema")]
    #[serde(rename = "ema")]
    FastCross,
    /// MACD signal-line sign (spans 12/26, 9-span smoothing).
    #[value(name = "macd")]
    #[serde(rename = "macd")]
    MacdCross,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::FastCross => "ema",
            SignalKind::MacdCross => "macd",
        }
    }

    /// Default EMA spans for each family.
    pub fn default_spans(&self) -> (usize, usize) {
        match self {
            SignalKind::FastCross => (50, 100),
            SignalKind::MacdCross => (12, 26),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no market data available for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },
    #[error("computation failed: {0}")]
    Computation(String),
}

impl EngineError {
    pub fn data_unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        EngineError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable tag for the presentation layer to match on.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::DataUnavailable { .. } => "data_unavailable",
            EngineError::Computation(_) => "computation_error",
        }
    }
}

/// Daily-return summary: the full series plus its first two moments.
/// `std_dev` uses the sample convention (n-1 denominator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSummary {
    pub ticker: String,
    pub dates: Vec<NaiveDate>,
    pub returns: Vec<f64>,
    pub mean: f64,
    pub std_dev: f64,
}

/// Price, both moving averages and the 0/1 position series for the
/// indicator chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorReport {
    pub kind: SignalKind,
    pub fast_span: usize,
    pub slow_span: usize,
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub fast_ema: Vec<f64>,
    pub slow_ema: Vec<f64>,
    pub positions: Vec<u8>,
}

/// Equity and drawdown curves, all in percent, aligned to `dates`.
/// Equity curves are compounded then floored at -100; drawdowns are
/// <= 0 everywhere and 0 at each running wealth peak.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub dates: Vec<NaiveDate>,
    /// Per-bar strategy return before costs: position lagged one bar
    /// times the raw log return.
    pub gross_returns: Vec<f64>,
    /// Per-bar strategy return after the round-trip cost charged on
    /// position-change bars.
    pub net_returns: Vec<f64>,
    pub benchmark_equity: Vec<f64>,
    pub gross_equity: Vec<f64>,
    pub net_equity: Vec<f64>,
    pub benchmark_drawdown: Vec<f64>,
    pub gross_drawdown: Vec<f64>,
    pub net_drawdown: Vec<f64>,
}

/// N synthetic equity curves per distribution model plus the realized
/// net-equity curve for overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloReport {
    pub normal_paths: Vec<Vec<f64>>,
    pub stable_paths: Vec<Vec<f64>>,
    pub realized_equity: Vec<f64>,
}

/// Final net PnL per (fast, slow) window pair. `net_pnl[i][j]` is the
/// outcome for `fast_windows[i]` x `slow_windows[j]`; finite
/// everywhere after sanitization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub fast_windows: Vec<usize>,
    pub slow_windows: Vec<usize>,
    pub net_pnl: Vec<Vec<f64>>,
}

/// The six data products of one analysis pass. Plain values only, so
/// any rendering technology can consume them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub ticker: String,
    pub signal: SignalKind,
    pub stats: StatsSummary,
    pub indicator: IndicatorReport,
    pub backtest: BacktestReport,
    pub monte_carlo: MonteCarloReport,
    pub sensitivity: SensitivityReport,
}
