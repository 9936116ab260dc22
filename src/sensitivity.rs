use rayon::prelude::*;

use crate::backtester::{compound_equity, gross_returns, net_returns};
use crate::models::{SensitivityReport, SignalKind};
use crate::signal;

/// Maps final net PnL over the Cartesian product of fast and slow
/// lookback windows. Each cell regenerates the selected indicator on
/// the raw closes with the substituted spans and re-runs the backtest
/// accounting against the shared return series; only the last value
/// of the compounded, floored net-equity curve is kept. Cells are
/// independent, so rows run on the rayon pool; collection order is
/// deterministic. Non-finite outcomes from degenerate window pairs
/// are coerced to 0.
pub fn sweep(
    closes: &[f64],
    returns: &[f64],
    kind: SignalKind,
    fast_windows: &[usize],
    slow_windows: &[usize],
    tcost: f64,
) -> SensitivityReport {
    let net_pnl: Vec<Vec<f64>> = fast_windows
        .par_iter()
        .map(|&fast| {
            slow_windows
                .iter()
                .map(|&slow| final_net_pnl(closes, returns, kind, fast, slow, tcost))
                .collect()
        })
        .collect();

    SensitivityReport {
        fast_windows: fast_windows.to_vec(),
        slow_windows: slow_windows.to_vec(),
        net_pnl,
    }
}

fn final_net_pnl(
    closes: &[f64],
    returns: &[f64],
    kind: SignalKind,
    fast: usize,
    slow: usize,
    tcost: f64,
) -> f64 {
    let series = signal::generate(closes, kind, fast, slow);
    let gross = gross_returns(returns, &series.positions);
    let net = net_returns(&gross, &series.positions, tcost);
    let pnl = compound_equity(&net).last().copied().unwrap_or(0.0);

    if pnl.is_finite() {
        pnl
    } else {
        0.0
    }
}
