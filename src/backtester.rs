use chrono::NaiveDate;

use crate::models::BacktestReport;

/// Compounds a per-bar return series into a percentage equity curve:
/// (prod(1 + r) - 1) * 100, with each point floored at -100 after
/// compounding. A strategy cannot lose more than all capital.
pub fn compound_equity(returns: &[f64]) -> Vec<f64> {
    let mut wealth = 1.0;
    returns
        .iter()
        .map(|r| {
            wealth *= 1.0 + r;
            ((wealth - 1.0) * 100.0).max(-100.0)
        })
        .collect()
}

/// Peak-to-trough percentage decline of the compounded wealth curve
/// from its running maximum. Always <= 0; exactly 0 at running peaks.
pub fn drawdown(returns: &[f64]) -> Vec<f64> {
    let mut wealth = 1.0;
    let mut peak = f64::NEG_INFINITY;
    returns
        .iter()
        .map(|r| {
            wealth *= 1.0 + r;
            peak = peak.max(wealth);
            (wealth - peak) / peak * 100.0
        })
        .collect()
}

/// Lags the position series one bar and multiplies by the raw return:
/// a position entered at close t earns nothing before t+1. The
/// position before the first bar is flat.
pub fn gross_returns(returns: &[f64], positions: &[u8]) -> Vec<f64> {
    (0..returns.len())
        .map(|t| {
            let held = if t == 0 { 0 } else { positions[t - 1] };
            held as f64 * returns[t]
        })
        .collect()
}

/// Charges the flat round-trip cost once per position change. A
/// change exists only between consecutive bars (t >= 1); bar 0 never
/// charges, so a constant position series pays no cost at all.
pub fn net_returns(gross: &[f64], positions: &[u8], tcost: f64) -> Vec<f64> {
    (0..gross.len())
        .map(|t| {
            if t >= 1 && positions[t] != positions[t - 1] {
                gross[t] - tcost
            } else {
                gross[t]
            }
        })
        .collect()
}

/// Runs the whole accounting pass. Deterministic; a pure function of
/// (returns, positions, tcost).
pub fn run_backtest(
    dates: &[NaiveDate],
    returns: &[f64],
    positions: &[u8],
    tcost: f64,
) -> BacktestReport {
    let gross = gross_returns(returns, positions);
    let net = net_returns(&gross, positions, tcost);

    BacktestReport {
        dates: dates.to_vec(),
        benchmark_equity: compound_equity(returns),
        gross_equity: compound_equity(&gross),
        net_equity: compound_equity(&net),
        benchmark_drawdown: drawdown(returns),
        gross_drawdown: drawdown(&gross),
        net_drawdown: drawdown(&net),
        gross_returns: gross,
        net_returns: net,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EPS: f64 = 1e-12;
    const TCOST: f64 = 0.0035;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    #[test]
    fn gross_depends_only_on_lagged_signal() {
        let returns = [0.01, -0.02, 0.03, 0.01, -0.01];
        let early = [1, 1, 0, 0, 0];
        let late = [1, 1, 0, 1, 1];

        let gross_early = gross_returns(&returns, &early);
        let gross_late = gross_returns(&returns, &late);

        // Signals differ only from t = 3, so gross must agree through
        // t = 3 (it reads the signal at t - 1).
        for t in 0..4 {
            assert!((gross_early[t] - gross_late[t]).abs() < EPS);
        }
        assert!((gross_late[4] - returns[4]).abs() < EPS);
        assert!(gross_early[4].abs() < EPS);
    }

    #[test]
    fn first_bar_earns_nothing() {
        let gross = gross_returns(&[0.05, 0.01], &[1, 1]);
        assert!(gross[0].abs() < EPS);
        assert!((gross[1] - 0.01).abs() < EPS);
    }

    #[test]
    fn constant_signal_pays_no_cost() {
        let returns = [0.01, 0.02, -0.01, 0.005];
        for constant in [0u8, 1u8] {
            let positions = [constant; 4];
            let gross = gross_returns(&returns, &positions);
            let net = net_returns(&gross, &positions, TCOST);
            assert_eq!(gross, net);
        }
    }

    #[test]
    fn cost_charged_exactly_once_per_change() {
        let returns = [0.01, 0.01, 0.01, 0.01, 0.01];
        let positions = [0, 0, 1, 1, 1];
        let gross = gross_returns(&returns, &positions);
        let net = net_returns(&gross, &positions, TCOST);

        for t in 0..5 {
            if t == 2 {
                assert!((net[t] - (gross[t] - TCOST)).abs() < EPS);
            } else {
                assert!((net[t] - gross[t]).abs() < EPS);
            }
        }
    }

    #[test]
    fn equity_floors_at_minus_one_hundred() {
        let all_loss = [-1.0, -1.0, -1.0];
        let equity = compound_equity(&all_loss);
        assert!(equity.iter().all(|e| (*e + 100.0).abs() < EPS));
    }

    #[test]
    fn equity_compounds_before_flooring() {
        // Two -60% bars compound to -84%, not a per-bar clip.
        let equity = compound_equity(&[-0.6, -0.6]);
        assert!((equity[0] + 60.0).abs() < 1e-9);
        assert!((equity[1] + 84.0).abs() < 1e-9);
    }

    #[test]
    fn drawdown_is_nonpositive_and_zero_at_peaks() {
        let returns = [0.02, 0.01, -0.03, 0.01, 0.06];
        let dd = drawdown(&returns);
        assert!(dd.iter().all(|d| *d <= EPS));
        // Bars 0 and 1 are new highs, as is the final bar.
        assert!(dd[0].abs() < EPS);
        assert!(dd[1].abs() < EPS);
        assert!(dd[4].abs() < EPS);
        assert!(dd[2] < 0.0);
        assert!(dd[3] < 0.0);
    }

    #[test]
    fn constant_prices_produce_flat_report() {
        let n = 10;
        let returns = vec![0.0; n];
        let positions = vec![0u8; n];
        let report = run_backtest(&dates(n), &returns, &positions, TCOST);

        assert!(report.net_equity.iter().all(|e| e.abs() < EPS));
        assert!(report.net_drawdown.iter().all(|d| d.abs() < EPS));
        assert!(report.benchmark_equity.iter().all(|e| e.abs() < EPS));
        assert!(report.gross_drawdown.iter().all(|d| d.abs() < EPS));
    }

    #[test]
    fn report_series_are_aligned() {
        let returns = [0.01, -0.02, 0.005];
        let positions = [0, 1, 1];
        let report = run_backtest(&dates(3), &returns, &positions, TCOST);

        assert_eq!(report.dates.len(), 3);
        assert_eq!(report.gross_returns.len(), 3);
        assert_eq!(report.net_returns.len(), 3);
        assert_eq!(report.benchmark_equity.len(), 3);
        assert_eq!(report.gross_equity.len(), 3);
        assert_eq!(report.net_equity.len(), 3);
        assert_eq!(report.benchmark_drawdown.len(), 3);
        assert_eq!(report.gross_drawdown.len(), 3);
        assert_eq!(report.net_drawdown.len(), 3);
    }
}
