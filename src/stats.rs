use chrono::NaiveDate;
use statrs::statistics::Statistics;

use crate::models::StatsSummary;

/// Descriptive statistics of the daily return series. The standard
/// deviation uses the sample convention (n-1 denominator); the Monte
/// Carlo simulator's sigma estimate deliberately uses the population
/// convention instead.
pub fn summarize_returns(ticker: &str, dates: &[NaiveDate], returns: &[f64]) -> StatsSummary {
    StatsSummary {
        ticker: ticker.to_string(),
        dates: dates.to_vec(),
        returns: returns.to_vec(),
        mean: returns.iter().mean(),
        std_dev: returns.iter().std_dev(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    #[test]
    fn mean_and_sample_std_dev() {
        let returns = [0.01, 0.02, 0.03, 0.04];
        let summary = summarize_returns("AAPL", &dates(4), &returns);

        assert!((summary.mean - 0.025).abs() < 1e-12);
        // Squared deviations from the mean over n-1 = 3.
        let expected_var = (0.015f64.powi(2) + 0.005f64.powi(2) * 2.0 + 0.015f64.powi(2)) / 3.0;
        assert!((summary.std_dev - expected_var.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn carries_full_series_for_display() {
        let returns = [0.0, -0.01, 0.02];
        let summary = summarize_returns("MSFT", &dates(3), &returns);
        assert_eq!(summary.returns, returns.to_vec());
        assert_eq!(summary.dates.len(), 3);
        assert_eq!(summary.ticker, "MSFT");
    }

    #[test]
    fn constant_returns_have_zero_std_dev() {
        let summary = summarize_returns("SPY", &dates(5), &[0.01; 5]);
        assert!((summary.mean - 0.01).abs() < 1e-12);
        assert!(summary.std_dev.abs() < 1e-12);
    }
}
