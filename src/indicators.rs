/// Recursive exponentially-weighted moving average seeded with the
/// first value: alpha = 2 / (span + 1), no bias adjustment. A span
/// only sets the smoothing weight, so any series length is valid.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let multiplier = 2.0 / (span as f64 + 1.0);
    let mut ema_values = Vec::with_capacity(values.len());
    ema_values.push(values[0]);

    for i in 1..values.len() {
        let ema = (values[i] * multiplier) + (ema_values[i - 1] * (1.0 - multiplier));
        ema_values.push(ema);
    }

    ema_values
}

/// MACD components for the given spans: the fast and slow EMAs of
/// `prices` and the `signal_span`-EMA of their difference.
pub fn calculate_macd_signal_line(
    prices: &[f64],
    fast_span: usize,
    slow_span: usize,
    signal_span: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let fast_ema = calculate_ema(prices, fast_span);
    let slow_ema = calculate_ema(prices, slow_span);

    let macd_line: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(fast, slow)| fast - slow)
        .collect();
    let signal_line = calculate_ema(&macd_line, signal_span);

    (fast_ema, slow_ema, signal_line)
}

/// Log returns of the close series. The first close is backfilled
/// from itself so the series has no missing values and r[0] = 0.
pub fn log_returns(closes: &[f64]) -> Vec<f64> {
    let mut returns = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        let prev = if i == 0 { closes[0] } else { closes[i - 1] };
        returns.push((closes[i] / prev).ln());
    }
    returns
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn ema_is_seeded_with_first_value() {
        let ema = calculate_ema(&[3.0, 4.0, 5.0], 10);
        assert_eq!(ema.len(), 3);
        assert!((ema[0] - 3.0).abs() < EPS);
    }

    #[test]
    fn ema_follows_recursive_definition() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let span = 3;
        let alpha = 2.0 / (span as f64 + 1.0);
        let ema = calculate_ema(&values, span);

        let mut expected = values[0];
        for (i, value) in values.iter().enumerate().skip(1) {
            expected = value * alpha + expected * (1.0 - alpha);
            assert!((ema[i] - expected).abs() < EPS);
        }
    }

    #[test]
    fn ema_of_constant_series_is_constant() {
        let ema = calculate_ema(&[7.5; 20], 50);
        assert!(ema.iter().all(|v| (v - 7.5).abs() < EPS));
    }

    #[test]
    fn ema_handles_series_shorter_than_span() {
        // Spans only set the smoothing weight; a 3-bar series with a
        // 100-bar span is still fully defined.
        let ema = calculate_ema(&[10.0, 11.0, 12.0], 100);
        assert_eq!(ema.len(), 3);
        assert!(ema.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn macd_signal_line_of_constant_series_is_zero() {
        let prices = [42.0; 30];
        let (fast, slow, signal) = calculate_macd_signal_line(&prices, 12, 26, 9);
        assert_eq!(fast.len(), prices.len());
        assert_eq!(slow.len(), prices.len());
        assert!(signal.iter().all(|v| v.abs() < EPS));
    }

    #[test]
    fn log_returns_backfills_first_bar() {
        let returns = log_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 3);
        assert!((returns[0]).abs() < EPS);
        assert!((returns[1] - (110.0f64 / 100.0).ln()).abs() < EPS);
        assert!((returns[2] - (99.0f64 / 110.0).ln()).abs() < EPS);
    }

    #[test]
    fn log_returns_of_constant_prices_are_zero() {
        let returns = log_returns(&[55.5; 10]);
        assert!(returns.iter().all(|r| r.abs() < EPS));
    }
}
