use crate::indicators::{calculate_ema, calculate_macd_signal_line};
use crate::models::SignalKind;

/// Smoothing span of the MACD signal line. Fixed for both the
/// top-level indicator and every sensitivity cell.
pub const MACD_SIGNAL_SPAN: usize = 9;

/// Whole-series output of the signal generator: both moving averages
/// (for the indicator chart) and the 0/1 position per bar.
#[derive(Debug, Clone)]
pub struct SignalSeries {
    pub fast_ema: Vec<f64>,
    pub slow_ema: Vec<f64>,
    pub positions: Vec<u8>,
}

/// Derives the binary long/flat position series from close prices.
///
/// FastCross goes long while the fast EMA is strictly above the slow
/// EMA. MacdCross goes long while the smoothed (fast - slow)
/// difference is strictly positive. EMA seeding guarantees the first
/// bar is defined, so the series never has leading gaps.
pub fn generate(closes: &[f64], kind: SignalKind, fast_span: usize, slow_span: usize) -> SignalSeries {
    match kind {
        SignalKind::FastCross => {
            let fast_ema = calculate_ema(closes, fast_span);
            let slow_ema = calculate_ema(closes, slow_span);
            let positions = fast_ema
                .iter()
                .zip(slow_ema.iter())
                .map(|(fast, slow)| u8::from(fast > slow))
                .collect();
            SignalSeries {
                fast_ema,
                slow_ema,
                positions,
            }
        }
        SignalKind::MacdCross => {
            let (fast_ema, slow_ema, signal_line) =
                calculate_macd_signal_line(closes, fast_span, slow_span, MACD_SIGNAL_SPAN);
            let positions = signal_line.iter().map(|v| u8::from(*v > 0.0)).collect();
            SignalSeries {
                fast_ema,
                slow_ema,
                positions,
            }
        }
    }
}
