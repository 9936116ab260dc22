use anyhow::{anyhow, Context, Result};
use std::env;

use crate::models::SignalKind;

/// Monte Carlo knobs: simulation count, stable-distribution shape and
/// an optional RNG seed (None = entropy-seeded).
#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub count: usize,
    pub alpha: f64,
    pub beta: f64,
    pub seed: Option<u64>,
}

/// All externally tunable constants of one analysis pass, threaded
/// into the core entry call so the core stays pure and testable.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Broker fee per round trip, as a fraction (0.0025 = 0.25%).
    pub fee_rate: f64,
    /// Slippage estimate per round trip, same units.
    pub slippage_rate: f64,
    pub default_ticker: String,
    pub default_period_days: u32,
    pub default_signal: SignalKind,
    pub simulation: SimulationSettings,
    /// Fast-window candidates for the sensitivity sweep.
    pub fast_windows: Vec<usize>,
    /// Slow-window candidates for the sensitivity sweep.
    pub slow_windows: Vec<usize>,
}

impl AnalysisConfig {
    /// Combined round-trip transaction cost, expressed in the same
    /// fractional units as daily log returns.
    pub fn transaction_cost(&self) -> f64 {
        self.fee_rate + self.slippage_rate
    }

    /// Reads the configuration from `QRD_*` environment variables,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            fee_rate: env_f64("QRD_FEE_RATE", defaults.fee_rate, Some(0.0), Some(1.0))?,
            slippage_rate: env_f64(
                "QRD_SLIPPAGE_RATE",
                defaults.slippage_rate,
                Some(0.0),
                Some(1.0),
            )?,
            default_ticker: env::var("QRD_DEFAULT_TICKER")
                .ok()
                .map(|v| v.trim().to_uppercase())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.default_ticker),
            default_period_days: env_usize("QRD_DEFAULT_PERIOD_DAYS", defaults.default_period_days as usize, 1)?
                as u32,
            default_signal: env_signal("QRD_DEFAULT_SIGNAL", defaults.default_signal)?,
            simulation: SimulationSettings {
                count: env_usize("QRD_SIMULATION_COUNT", defaults.simulation.count, 1)?,
                alpha: env_f64(
                    "QRD_STABLE_ALPHA",
                    defaults.simulation.alpha,
                    None,
                    Some(2.0),
                )?,
                beta: env_f64(
                    "QRD_STABLE_BETA",
                    defaults.simulation.beta,
                    Some(-1.0),
                    Some(1.0),
                )?,
                seed: env_seed("QRD_SIMULATION_SEED")?,
            },
            fast_windows: env_windows("QRD_FAST_WINDOWS", &defaults.fast_windows)?,
            slow_windows: env_windows("QRD_SLOW_WINDOWS", &defaults.slow_windows)?,
        };

        if config.simulation.alpha <= 0.0 {
            return Err(anyhow!(
                "QRD_STABLE_ALPHA must be in (0, 2] (value: {})",
                config.simulation.alpha
            ));
        }

        Ok(config)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fee_rate: 0.0025,
            slippage_rate: 0.001,
            default_ticker: "AAPL".to_string(),
            default_period_days: 365,
            default_signal: SignalKind::FastCross,
            simulation: SimulationSettings {
                count: 100,
                alpha: 1.7,
                beta: 0.0,
                seed: None,
            },
            fast_windows: window_range(10, 50, 2),
            slow_windows: window_range(20, 120, 5),
        }
    }
}

/// Candidate lookback windows from `start` (inclusive) to `end`
/// (exclusive) with the given stride.
pub fn window_range(start: usize, end: usize, step: usize) -> Vec<usize> {
    (start..end).step_by(step.max(1)).collect()
}

fn env_f64(name: &str, default: f64, min: Option<f64>, max: Option<f64>) -> Result<f64> {
    let Some(raw) = env_value(name) else {
        return Ok(default);
    };
    let value: f64 = raw
        .parse()
        .with_context(|| format!("{} must be a number (value: {})", name, raw))?;
    if let Some(min) = min {
        if value < min {
            return Err(anyhow!("{} must be >= {} (value: {})", name, min, value));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(anyhow!("{} must be <= {} (value: {})", name, max, value));
        }
    }
    Ok(value)
}

fn env_usize(name: &str, default: usize, min: usize) -> Result<usize> {
    let Some(raw) = env_value(name) else {
        return Ok(default);
    };
    let value: usize = raw
        .parse()
        .with_context(|| format!("{} must be a non-negative integer (value: {})", name, raw))?;
    if value < min {
        return Err(anyhow!("{} must be >= {} (value: {})", name, min, value));
    }
    Ok(value)
}

fn env_seed(name: &str) -> Result<Option<u64>> {
    let Some(raw) = env_value(name) else {
        return Ok(None);
    };
    let value: u64 = raw
        .parse()
        .with_context(|| format!("{} must be a u64 seed (value: {})", name, raw))?;
    Ok(Some(value))
}

fn env_signal(name: &str, default: SignalKind) -> Result<SignalKind> {
    let Some(raw) = env_value(name) else {
        return Ok(default);
    };
    parse_signal(&raw).with_context(|| format!("{} must be 'ema' or 'macd' (value: {})", name, raw))
}

fn parse_signal(raw: &str) -> Result<SignalKind> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "ema" => Ok(SignalKind::FastCross),
        "macd" => Ok(SignalKind::MacdCross),
        other => Err(anyhow!("unknown signal type: {}", other)),
    }
}

/// Windows are a comma-separated list of positive integers,
/// e.g. `QRD_FAST_WINDOWS=10,15,20,25`.
fn env_windows(name: &str, default: &[usize]) -> Result<Vec<usize>> {
    let Some(raw) = env_value(name) else {
        return Ok(default.to_vec());
    };
    let windows = parse_windows(&raw)
        .with_context(|| format!("{} must be a comma-separated list of windows >= 1", name))?;
    Ok(windows)
}

fn parse_windows(raw: &str) -> Result<Vec<usize>> {
    let mut windows = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let value: usize = part
            .parse()
            .with_context(|| format!("invalid window value: {}", part))?;
        if value == 0 {
            return Err(anyhow!("window values must be >= 1"));
        }
        windows.push(value);
    }
    if windows.is_empty() {
        return Err(anyhow!("window list is empty"));
    }
    Ok(windows)
}

fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
