pub mod backtester;
pub mod config;
pub mod engine;
pub mod indicators;
pub mod marketdata;
pub mod models;
pub mod monte_carlo;
pub mod sensitivity;
pub mod signal;
pub mod stats;

pub use config::AnalysisConfig;
pub use engine::run_analysis;
pub use models::{Dashboard, EngineError, SignalKind};
