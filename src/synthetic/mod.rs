//! Synthetic market data
//!
//! Deterministic generation of two-sided 15-minute markets, some of which
//! contain a scripted flash crash. Every draw goes through [`Lcg`], so a batch
//! is reproducible from its seed alone.

mod generator;
mod rng;

pub use generator::{
    generate_market, generate_markets, plan_markets, CrashScenario, MarketPlan, RecoveryType,
    MARKET_NAMES,
};
pub use rng::Lcg;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 2024-01-01T00:00:00Z
const DEFAULT_START_TS: i64 = 1_704_067_200;

/// Synthetic data errors
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Crash probability outside [0, 1]
    #[error("Crash probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),
    /// Markets must have at least one tick
    #[error("Market duration must be positive")]
    ZeroDuration,
}

/// Synthetic batch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Number of markets to generate
    pub markets: usize,
    /// Probability that a market contains a crash
    pub crash_probability: f64,
    /// Top-level seed; market `i` uses `seed + i`
    pub seed: u64,
    /// Ticks per market, one per second
    pub duration_seconds: u32,
    /// Open time of the first market
    pub start_time: DateTime<Utc>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            markets: 30,
            crash_probability: 0.3,
            seed: 42,
            duration_seconds: 900,
            start_time: DateTime::from_timestamp(DEFAULT_START_TS, 0).unwrap_or_default(),
        }
    }
}

impl SyntheticConfig {
    /// Check generator inputs
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !(0.0..=1.0).contains(&self.crash_probability) {
            return Err(GeneratorError::InvalidProbability(self.crash_probability));
        }
        if self.duration_seconds == 0 {
            return Err(GeneratorError::ZeroDuration);
        }
        Ok(())
    }
}
