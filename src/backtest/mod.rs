//! Backtesting module
//!
//! Replays market data tick by tick through the flash crash detector and
//! simulates entries and exits for a single open position

mod analytics;
mod batch;
mod replay;
mod simulator;
mod types;

pub use analytics::{downsample, BacktestResult, BacktestSummary, ExitCounts, ProfitFactor};
pub use batch::{run_batch, BatchJob, BatchOutcome};
pub use replay::{MarketReplay, MergedTick};
pub use simulator::BacktestSimulator;
pub use types::{BacktestError, DataSource, EquityPoint};

use crate::risk::{EntryParams, ExitFillPolicy};
use crate::signal::{DetectorConfig, DEFAULT_HISTORY_CAPACITY};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Strategy and account parameters for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Minimum price drop inside the lookback window that triggers an entry
    #[serde(with = "rust_decimal::serde::float")]
    pub drop_threshold: Decimal,
    /// Lookback window in seconds
    pub lookback_seconds: u32,
    /// Take-profit offset above entry price
    #[serde(with = "rust_decimal::serde::float")]
    pub take_profit: Decimal,
    /// Stop-loss offset below entry price
    #[serde(with = "rust_decimal::serde::float")]
    pub stop_loss: Decimal,
    /// Quote currency (USDC) per trade
    #[serde(with = "rust_decimal::serde::float")]
    pub position_size: Decimal,
    /// Concurrent positions; only 1 is supported
    pub max_positions: usize,
    /// Initial account equity
    #[serde(with = "rust_decimal::serde::float")]
    pub starting_equity: Decimal,
    /// Fill price for take-profit and stop-loss exits
    pub exit_fill: ExitFillPolicy,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            drop_threshold: dec!(0.30),
            lookback_seconds: 10,
            take_profit: dec!(0.10),
            stop_loss: dec!(0.05),
            position_size: dec!(5),
            max_positions: 1,
            starting_equity: dec!(100),
            exit_fill: ExitFillPolicy::TickPrice,
        }
    }
}

impl BacktestConfig {
    /// Reject configurations that would produce degenerate output
    pub fn validate(&self) -> Result<(), BacktestError> {
        let positive = [
            ("drop_threshold", self.drop_threshold),
            ("take_profit", self.take_profit),
            ("stop_loss", self.stop_loss),
            ("position_size", self.position_size),
            ("starting_equity", self.starting_equity),
        ];
        for (name, value) in positive {
            if value <= Decimal::ZERO {
                return Err(BacktestError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if self.max_positions != 1 {
            return Err(BacktestError::InvalidConfig(format!(
                "max_positions must be 1, got {}",
                self.max_positions
            )));
        }

        Ok(())
    }

    /// Detector settings derived from this config
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            drop_threshold: self.drop_threshold,
            lookback_seconds: i64::from(self.lookback_seconds),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Entry parameters derived from this config
    pub fn entry_params(&self) -> EntryParams {
        EntryParams {
            position_size: self.position_size,
            take_profit: self.take_profit,
            stop_loss: self.stop_loss,
        }
    }
}
