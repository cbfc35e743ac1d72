//! Shared backtest types

use crate::data::DataError;
use crate::precision::serialize_money;
use crate::synthetic::GeneratorError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Errors surfaced by a backtest run
#[derive(Debug, thiserror::Error)]
pub enum BacktestError {
    #[error("invalid backtest config: {0}")]
    InvalidConfig(String),

    #[error("market data: {0}")]
    Data(#[from] DataError),

    #[error("synthetic data: {0}")]
    Generator(#[from] GeneratorError),

    #[error("batch worker failed: {0}")]
    Batch(String),
}

/// Where the replayed markets came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Synthetic,
    File,
    /// Loaded from a `--cache` file written by an earlier run
    Cached,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Synthetic => f.write_str("synthetic"),
            DataSource::File => f.write_str("file"),
            DataSource::Cached => f.write_str("cached"),
        }
    }
}

/// One sample of the equity curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EquityPoint {
    /// Unix seconds
    pub time: i64,
    #[serde(serialize_with = "serialize_money")]
    pub equity: Decimal,
}

impl EquityPoint {
    pub fn new(time: i64, equity: Decimal) -> Self {
        Self { time, equity }
    }
}
