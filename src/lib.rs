//! flash-crash-backtest: flash crash strategy backtester for Polymarket up/down markets
//!
//! This library provides the core components for:
//! - Deterministic synthetic market generation
//! - Market file loading and tick replay
//! - Flash crash detection over a rolling lookback window
//! - Single-position simulation with take-profit, stop-loss and market-end exits
//! - Performance analytics and reporting
//! - Concurrent parameter sweeps
//! - Logging and metrics

pub mod backtest;
pub mod cli;
pub mod config;
pub mod data;
pub mod market;
pub mod precision;
pub mod risk;
pub mod signal;
pub mod synthetic;
pub mod telemetry;
