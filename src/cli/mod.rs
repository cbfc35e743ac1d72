//! CLI interface for flash-crash-backtest
//!
//! Provides subcommands for:
//! - `backtest`: Run one backtest on synthetic or recorded markets
//! - `sweep`: Run a grid of synthetic backtests concurrently
//! - `config`: Show the effective configuration

mod backtest;
mod sweep;

pub use backtest::BacktestArgs;
pub use sweep::SweepArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "flash-crash-backtest")]
#[command(about = "Flash crash strategy backtester for Polymarket up/down markets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a backtest
    Backtest(BacktestArgs),
    /// Sweep drop thresholds and seeds
    Sweep(SweepArgs),
    /// Show configuration
    Config,
}
