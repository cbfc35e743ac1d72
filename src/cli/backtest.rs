//! Backtest command implementation

use crate::backtest::{BacktestResult, BacktestSimulator, DataSource};
use crate::config::{Config, OutputFormat};
use crate::data::{load_markets, save_markets};
use crate::market::Market;
use crate::risk::ExitFillPolicy;
use crate::synthetic::generate_markets;
use clap::Args;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub struct BacktestArgs {
    /// Number of synthetic markets
    #[arg(long)]
    pub markets: Option<usize>,

    /// Probability that a synthetic market contains a crash
    #[arg(long = "crash-prob")]
    pub crash_prob: Option<f64>,

    /// Synthetic data seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Replay markets from a JSON file instead of generating them
    #[arg(long, conflicts_with_all = ["markets", "crash_prob", "seed"])]
    pub markets_file: Option<PathBuf>,

    /// Load markets from this file if it exists, otherwise generate and save them there
    #[arg(long, conflicts_with = "markets_file")]
    pub cache: Option<PathBuf>,

    /// Minimum drop within the lookback window to enter
    #[arg(long = "drop")]
    pub drop_threshold: Option<Decimal>,

    /// Lookback window in seconds
    #[arg(long)]
    pub lookback: Option<u32>,

    /// Take-profit offset
    #[arg(long = "tp")]
    pub take_profit: Option<Decimal>,

    /// Stop-loss offset
    #[arg(long = "sl")]
    pub stop_loss: Option<Decimal>,

    /// Quote currency per trade
    #[arg(long)]
    pub size: Option<Decimal>,

    /// Starting equity
    #[arg(long)]
    pub equity: Option<Decimal>,

    /// Exit fill policy
    #[arg(long, value_enum)]
    pub exit_fill: Option<ExitFillPolicy>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the JSON result document to this path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl BacktestArgs {
    /// Layer command-line overrides on top of the file configuration
    pub fn apply(&self, config: &Config) -> Config {
        let mut config = config.clone();

        let synthetic = &mut config.synthetic;
        if let Some(markets) = self.markets {
            synthetic.markets = markets;
        }
        if let Some(p) = self.crash_prob {
            synthetic.crash_probability = p;
        }
        if let Some(seed) = self.seed {
            synthetic.seed = seed;
        }

        let backtest = &mut config.backtest;
        if let Some(v) = self.drop_threshold {
            backtest.drop_threshold = v;
        }
        if let Some(v) = self.lookback {
            backtest.lookback_seconds = v;
        }
        if let Some(v) = self.take_profit {
            backtest.take_profit = v;
        }
        if let Some(v) = self.stop_loss {
            backtest.stop_loss = v;
        }
        if let Some(v) = self.size {
            backtest.position_size = v;
        }
        if let Some(v) = self.equity {
            backtest.starting_equity = v;
        }
        if let Some(v) = self.exit_fill {
            backtest.exit_fill = v;
        }

        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(path) = &self.output {
            config.output.path = Some(path.clone());
        }

        config
    }

    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let config = self.apply(config);
        let simulator = BacktestSimulator::new(config.backtest.clone())?;

        let (markets, source) = self.markets(&config)?;
        let result = simulator.with_data_source(source).run(&markets);

        if let Some(path) = &config.output.path {
            write_result(path, &result)?;
            tracing::info!(path = %path.display(), "Wrote backtest result");
        }

        match config.output.format {
            OutputFormat::Table => println!("{}", result.format_table()),
            OutputFormat::Json => println!("{}", result.to_json_pretty()?),
        }

        Ok(())
    }

    /// Resolve the markets to replay and where they came from
    pub fn markets(&self, config: &Config) -> anyhow::Result<(Vec<Market>, DataSource)> {
        if let Some(path) = &self.markets_file {
            return Ok((load_markets(path)?, DataSource::File));
        }

        match &self.cache {
            Some(path) if path.exists() => Ok((load_markets(path)?, DataSource::Cached)),
            cache => {
                let markets = generate_markets(&config.synthetic)?;
                if let Some(path) = cache {
                    save_markets(path, &markets)?;
                }
                Ok((markets, DataSource::Synthetic))
            }
        }
    }
}

/// Write the result document as pretty JSON, creating parent directories
pub fn write_result(path: &Path, result: &BacktestResult) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, result.to_json_pretty()?)?;
    Ok(())
}
