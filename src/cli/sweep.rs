//! Sweep command implementation

use crate::backtest::{run_batch, BacktestConfig, BatchJob, BatchOutcome};
use crate::config::Config;
use crate::synthetic::SyntheticConfig;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug, Default)]
pub struct SweepArgs {
    /// Drop thresholds to evaluate (comma separated)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub drops: Vec<Decimal>,

    /// Synthetic seeds to evaluate (comma separated)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub seeds: Vec<u64>,

    /// Number of synthetic markets per job
    #[arg(long)]
    pub markets: Option<usize>,

    /// Probability that a synthetic market contains a crash
    #[arg(long = "crash-prob")]
    pub crash_prob: Option<f64>,
}

impl SweepArgs {
    /// One job per (seed, drop) pair; empty lists fall back to the config value
    pub fn jobs(&self, config: &Config) -> Vec<BatchJob> {
        let drops = if self.drops.is_empty() {
            vec![config.backtest.drop_threshold]
        } else {
            self.drops.clone()
        };
        let seeds = if self.seeds.is_empty() {
            vec![config.synthetic.seed]
        } else {
            self.seeds.clone()
        };

        let mut jobs = Vec::with_capacity(drops.len() * seeds.len());
        for &seed in &seeds {
            for &drop in &drops {
                let backtest = BacktestConfig {
                    drop_threshold: drop,
                    ..config.backtest.clone()
                };
                let synthetic = SyntheticConfig {
                    seed,
                    markets: self.markets.unwrap_or(config.synthetic.markets),
                    crash_probability: self
                        .crash_prob
                        .unwrap_or(config.synthetic.crash_probability),
                    ..config.synthetic.clone()
                };
                jobs.push(BatchJob::new(
                    format!("seed={seed} drop={drop}"),
                    backtest,
                    synthetic,
                ));
            }
        }
        jobs
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let jobs = self.jobs(config);
        tracing::info!(jobs = jobs.len(), "Starting sweep");

        let outcomes = run_batch(jobs).await?;
        print!("{}", format_sweep(&outcomes));
        Ok(())
    }
}

/// One line per job
pub fn format_sweep(outcomes: &[BatchOutcome]) -> String {
    let mut out = format!(
        "{:<24} {:>7} {:>9} {:>10} {:>8} {:>9} {:>8}\n",
        "JOB", "TRADES", "WIN %", "P&L", "PF", "MAX DD %", "SHARPE"
    );
    for outcome in outcomes {
        let s = &outcome.result.summary;
        out.push_str(&format!(
            "{:<24} {:>7} {:>9.2} {:>+10.2} {:>8} {:>9.2} {:>8.2}\n",
            outcome.label,
            s.total_trades,
            s.win_rate,
            s.total_pnl,
            s.profit_factor.to_string(),
            s.max_drawdown_pct,
            s.sharpe_ratio,
        ));
    }
    out
}
