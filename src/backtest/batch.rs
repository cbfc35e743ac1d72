//! Parallel batch runs
//!
//! Each job generates its own synthetic markets and runs an independent
//! simulator on the blocking pool. Outcomes come back in submission order.

use super::{BacktestConfig, BacktestError, BacktestResult, BacktestSimulator, DataSource};
use crate::synthetic::{generate_markets, SyntheticConfig};
use tokio::task::JoinSet;

/// One parameter set to evaluate
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub label: String,
    pub backtest: BacktestConfig,
    pub synthetic: SyntheticConfig,
}

/// Result of one job
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub label: String,
    pub result: BacktestResult,
}

impl BatchJob {
    pub fn new(
        label: impl Into<String>,
        backtest: BacktestConfig,
        synthetic: SyntheticConfig,
    ) -> Self {
        Self {
            label: label.into(),
            backtest,
            synthetic,
        }
    }

    /// Generate markets and run the simulator on the current thread
    pub fn run(self) -> Result<BatchOutcome, BacktestError> {
        let simulator =
            BacktestSimulator::new(self.backtest)?.with_data_source(DataSource::Synthetic);
        let markets = generate_markets(&self.synthetic)?;
        let result = simulator.run(&markets);
        Ok(BatchOutcome {
            label: self.label,
            result,
        })
    }
}

/// Run every job concurrently, failing on the first error
pub async fn run_batch(jobs: Vec<BatchJob>) -> Result<Vec<BatchOutcome>, BacktestError> {
    let total = jobs.len();
    let mut set = JoinSet::new();
    for (index, job) in jobs.into_iter().enumerate() {
        set.spawn_blocking(move || (index, job.run()));
    }

    let mut slots: Vec<Option<BatchOutcome>> = vec![None; total];
    while let Some(joined) = set.join_next().await {
        let (index, outcome) = joined.map_err(|e| BacktestError::Batch(e.to_string()))?;
        slots[index] = Some(outcome?);
    }

    tracing::info!(jobs = total, "Batch complete");
    Ok(slots.into_iter().flatten().collect())
}
