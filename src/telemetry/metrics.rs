//! Backtest metrics
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! embedding application installs a recorder.

use crate::risk::ExitReason;

/// Counter metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMetric {
    /// Markets replayed to completion
    MarketsProcessed,
    /// Markets skipped for having no prices
    MarketsSkipped,
    /// Flash crash signals seen while flat
    SignalsDetected,
}

impl CounterMetric {
    pub fn name(&self) -> &'static str {
        match self {
            CounterMetric::MarketsProcessed => "flashcrash_markets_processed_total",
            CounterMetric::MarketsSkipped => "flashcrash_markets_skipped_total",
            CounterMetric::SignalsDetected => "flashcrash_signals_detected_total",
        }
    }
}

/// Gauge metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeMetric {
    /// Current equity
    Equity,
    /// Current drawdown percentage
    DrawdownPct,
    /// Open position count
    OpenPositions,
}

impl GaugeMetric {
    pub fn name(&self) -> &'static str {
        match self {
            GaugeMetric::Equity => "flashcrash_equity_usd",
            GaugeMetric::DrawdownPct => "flashcrash_drawdown_pct",
            GaugeMetric::OpenPositions => "flashcrash_open_positions",
        }
    }
}

const TRADES_CLOSED: &str = "flashcrash_trades_closed_total";

/// Register descriptions with whatever recorder is installed
pub fn describe_metrics() {
    metrics::describe_counter!(
        CounterMetric::MarketsProcessed.name(),
        "Markets replayed to completion"
    );
    metrics::describe_counter!(
        CounterMetric::MarketsSkipped.name(),
        "Markets skipped for having no prices"
    );
    metrics::describe_counter!(
        CounterMetric::SignalsDetected.name(),
        "Flash crash signals seen while flat"
    );
    metrics::describe_counter!(TRADES_CLOSED, "Trades closed, by exit reason");
    metrics::describe_gauge!(GaugeMetric::Equity.name(), "Current equity");
    metrics::describe_gauge!(GaugeMetric::DrawdownPct.name(), "Current drawdown percentage");
    metrics::describe_gauge!(GaugeMetric::OpenPositions.name(), "Open position count");
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    metrics::counter!(metric.name()).increment(1);
}

/// Count a closed trade under its exit reason
pub fn record_exit(reason: ExitReason) {
    metrics::counter!(TRADES_CLOSED, "exit_reason" => reason.as_str()).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    metrics::gauge!(metric.name()).set(value);
}
