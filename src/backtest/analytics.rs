//! Backtest analytics and reporting

use super::{BacktestConfig, DataSource, EquityPoint};
use crate::precision::{serialize_money, serialize_percent, serialize_ratio};
use crate::risk::{DrawdownMonitor, ExitReason, Trade};
use chrono::DateTime;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Serialize, Serializer};
use std::fmt;

/// Gross profit over gross loss
///
/// Infinite when there are winning trades but no losses. Serialized as the
/// string `"inf"` since JSON has no infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitFactor {
    Finite(Decimal),
    Infinite,
}

impl Default for ProfitFactor {
    fn default() -> Self {
        ProfitFactor::Finite(Decimal::ZERO)
    }
}

impl ProfitFactor {
    pub fn from_gross(gross_profit: Decimal, gross_loss: Decimal) -> Self {
        if gross_loss > Decimal::ZERO {
            ProfitFactor::Finite(gross_profit / gross_loss)
        } else if gross_profit > Decimal::ZERO {
            ProfitFactor::Infinite
        } else {
            ProfitFactor::Finite(Decimal::ZERO)
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, ProfitFactor::Infinite)
    }
}

impl Serialize for ProfitFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProfitFactor::Finite(value) => serialize_ratio(value, serializer),
            ProfitFactor::Infinite => serializer.serialize_str("inf"),
        }
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitFactor::Finite(value) => write!(f, "{:.2}", value),
            ProfitFactor::Infinite => f.write_str("inf"),
        }
    }
}

/// Trades closed per exit reason; every reason is always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExitCounts {
    pub take_profit: usize,
    pub stop_loss: usize,
    pub market_end: usize,
}

impl ExitCounts {
    pub fn record(&mut self, reason: ExitReason) {
        match reason {
            ExitReason::TakeProfit => self.take_profit += 1,
            ExitReason::StopLoss => self.stop_loss += 1,
            ExitReason::MarketEnd => self.market_end += 1,
        }
    }

    pub fn get(&self, reason: ExitReason) -> usize {
        match reason {
            ExitReason::TakeProfit => self.take_profit,
            ExitReason::StopLoss => self.stop_loss,
            ExitReason::MarketEnd => self.market_end,
        }
    }

    pub fn total(&self) -> usize {
        self.take_profit + self.stop_loss + self.market_end
    }
}

/// Summary statistics from backtest
#[derive(Debug, Clone, Default, Serialize)]
pub struct BacktestSummary {
    /// Sum of trade P&L
    #[serde(serialize_with = "serialize_money")]
    pub total_pnl: Decimal,
    /// Total P&L as a percentage of starting equity
    #[serde(serialize_with = "serialize_percent")]
    pub return_pct: Decimal,
    pub total_trades: usize,
    /// Trades with P&L >= 0
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Win rate percentage
    #[serde(serialize_with = "serialize_percent")]
    pub win_rate: Decimal,
    #[serde(serialize_with = "serialize_percent")]
    pub loss_rate: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub avg_win: Decimal,
    /// Average losing trade as a positive magnitude
    #[serde(serialize_with = "serialize_money")]
    pub avg_loss: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub gross_profit: Decimal,
    /// Sum of losing P&L as a positive magnitude
    #[serde(serialize_with = "serialize_money")]
    pub gross_loss: Decimal,
    pub profit_factor: ProfitFactor,
    /// Maximum drawdown (percentage of peak)
    #[serde(serialize_with = "serialize_percent")]
    pub max_drawdown_pct: Decimal,
    /// Maximum drawdown (absolute)
    #[serde(serialize_with = "serialize_money")]
    pub max_drawdown_dollars: Decimal,
    /// Per-trade Sharpe ratio, not annualized
    #[serde(serialize_with = "serialize_ratio")]
    pub sharpe_ratio: Decimal,
    /// Average trade duration in seconds
    pub avg_trade_duration_secs: i64,
    pub exit_counts: ExitCounts,
    #[serde(serialize_with = "serialize_money")]
    pub final_equity: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub peak_equity: Decimal,
}

impl BacktestSummary {
    /// Aggregate closed trades into summary statistics
    pub fn from_trades(
        trades: &[Trade],
        starting_equity: Decimal,
        final_equity: Decimal,
        drawdown: &DrawdownMonitor,
    ) -> Self {
        let total_trades = trades.len();
        let mut exit_counts = ExitCounts::default();
        let mut gross_profit = Decimal::ZERO;
        let mut gross_loss = Decimal::ZERO;
        let mut winning_trades = 0usize;
        let mut total_duration = 0i64;

        for trade in trades {
            exit_counts.record(trade.exit_reason);
            total_duration += trade.duration_secs();
            if trade.is_win() {
                winning_trades += 1;
                gross_profit += trade.pnl;
            } else {
                gross_loss -= trade.pnl;
            }
        }
        let losing_trades = total_trades - winning_trades;
        let total_pnl = gross_profit - gross_loss;

        let ratio = |count: usize| {
            if total_trades == 0 {
                Decimal::ZERO
            } else {
                Decimal::from(count) / Decimal::from(total_trades) * dec!(100)
            }
        };
        let average = |sum: Decimal, count: usize| {
            if count == 0 {
                Decimal::ZERO
            } else {
                sum / Decimal::from(count)
            }
        };

        let return_pct = if starting_equity > Decimal::ZERO {
            total_pnl / starting_equity * dec!(100)
        } else {
            Decimal::ZERO
        };

        Self {
            total_pnl,
            return_pct,
            total_trades,
            winning_trades,
            losing_trades,
            win_rate: ratio(winning_trades),
            loss_rate: ratio(losing_trades),
            avg_win: average(gross_profit, winning_trades),
            avg_loss: average(gross_loss, losing_trades),
            gross_profit,
            gross_loss,
            profit_factor: ProfitFactor::from_gross(gross_profit, gross_loss),
            max_drawdown_pct: drawdown.max_drawdown_pct,
            max_drawdown_dollars: drawdown.max_drawdown,
            sharpe_ratio: sharpe_ratio(trades),
            avg_trade_duration_secs: if total_trades == 0 {
                0
            } else {
                total_duration / total_trades as i64
            },
            exit_counts,
            final_equity,
            peak_equity: drawdown.peak_equity,
        }
    }
}

/// Mean over sample standard deviation of per-trade P&L
///
/// Zero with fewer than two trades or when every trade made the same P&L.
pub fn sharpe_ratio(trades: &[Trade]) -> Decimal {
    if trades.len() < 2 {
        return Decimal::ZERO;
    }

    let n = Decimal::from(trades.len());
    let mean = trades.iter().map(|t| t.pnl).sum::<Decimal>() / n;
    let variance = trades
        .iter()
        .map(|t| (t.pnl - mean) * (t.pnl - mean))
        .sum::<Decimal>()
        / (n - Decimal::ONE);

    if variance <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let std_dev = variance.to_f64().unwrap_or(0.0).sqrt();
    if std_dev <= 0.0 {
        return Decimal::ZERO;
    }
    let sharpe = mean.to_f64().unwrap_or(0.0) / std_dev;
    Decimal::from_f64(sharpe).unwrap_or_default()
}

/// Keep at most about `target` points, always retaining the last one
pub fn downsample(points: &[EquityPoint], target: usize) -> Vec<EquityPoint> {
    let Some(last) = points.last() else {
        return Vec::new();
    };

    let stride = (points.len() / target.max(1)).max(1);
    let mut sampled: Vec<EquityPoint> = points.iter().step_by(stride).copied().collect();
    if (points.len() - 1) % stride != 0 {
        sampled.push(*last);
    }
    sampled
}

/// Complete backtest results
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub config: BacktestConfig,
    pub data_source: DataSource,
    /// Every market handed to the run, including skipped ones
    pub markets_analyzed: usize,
    pub summary: BacktestSummary,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl BacktestResult {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        let s = &self.summary;
        let period = match (self.equity_curve.first(), self.equity_curve.last()) {
            (Some(first), Some(last)) => {
                format!("{} → {}", format_time(first.time), format_time(last.time))
            }
            _ => "n/a".to_string(),
        };

        format!(
            r#"
══════════════════════════════════════════════════════
               FLASH CRASH BACKTEST
══════════════════════════════════════════════════════

SETUP
───────────────────────────────────────────────────────
Data Source:      {}
Markets:          {}
Period:           {}
Drop Threshold:   {:.2} in {}s
TP / SL:          +{:.2} / -{:.2}
Position Size:    ${:.2}

PERFORMANCE
───────────────────────────────────────────────────────
Total P&L:        {:+.2} ({:+.2}%)
Final Equity:     {:.2} (peak {:.2})
Sharpe Ratio:     {:.2}
Max Drawdown:     {:.2} ({:.2}%)
Win Rate:         {:.2}%
Avg Win / Loss:   {:.2} / {:.2}
Profit Factor:    {}

ACTIVITY
───────────────────────────────────────────────────────
Total Trades:     {} ({} won, {} lost)
Take Profit:      {}
Stop Loss:        {}
Market End:       {}
Avg Duration:     {}s
══════════════════════════════════════════════════════
"#,
            self.data_source,
            self.markets_analyzed,
            period,
            self.config.drop_threshold,
            self.config.lookback_seconds,
            self.config.take_profit,
            self.config.stop_loss,
            self.config.position_size,
            s.total_pnl,
            s.return_pct,
            s.final_equity,
            s.peak_equity,
            s.sharpe_ratio,
            s.max_drawdown_dollars,
            s.max_drawdown_pct,
            s.win_rate,
            s.avg_win,
            s.avg_loss,
            s.profit_factor,
            s.total_trades,
            s.winning_trades,
            s.losing_trades,
            s.exit_counts.take_profit,
            s.exit_counts.stop_loss,
            s.exit_counts.market_end,
            s.avg_trade_duration_secs,
        )
    }
}

fn format_time(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}
