//! Backtest simulator engine

use super::{
    analytics, BacktestConfig, BacktestError, BacktestResult, BacktestSummary, DataSource,
    EquityPoint, MarketReplay, MergedTick,
};
use crate::market::Market;
use crate::risk::{DrawdownMonitor, ExitReason, OpenPosition, Trade};
use crate::signal::{FlashCrashDetector, Side};
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Take an equity sample every N ticks across the whole run
const EQUITY_SAMPLE_INTERVAL: u64 = 10;

/// Points kept in the reported equity curve
const EQUITY_CURVE_POINTS: usize = 200;

/// Mutable account state threaded through a run
struct RunState {
    equity: Decimal,
    position: Option<OpenPosition>,
    trades: Vec<Trade>,
    equity_curve: Vec<EquityPoint>,
    drawdown: DrawdownMonitor,
    global_tick: u64,
}

impl RunState {
    fn new(starting_equity: Decimal, start_time: i64) -> Self {
        Self {
            equity: starting_equity,
            position: None,
            trades: Vec::new(),
            equity_curve: vec![EquityPoint::new(start_time, starting_equity)],
            drawdown: DrawdownMonitor::new(starting_equity),
            global_tick: 0,
        }
    }

    fn close_position(
        &mut self,
        position: OpenPosition,
        exit_price: Decimal,
        exit_time: i64,
        reason: ExitReason,
    ) {
        let trade = position.close(exit_price, exit_time, reason);
        self.equity += trade.pnl;
        self.drawdown.update(self.equity);

        tracing::debug!(
            market = %trade.market_slug,
            side = %trade.side,
            entry = %trade.entry_price,
            exit = %trade.exit_price,
            pnl = %trade.pnl,
            reason = %reason,
            "Position closed"
        );
        telemetry::record_exit(reason);
        telemetry::set_gauge(GaugeMetric::Equity, self.equity.to_f64().unwrap_or(0.0));
        telemetry::set_gauge(
            GaugeMetric::DrawdownPct,
            self.drawdown.current_drawdown_pct().to_f64().unwrap_or(0.0),
        );
        telemetry::set_gauge(GaugeMetric::OpenPositions, 0.0);

        self.trades.push(trade);
    }

    fn sample_equity(&mut self, time: i64) {
        self.equity_curve.push(EquityPoint::new(time, self.equity));
    }
}

/// Replays markets through the flash crash strategy
#[derive(Debug, Clone)]
pub struct BacktestSimulator {
    config: BacktestConfig,
    data_source: DataSource,
}

impl BacktestSimulator {
    /// Create a new simulator, rejecting invalid configs
    pub fn new(config: BacktestConfig) -> Result<Self, BacktestError> {
        config.validate()?;
        Ok(Self {
            config,
            data_source: DataSource::Synthetic,
        })
    }

    /// Label the provenance of the markets reported in the result
    pub fn with_data_source(mut self, data_source: DataSource) -> Self {
        self.data_source = data_source;
        self
    }

    /// Run the backtest over `markets` in the given order
    pub fn run(&self, markets: &[Market]) -> BacktestResult {
        let start_time = markets.first().map(|m| m.start_time).unwrap_or_default();
        let mut state = RunState::new(self.config.starting_equity, start_time);

        tracing::info!(
            markets = markets.len(),
            source = %self.data_source,
            drop_threshold = %self.config.drop_threshold,
            lookback_seconds = self.config.lookback_seconds,
            "Starting backtest"
        );

        for market in markets {
            self.run_market(&mut state, market);
        }

        let summary = BacktestSummary::from_trades(
            &state.trades,
            self.config.starting_equity,
            state.equity,
            &state.drawdown,
        );

        tracing::info!(
            trades = summary.total_trades,
            total_pnl = %summary.total_pnl.round_dp(2),
            win_rate = %summary.win_rate.round_dp(2),
            final_equity = %summary.final_equity.round_dp(2),
            "Backtest complete"
        );

        BacktestResult {
            config: self.config.clone(),
            data_source: self.data_source,
            markets_analyzed: markets.len(),
            summary,
            trades: state.trades,
            equity_curve: analytics::downsample(&state.equity_curve, EQUITY_CURVE_POINTS),
        }
    }

    fn run_market(&self, state: &mut RunState, market: &Market) {
        if market.is_empty() {
            tracing::debug!(market = %market.slug, "Skipping market without prices");
            telemetry::increment(CounterMetric::MarketsSkipped);
            return;
        }

        // Price history never carries across markets
        let mut detector = FlashCrashDetector::new(self.config.detector_config());
        let mut replay = MarketReplay::new(market).peekable();

        while let Some(tick) = replay.next() {
            self.process_tick(state, &mut detector, market, &tick);

            state.global_tick += 1;
            let last_tick = replay.peek().is_none();
            if state.global_tick % EQUITY_SAMPLE_INTERVAL == 0 || last_tick {
                state.sample_equity(tick.timestamp);
            }
        }

        if let Some(position) = state.position.take() {
            let exit_price = detector
                .last_price(position.side)
                .unwrap_or(position.entry_price);
            state.close_position(position, exit_price, market.end_time, ExitReason::MarketEnd);
        }
        state.sample_equity(market.end_time);

        telemetry::increment(CounterMetric::MarketsProcessed);
    }

    /// Record prices, then check exits, then look for an entry while flat
    fn process_tick(
        &self,
        state: &mut RunState,
        detector: &mut FlashCrashDetector,
        market: &Market,
        tick: &MergedTick,
    ) {
        for side in Side::ALL {
            if let Some(price) = tick.price(side) {
                detector.record(side, tick.timestamp, price);
            }
        }

        let exit = state.position.as_ref().and_then(|position| {
            let price = tick
                .price(position.side)
                .filter(|p| *p > Decimal::ZERO)?;
            let reason = position.exit_reason(price)?;
            let fill = self.config.exit_fill.fill_price(position, price, reason);
            Some((fill, reason))
        });
        if let Some((exit_price, reason)) = exit {
            if let Some(position) = state.position.take() {
                state.close_position(position, exit_price, tick.timestamp, reason);
            }
        }

        if state.position.is_some() {
            return;
        }

        let Some(signal) = detector.detect() else {
            return;
        };
        telemetry::increment(CounterMetric::SignalsDetected);

        let entry = tick.price(signal.side).and_then(|price| {
            OpenPosition::open(
                &market.slug,
                signal.side,
                price,
                tick.timestamp,
                &self.config.entry_params(),
            )
        });

        if let Some(position) = entry {
            tracing::debug!(
                market = %market.slug,
                side = %position.side,
                entry = %position.entry_price,
                drop = %signal.drop,
                "Position opened"
            );
            telemetry::set_gauge(GaugeMetric::OpenPositions, 1.0);
            state.position = Some(position);
        }
    }
}
