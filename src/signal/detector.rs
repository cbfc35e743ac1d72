//! Flash crash detection
//!
//! Tracks a bounded price history per side and fires when the price has
//! dropped by at least the threshold inside the lookback window.

use super::history::{PriceHistory, DEFAULT_HISTORY_CAPACITY};
use super::{FlashCrashSignal, Side, SidePair};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Minimum points on a side before detection runs
const MIN_POINTS: usize = 3;

/// Configuration for flash crash detection
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Minimum absolute price drop that counts as a crash
    pub drop_threshold: Decimal,
    /// Trailing window inspected for the reference price
    pub lookback_seconds: i64,
    /// Points retained per side
    pub history_capacity: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            drop_threshold: dec!(0.30),
            lookback_seconds: 10,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Windowed drop detector over both sides of one market
pub struct FlashCrashDetector {
    config: DetectorConfig,
    history: SidePair<PriceHistory>,
}

impl FlashCrashDetector {
    /// Create a detector with empty histories
    pub fn new(config: DetectorConfig) -> Self {
        let history = SidePair::new(
            PriceHistory::new(config.history_capacity),
            PriceHistory::new(config.history_capacity),
        );
        Self { config, history }
    }

    /// Record a price for one side. Non-positive prices are ignored.
    pub fn record(&mut self, side: Side, timestamp: i64, price: Decimal) {
        if price > Decimal::ZERO {
            self.history.get_mut(side).push(timestamp, price);
        }
    }

    /// Check `up` then `down`, returning the first side that crashed
    pub fn detect(&self) -> Option<FlashCrashSignal> {
        Side::ALL.iter().find_map(|&side| self.detect_side(side))
    }

    /// Evaluate a single side
    pub fn detect_side(&self, side: Side) -> Option<FlashCrashSignal> {
        let history = self.history.get(side);
        if history.len() < MIN_POINTS {
            return None;
        }

        let latest = history.latest()?;
        let cutoff = latest.timestamp - self.config.lookback_seconds;
        let reference = history.first_since(cutoff)?;

        let drop = reference.price - latest.price;
        if drop < self.config.drop_threshold {
            return None;
        }

        tracing::trace!(
            side = %side,
            reference = %reference.price,
            current = %latest.price,
            drop = %drop,
            "Flash crash detected"
        );

        Some(FlashCrashSignal {
            side,
            reference_price: reference.price,
            current_price: latest.price,
            drop,
            timestamp: latest.timestamp,
        })
    }

    /// Last recorded price on a side
    pub fn last_price(&self, side: Side) -> Option<Decimal> {
        self.history.get(side).latest().map(|p| p.price)
    }
}
