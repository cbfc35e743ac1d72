//! Bounded price history

use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Default number of points retained per side
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

/// A recorded price observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePoint {
    pub timestamp: i64,
    pub price: Decimal,
}

/// FIFO price history that evicts the oldest point once full
#[derive(Debug, Clone)]
pub struct PriceHistory {
    points: VecDeque<PricePoint>,
    capacity: usize,
}

impl PriceHistory {
    /// Create an empty history holding at most `capacity` points
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting from the front past capacity
    pub fn push(&mut self, timestamp: i64, price: Decimal) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(PricePoint { timestamp, price });
    }

    /// Most recent point
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.back()
    }

    /// First point (oldest first) at or after `cutoff`
    pub fn first_since(&self, cutoff: i64) -> Option<&PricePoint> {
        self.points.iter().find(|p| p.timestamp >= cutoff)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

}

impl Default for PriceHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
