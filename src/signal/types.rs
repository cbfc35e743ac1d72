//! Signal types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome side of a two-sided market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The "up" outcome token
    Up,
    /// The "down" outcome token
    Down,
}

impl Side {
    /// Both sides in detection order
    pub const ALL: [Side; 2] = [Side::Up, Side::Down];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Up => "up",
            Side::Down => "down",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per side, addressed by [`Side`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidePair<T> {
    pub up: T,
    pub down: T,
}

impl<T> SidePair<T> {
    pub fn new(up: T, down: T) -> Self {
        Self { up, down }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Up => &self.up,
            Side::Down => &self.down,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Up => &mut self.up,
            Side::Down => &mut self.down,
        }
    }
}

/// A detected flash crash on one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashCrashSignal {
    /// Side whose price dropped
    pub side: Side,
    /// Oldest price inside the lookback window
    pub reference_price: Decimal,
    /// Most recent price
    pub current_price: Decimal,
    /// `reference_price - current_price`
    pub drop: Decimal,
    /// Timestamp of the most recent price
    pub timestamp: i64,
}
