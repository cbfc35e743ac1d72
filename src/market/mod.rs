//! Market data model
//!
//! A 15-minute two-sided binary market with one price series per side

use crate::signal::Side;
use crate::synthetic::CrashScenario;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single price observation for one side of a market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTick {
    /// Unix timestamp in seconds
    #[serde(alias = "t")]
    pub timestamp: i64,
    /// Outcome token price in [0, 1]
    #[serde(alias = "p", with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl PriceTick {
    pub fn new(timestamp: i64, price: Decimal) -> Self {
        Self { timestamp, price }
    }
}

/// A Polymarket-style up/down market window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Unique market identifier within a run
    pub slug: String,
    /// Window open time (unix seconds)
    #[serde(alias = "start_ts")]
    pub start_time: i64,
    /// Window close time (unix seconds)
    #[serde(alias = "end_ts")]
    pub end_time: i64,
    /// Up token prices in timestamp order
    #[serde(default)]
    pub up_prices: Vec<PriceTick>,
    /// Down token prices in timestamp order
    #[serde(default)]
    pub down_prices: Vec<PriceTick>,
    /// Scripted crash, for synthetic markets that carry one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crash: Option<CrashScenario>,
}

impl Market {
    /// Price series for one side
    pub fn prices(&self, side: Side) -> &[PriceTick] {
        match side {
            Side::Up => &self.up_prices,
            Side::Down => &self.down_prices,
        }
    }

    /// True when neither side has any ticks
    pub fn is_empty(&self) -> bool {
        self.up_prices.is_empty() && self.down_prices.is_empty()
    }
}
