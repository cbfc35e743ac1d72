//! Tick replay for a single market
//!
//! Merges the up and down price series on timestamp and yields them in
//! ascending time order. A side without a sample at a given timestamp is
//! reported as `None`.

use crate::market::Market;
use crate::signal::{Side, SidePair};
use rust_decimal::Decimal;
use std::collections::{btree_map, BTreeMap};

/// Both sides' prices at one timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTick {
    pub timestamp: i64,
    pub prices: SidePair<Option<Decimal>>,
}

impl MergedTick {
    /// Price of `side` at this tick, if that side printed
    pub fn price(&self, side: Side) -> Option<Decimal> {
        *self.prices.get(side)
    }
}

/// Yields merged ticks in timestamp order
pub struct MarketReplay {
    ticks: btree_map::IntoIter<i64, SidePair<Option<Decimal>>>,
}

impl MarketReplay {
    pub fn new(market: &Market) -> Self {
        let mut merged: BTreeMap<i64, SidePair<Option<Decimal>>> = BTreeMap::new();
        for side in Side::ALL {
            for tick in market.prices(side) {
                let slot = merged
                    .entry(tick.timestamp)
                    .or_insert_with(|| SidePair::new(None, None));
                // Duplicate timestamps keep the later sample
                *slot.get_mut(side) = Some(tick.price);
            }
        }

        Self {
            ticks: merged.into_iter(),
        }
    }
}

impl Iterator for MarketReplay {
    type Item = MergedTick;

    fn next(&mut self) -> Option<Self::Item> {
        self.ticks
            .next()
            .map(|(timestamp, prices)| MergedTick { timestamp, prices })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ticks.size_hint()
    }
}
