//! Position lifecycle
//!
//! A single long position in one outcome token, opened on a flash crash and
//! closed by take-profit, stop-loss or the end of its market.

use crate::precision::{serialize_money, serialize_price, serialize_shares};
use crate::signal::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a position was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    MarketEnd,
}

impl ExitReason {
    pub const ALL: [ExitReason; 3] = [
        ExitReason::TakeProfit,
        ExitReason::StopLoss,
        ExitReason::MarketEnd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::TakeProfit => "take_profit",
            ExitReason::StopLoss => "stop_loss",
            ExitReason::MarketEnd => "market_end",
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price used when a take-profit or stop-loss triggers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ExitFillPolicy {
    /// Fill at the price of the tick that crossed the level
    #[default]
    #[value(name = "tick_price")]
    TickPrice,
    /// Fill exactly at the take-profit or stop-loss level
    Boundary,
}

impl ExitFillPolicy {
    /// Exit price for a triggered level given the crossing tick's price
    pub fn fill_price(
        &self,
        position: &OpenPosition,
        tick_price: Decimal,
        reason: ExitReason,
    ) -> Decimal {
        match (self, reason) {
            (ExitFillPolicy::Boundary, ExitReason::TakeProfit) => position.take_profit_price,
            (ExitFillPolicy::Boundary, ExitReason::StopLoss) => position.stop_loss_price,
            _ => tick_price,
        }
    }
}

/// The one position a run may hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub market_slug: String,
    pub side: Side,
    pub entry_price: Decimal,
    pub entry_time: i64,
    /// Notional spent, in quote currency (USDC)
    pub size_in_quote_currency: Decimal,
    /// Outcome tokens bought
    pub size_in_shares: Decimal,
    pub take_profit_price: Decimal,
    pub stop_loss_price: Decimal,
}

/// Entry parameters shared by every position of a run
#[derive(Debug, Clone, Copy)]
pub struct EntryParams {
    /// Quote currency spent per trade
    pub position_size: Decimal,
    /// Absolute price offset above entry
    pub take_profit: Decimal,
    /// Absolute price offset below entry
    pub stop_loss: Decimal,
}

impl OpenPosition {
    /// Open a position, or `None` when the entry price or share count is not positive
    pub fn open(
        market_slug: &str,
        side: Side,
        entry_price: Decimal,
        entry_time: i64,
        params: &EntryParams,
    ) -> Option<Self> {
        if entry_price <= Decimal::ZERO {
            return None;
        }
        let size_in_shares = params.position_size.checked_div(entry_price)?;
        if size_in_shares <= Decimal::ZERO {
            return None;
        }

        Some(Self {
            market_slug: market_slug.to_string(),
            side,
            entry_price,
            entry_time,
            size_in_quote_currency: params.position_size,
            size_in_shares,
            take_profit_price: entry_price + params.take_profit,
            stop_loss_price: entry_price - params.stop_loss,
        })
    }

    /// Take-profit is checked before stop-loss
    pub fn exit_reason(&self, price: Decimal) -> Option<ExitReason> {
        if price >= self.take_profit_price {
            Some(ExitReason::TakeProfit)
        } else if price <= self.stop_loss_price {
            Some(ExitReason::StopLoss)
        } else {
            None
        }
    }

    /// Profit or loss if closed at `price`
    pub fn pnl_at(&self, price: Decimal) -> Decimal {
        (price - self.entry_price) * self.size_in_shares
    }

    /// Close into an immutable trade record
    pub fn close(self, exit_price: Decimal, exit_time: i64, exit_reason: ExitReason) -> Trade {
        let pnl = self.pnl_at(exit_price);
        Trade {
            market_slug: self.market_slug,
            side: self.side,
            entry_price: self.entry_price,
            exit_price,
            entry_time: self.entry_time,
            exit_time,
            size_in_quote_currency: self.size_in_quote_currency,
            size_in_shares: self.size_in_shares,
            pnl,
            exit_reason,
        }
    }
}

/// A completed round trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trade {
    pub market_slug: String,
    pub side: Side,
    #[serde(serialize_with = "serialize_price")]
    pub entry_price: Decimal,
    #[serde(serialize_with = "serialize_price")]
    pub exit_price: Decimal,
    pub entry_time: i64,
    pub exit_time: i64,
    #[serde(serialize_with = "serialize_money")]
    pub size_in_quote_currency: Decimal,
    #[serde(serialize_with = "serialize_shares")]
    pub size_in_shares: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub pnl: Decimal,
    pub exit_reason: ExitReason,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.pnl >= Decimal::ZERO
    }

    /// Seconds held
    pub fn duration_secs(&self) -> i64 {
        self.exit_time - self.entry_time
    }
}
