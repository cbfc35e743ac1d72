//! Presentation rounding
//!
//! The engine keeps full decimal precision. Values are rounded only when
//! a result is serialized or printed: money and percentages to 2 dp, prices
//! to 4 dp, share counts to 2 dp. Rounding is half to even.

use rust_decimal::Decimal;
use serde::Serializer;

pub const MONEY_DP: u32 = 2;
pub const PERCENT_DP: u32 = 2;
pub const RATIO_DP: u32 = 2;
pub const PRICE_DP: u32 = 4;
pub const SHARES_DP: u32 = 2;

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp(MONEY_DP)
}

pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp(PRICE_DP)
}

pub fn round_shares(value: Decimal) -> Decimal {
    value.round_dp(SHARES_DP)
}

pub fn round_percent(value: Decimal) -> Decimal {
    value.round_dp(PERCENT_DP)
}

pub fn round_ratio(value: Decimal) -> Decimal {
    value.round_dp(RATIO_DP)
}

/// Serialize as a JSON number rounded to 2 dp
pub fn serialize_money<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    rust_decimal::serde::float::serialize(&round_money(*value), serializer)
}

/// Serialize as a JSON number rounded to 4 dp
pub fn serialize_price<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    rust_decimal::serde::float::serialize(&round_price(*value), serializer)
}

/// Serialize as a JSON number rounded to 2 dp
pub fn serialize_shares<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    rust_decimal::serde::float::serialize(&round_shares(*value), serializer)
}

/// Serialize as a JSON number rounded to 2 dp
pub fn serialize_percent<S: Serializer>(
    value: &Decimal,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    rust_decimal::serde::float::serialize(&round_percent(*value), serializer)
}

/// Serialize as a JSON number rounded to 2 dp
pub fn serialize_ratio<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    rust_decimal::serde::float::serialize(&round_ratio(*value), serializer)
}
