//! Risk management module
//!
//! Position lifecycle, exit rules, and drawdown tracking

mod limits;
mod position;

pub use limits::DrawdownMonitor;
pub use position::{EntryParams, ExitFillPolicy, ExitReason, OpenPosition, Trade};
