//! Signal generation module
//!
//! Detects flash crashes from a sliding window of recent prices

mod detector;
mod history;
mod types;

pub use detector::{DetectorConfig, FlashCrashDetector};
pub use history::{PriceHistory, PricePoint, DEFAULT_HISTORY_CAPACITY};
pub use types::{FlashCrashSignal, Side, SidePair};
