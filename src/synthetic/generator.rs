//! Synthetic up/down price paths with scripted flash crashes
//!
//! The up price follows a small Gaussian random walk. A crash, when
//! scheduled, is spread over three ticks and followed by a recovery phase
//! whose shape depends on [`RecoveryType`]. The down price mirrors the up
//! price with independent noise.

use super::{GeneratorError, Lcg, SyntheticConfig};
use crate::market::{Market, PriceTick};
use crate::signal::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market name prefixes cycled through when building slugs
pub const MARKET_NAMES: [&str; 4] = ["BTC", "ETH", "SOL", "XRP"];

const WALK_SIGMA: f64 = 0.003;
const DOWN_NOISE_SIGMA: f64 = 0.005;
const DRIFT_SIGMA: f64 = 0.0005;
const CRASH_TICKS: u32 = 3;
const PRICE_FLOOR: f64 = 0.02;
const PRICE_CEILING: f64 = 0.98;
const PRICE_DP: u32 = 4;

/// What happens to the price after a crash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryType {
    /// Recovers 60-90% of the drop
    Full,
    /// Recovers 20-40% of the drop
    Partial,
    /// Drifts on small noise
    #[serde(rename = "none")]
    NoRecovery,
    /// Keeps falling by another 20-50% of the drop
    FurtherDrop,
}

impl RecoveryType {
    /// Map a uniform draw onto the 0.4/0.2/0.2/0.2 buckets
    pub fn from_unit(r: f64) -> Self {
        if r < 0.4 {
            RecoveryType::Full
        } else if r < 0.6 {
            RecoveryType::Partial
        } else if r < 0.8 {
            RecoveryType::NoRecovery
        } else {
            RecoveryType::FurtherDrop
        }
    }

    fn fraction_range(&self) -> Option<(f64, f64)> {
        match self {
            RecoveryType::Full => Some((0.6, 0.9)),
            RecoveryType::Partial => Some((0.2, 0.4)),
            RecoveryType::NoRecovery => None,
            RecoveryType::FurtherDrop => Some((0.2, 0.5)),
        }
    }
}

/// A scripted crash-and-recovery pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrashScenario {
    /// Side whose price crashes
    pub crash_side: Side,
    /// Total price drop spread over the crash window
    pub magnitude: f64,
    /// Position of the crash within the market, as a fraction of its duration
    pub time_fraction: f64,
    /// Post-crash behaviour
    pub recovery: RecoveryType,
}

/// Outer-generator draws for one market of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct MarketPlan {
    pub slug: String,
    /// Seed for the market's own price-path generator
    pub seed: u64,
    pub start_time: i64,
    /// Present when a crash was scheduled
    pub crash: Option<CrashScenario>,
}

/// Draw the per-market parameters for a batch without building price paths
pub fn plan_markets(config: &SyntheticConfig) -> Result<Vec<MarketPlan>, GeneratorError> {
    config.validate()?;

    let mut rng = Lcg::new(config.seed);
    let duration = i64::from(config.duration_seconds);
    let base = config.start_time.timestamp();

    let plans = (0..config.markets)
        .map(|i| {
            let has_crash = rng.uniform(0.0, 1.0) < config.crash_probability;
            let crash_side = rng.choice(&Side::ALL).copied().unwrap_or(Side::Up);
            let magnitude = rng.uniform(0.20, 0.45);
            let time_fraction = rng.uniform(0.15, 0.75);
            let recovery = RecoveryType::from_unit(rng.uniform(0.0, 1.0));

            MarketPlan {
                slug: format!("{}-15min-{}", MARKET_NAMES[i % MARKET_NAMES.len()], i),
                seed: config.seed.wrapping_add(i as u64),
                start_time: base + i as i64 * duration,
                crash: has_crash.then_some(CrashScenario {
                    crash_side,
                    magnitude,
                    time_fraction,
                    recovery,
                }),
            }
        })
        .collect();

    Ok(plans)
}

/// Generate a batch of independent synthetic markets
pub fn generate_markets(config: &SyntheticConfig) -> Result<Vec<Market>, GeneratorError> {
    let plans = plan_markets(config)?;
    let crashes = plans.iter().filter(|p| p.crash.is_some()).count();

    let markets: Vec<Market> = plans
        .into_iter()
        .map(|plan| {
            generate_market(
                plan.slug,
                plan.seed,
                plan.start_time,
                config.duration_seconds,
                plan.crash.as_ref(),
            )
        })
        .collect();

    tracing::info!(
        markets = markets.len(),
        crashes,
        seed = config.seed,
        "Generated synthetic markets"
    );

    Ok(markets)
}

/// Build one market's up/down price paths from its own seed
pub fn generate_market(
    slug: impl Into<String>,
    seed: u64,
    start_time: i64,
    duration_seconds: u32,
    crash: Option<&CrashScenario>,
) -> Market {
    let mut rng = Lcg::new(seed);

    let mut up = 0.5 + rng.uniform(-0.05, 0.05);
    let recovery_ticks = rng.randint(30, 120) as u32;
    let recovery_fraction = crash
        .and_then(|c| c.recovery.fraction_range())
        .map(|(lo, hi)| rng.uniform(lo, hi))
        .unwrap_or(0.0);

    let crash_tick = crash
        .map(|c| (f64::from(duration_seconds) * c.time_fraction).floor() as u32)
        .unwrap_or(0);
    let recovery_start = crash_tick + CRASH_TICKS;
    let recovery_end = recovery_start + recovery_ticks;

    let capacity = duration_seconds as usize;
    let mut up_prices = Vec::with_capacity(capacity);
    let mut down_prices = Vec::with_capacity(capacity);

    for tick in 0..duration_seconds {
        up += rng.gauss(0.0, WALK_SIGMA);

        if let Some(c) = crash {
            // Effect on the up price: an up-side crash pushes it down
            let direction = match c.crash_side {
                Side::Up => -1.0,
                Side::Down => 1.0,
            };

            if (crash_tick..recovery_start).contains(&tick) {
                up += direction * (c.magnitude / f64::from(CRASH_TICKS));
            } else if (recovery_start..recovery_end).contains(&tick) {
                let step = c.magnitude * recovery_fraction / f64::from(recovery_ticks);
                match c.recovery {
                    RecoveryType::Full | RecoveryType::Partial => up -= direction * step,
                    RecoveryType::NoRecovery => up += rng.gauss(0.0, DRIFT_SIGMA),
                    RecoveryType::FurtherDrop => up += direction * step,
                }
            }
        }

        up = up.clamp(PRICE_FLOOR, PRICE_CEILING);
        let down = (1.0 - up + rng.gauss(0.0, DOWN_NOISE_SIGMA)).clamp(PRICE_FLOOR, PRICE_CEILING);

        let timestamp = start_time + i64::from(tick);
        up_prices.push(PriceTick::new(timestamp, round_price(up)));
        down_prices.push(PriceTick::new(timestamp, round_price(down)));
    }

    Market {
        slug: slug.into(),
        start_time,
        end_time: start_time + i64::from(duration_seconds),
        up_prices,
        down_prices,
        crash: crash.copied(),
    }
}

/// Round an `f64` price to 4 dp, half to even, on its exact binary value
fn round_price(price: f64) -> Decimal {
    Decimal::from_f64_retain(price)
        .unwrap_or_default()
        .round_dp(PRICE_DP)
}
