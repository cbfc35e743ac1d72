//! Synthetic data integration tests

use flash_crash_backtest::signal::Side;
use flash_crash_backtest::synthetic::{
    generate_markets, plan_markets, GeneratorError, Lcg, RecoveryType, SyntheticConfig,
};
use rust_decimal_macros::dec;

fn config(markets: usize, crash_probability: f64, seed: u64) -> SyntheticConfig {
    SyntheticConfig {
        markets,
        crash_probability,
        seed,
        ..Default::default()
    }
}

#[test]
fn test_prng_known_states() {
    let mut rng = Lcg::new(42);
    let states: Vec<u64> = (0..3).map(|_| rng.next_state()).collect();
    assert_eq!(states, vec![705_894, 1_126_542_223, 1_579_310_009]);
}

#[test]
fn test_batch_plan_golden() {
    let plans = plan_markets(&config(40, 0.35, 42)).unwrap();

    assert_eq!(plans.len(), 40);
    assert_eq!(plans.iter().filter(|p| p.crash.is_some()).count(), 16);

    let first = plans[0].crash.as_ref().unwrap();
    assert_eq!(first.crash_side, Side::Down);
    assert_eq!(first.recovery, RecoveryType::Full);
    assert!((first.magnitude - 0.383_855_883_017_048_15).abs() < 1e-12);
    assert!((first.time_fraction - 0.307_983_324_265_092).abs() < 1e-12);

    let fourth = plans[3].crash.as_ref().unwrap();
    assert_eq!(plans[3].slug, "XRP-15min-3");
    assert_eq!(fourth.crash_side, Side::Up);
    assert_eq!(fourth.recovery, RecoveryType::FurtherDrop);
}

#[test]
fn test_batch_layout() {
    let markets = generate_markets(&config(6, 0.3, 11)).unwrap();

    let slugs: Vec<&str> = markets.iter().map(|m| m.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec![
            "BTC-15min-0",
            "ETH-15min-1",
            "SOL-15min-2",
            "XRP-15min-3",
            "BTC-15min-4",
            "ETH-15min-5"
        ]
    );

    for (i, market) in markets.iter().enumerate() {
        assert_eq!(market.start_time, 1_704_067_200 + 900 * i as i64);
        assert_eq!(market.end_time, market.start_time + 900);
        assert_eq!(market.up_prices.len(), 900);
        assert_eq!(market.down_prices.len(), 900);
        for tick in market.up_prices.iter().chain(&market.down_prices) {
            assert!(tick.price >= dec!(0.02) && tick.price <= dec!(0.98));
            assert!(tick.timestamp >= market.start_time && tick.timestamp < market.end_time);
        }
    }
}

#[test]
fn test_generation_is_reproducible() {
    let a = generate_markets(&config(5, 0.5, 99)).unwrap();
    let b = generate_markets(&config(5, 0.5, 99)).unwrap();
    let c = generate_markets(&config(5, 0.5, 100)).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_market_depends_only_on_its_own_seed() {
    // Market i is generated from seed + i whatever the batch size
    let short = generate_markets(&config(2, 0.0, 42)).unwrap();
    let long = generate_markets(&config(8, 0.0, 42)).unwrap();
    assert_eq!(short[1], long[1]);
}

#[test]
fn test_crash_probability_extremes() {
    let never = plan_markets(&config(10, 0.0, 5)).unwrap();
    assert!(never.iter().all(|p| p.crash.is_none()));

    let always = plan_markets(&config(10, 1.0, 5)).unwrap();
    assert!(always.iter().all(|p| p.crash.is_some()));
}

#[test]
fn test_invalid_inputs() {
    assert!(matches!(
        generate_markets(&config(3, 1.5, 1)),
        Err(GeneratorError::InvalidProbability(_))
    ));

    let zero = SyntheticConfig {
        duration_seconds: 0,
        ..Default::default()
    };
    assert!(matches!(
        generate_markets(&zero),
        Err(GeneratorError::ZeroDuration)
    ));
}

#[test]
fn test_zero_markets() {
    assert!(generate_markets(&config(0, 0.3, 42)).unwrap().is_empty());
}
