//! Backtest engine integration tests

use flash_crash_backtest::backtest::{
    BacktestConfig, BacktestResult, BacktestSimulator, DataSource,
};
use flash_crash_backtest::market::{Market, PriceTick};
use flash_crash_backtest::risk::ExitReason;
use flash_crash_backtest::signal::Side;
use flash_crash_backtest::synthetic::{
    generate_market, generate_markets, CrashScenario, RecoveryType, SyntheticConfig,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const START: i64 = 1_704_067_200;

fn batch_config() -> SyntheticConfig {
    SyntheticConfig {
        markets: 40,
        crash_probability: 0.35,
        seed: 42,
        ..Default::default()
    }
}

fn run(config: BacktestConfig, markets: &[Market]) -> BacktestResult {
    BacktestSimulator::new(config).unwrap().run(markets)
}

fn further_drop_market() -> Market {
    let crash = CrashScenario {
        crash_side: Side::Up,
        magnitude: 0.35,
        time_fraction: 0.5,
        recovery: RecoveryType::FurtherDrop,
    };
    generate_market("BTC-15min-0", 7, START, 900, Some(&crash))
}

#[test]
fn test_calm_market_has_no_trades() {
    let market = generate_market("BTC-15min-0", 42, START, 900, None);
    let result = run(BacktestConfig::default(), &[market]);

    assert!(result.trades.is_empty());
    assert_eq!(result.summary.final_equity, dec!(100));
    assert_eq!(result.summary.total_pnl, dec!(0));
    assert_eq!(result.equity_curve.first().map(|p| p.time), Some(START));
    assert_eq!(result.equity_curve.last().map(|p| p.time), Some(START + 900));
}

#[test]
fn test_ten_tick_calm_market_has_no_trades() {
    let market = generate_market("BTC-15min-0", 42, START, 10, None);
    let config = BacktestConfig {
        drop_threshold: dec!(0.3),
        lookback_seconds: 10,
        ..Default::default()
    };
    let result = run(config, &[market]);

    assert!(result.trades.is_empty());
    assert_eq!(result.markets_analyzed, 1);
    assert_eq!(result.summary.final_equity, dec!(100));
    // Initial point, the tenth and last tick, and market end
    assert_eq!(result.equity_curve.len(), 3);
}

#[test]
fn test_further_drop_crash_stops_out() {
    let config = BacktestConfig {
        drop_threshold: dec!(0.05),
        ..Default::default()
    };
    let result = run(config, &[further_drop_market()]);

    assert_eq!(result.trades.len(), 3);
    assert!(result
        .trades
        .iter()
        .all(|t| t.exit_reason == ExitReason::StopLoss && t.side == Side::Up));

    let first = &result.trades[0];
    assert_eq!(first.entry_price, dec!(0.3883));
    assert_eq!(first.exit_price, dec!(0.2738));
    assert_eq!(first.pnl.round_dp(4), dec!(-1.4744));

    // Each stop-out re-enters on the same tick at the stop price
    assert_eq!(result.trades[1].entry_price, dec!(0.2738));
    assert_eq!(result.trades[2].exit_price, dec!(0.1038));
    assert_eq!(result.summary.final_equity.round_dp(2), dec!(94.71));
    assert_eq!(result.summary.exit_counts.stop_loss, 3);
    assert_eq!(result.summary.win_rate, dec!(0));
}

#[test]
fn test_synthetic_batch_golden() {
    let markets = generate_markets(&batch_config()).unwrap();
    let result = run(BacktestConfig::default(), &markets);

    assert_eq!(result.markets_analyzed, 40);
    assert_eq!(result.data_source, DataSource::Synthetic);
    assert_eq!(result.trades.len(), 9);
    assert_eq!(result.summary.exit_counts.take_profit, 8);
    assert_eq!(result.summary.exit_counts.stop_loss, 1);
    assert_eq!(result.summary.exit_counts.market_end, 0);
    assert_eq!(result.summary.winning_trades, 8);
    assert_eq!(result.summary.final_equity.round_dp(2), dec!(139.84));

    let first = &result.trades[0];
    assert_eq!(first.market_slug, "BTC-15min-0");
    assert_eq!(first.side, Side::Down);
    assert_eq!(first.entry_price, dec!(0.2561));
    assert_eq!(first.exit_price, dec!(0.3632));

    let loser = result
        .trades
        .iter()
        .find(|t| t.exit_reason == ExitReason::StopLoss)
        .unwrap();
    assert_eq!(loser.market_slug, "ETH-15min-21");
}

#[test]
fn test_runs_are_deterministic() {
    let config = BacktestConfig {
        drop_threshold: dec!(0.05),
        ..Default::default()
    };
    let first = run(config.clone(), &generate_markets(&batch_config()).unwrap());
    let second = run(config, &generate_markets(&batch_config()).unwrap());

    assert_eq!(
        first.to_json_pretty().unwrap(),
        second.to_json_pretty().unwrap()
    );
}

#[test]
fn test_trade_invariants() {
    let config = BacktestConfig {
        drop_threshold: dec!(0.05),
        ..Default::default()
    };
    let markets = generate_markets(&batch_config()).unwrap();
    let result = run(config.clone(), &markets);
    assert_eq!(result.trades.len(), 58);

    // At most one position: trades never overlap in time
    for pair in result.trades.windows(2) {
        assert!(pair[1].entry_time >= pair[0].exit_time);
    }

    for trade in &result.trades {
        assert_eq!(
            trade.pnl,
            (trade.exit_price - trade.entry_price) * trade.size_in_shares
        );
        assert!(trade.exit_time >= trade.entry_time);
        match trade.exit_reason {
            ExitReason::TakeProfit => {
                assert!(trade.exit_price >= trade.entry_price + config.take_profit)
            }
            ExitReason::StopLoss => {
                assert!(trade.exit_price <= trade.entry_price - config.stop_loss)
            }
            ExitReason::MarketEnd => {
                let market = markets
                    .iter()
                    .find(|m| m.slug == trade.market_slug)
                    .unwrap();
                assert_eq!(trade.exit_time, market.end_time);
            }
        }
    }
}

#[test]
fn test_equity_conservation_and_drawdown() {
    let config = BacktestConfig {
        drop_threshold: dec!(0.05),
        ..Default::default()
    };
    let result = run(config, &generate_markets(&batch_config()).unwrap());
    let summary = &result.summary;

    // Summation order differs, so compare well past presentation precision
    let total: Decimal = result.trades.iter().map(|t| t.pnl).sum();
    assert_eq!(summary.total_pnl.round_dp(8), total.round_dp(8));
    assert_eq!(
        summary.final_equity.round_dp(8),
        (dec!(100) + total).round_dp(8)
    );
    assert_eq!(summary.exit_counts.total(), result.trades.len());
    assert_eq!(
        summary.winning_trades + summary.losing_trades,
        summary.total_trades
    );

    assert!(summary.max_drawdown_pct >= dec!(0));
    assert!(summary.max_drawdown_pct <= dec!(100));
    assert!(summary.peak_equity >= summary.final_equity);
    assert!(summary.peak_equity >= dec!(100));
    assert!(summary.avg_loss >= dec!(0));
    assert!(summary.gross_loss >= dec!(0));

    assert!(result.equity_curve.len() <= 201);
    assert_eq!(
        result.equity_curve.last().map(|p| p.equity),
        Some(summary.final_equity)
    );
}

#[test]
fn test_profit_factor_serializes_inf_without_losses() {
    let up: Vec<PriceTick> = [0.80, 0.80, 0.45, 0.50, 0.60]
        .iter()
        .enumerate()
        .map(|(i, p)| PriceTick::new(START + i as i64, Decimal::try_from(*p).unwrap()))
        .collect();
    let down: Vec<PriceTick> = up
        .iter()
        .map(|t| PriceTick::new(t.timestamp, dec!(1) - t.price))
        .collect();
    let market = Market {
        slug: "SOL-15min-0".into(),
        start_time: START,
        end_time: START + 5,
        up_prices: up,
        down_prices: down,
        crash: None,
    };

    let result = run(BacktestConfig::default(), &[market]);
    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].exit_reason, ExitReason::TakeProfit);

    let value: serde_json::Value =
        serde_json::from_str(&result.to_json_pretty().unwrap()).unwrap();
    assert_eq!(value["summary"]["profit_factor"], "inf");
    assert_eq!(value["summary"]["exit_counts"]["stop_loss"], 0);
    assert_eq!(value["summary"]["exit_counts"]["market_end"], 0);
}

#[test]
fn test_result_document_shape() {
    let result = run(BacktestConfig::default(), &[]);
    let value = serde_json::to_value(&result).unwrap();

    for key in [
        "config",
        "data_source",
        "markets_analyzed",
        "summary",
        "trades",
        "equity_curve",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    for key in [
        "total_pnl",
        "return_pct",
        "win_rate",
        "profit_factor",
        "max_drawdown_pct",
        "max_drawdown_dollars",
        "sharpe_ratio",
        "exit_counts",
    ] {
        assert!(value["summary"].get(key).is_some(), "missing summary.{key}");
    }
    assert_eq!(value["summary"]["profit_factor"], 0.0);
    assert_eq!(value["summary"]["exit_counts"]["take_profit"], 0);
}

#[test]
fn test_empty_markets_are_counted() {
    let empty = Market {
        slug: "XRP-15min-0".into(),
        start_time: START,
        end_time: START + 900,
        up_prices: vec![],
        down_prices: vec![],
        crash: None,
    };
    let calm = generate_market("BTC-15min-1", 43, START + 900, 900, None);
    let result = run(BacktestConfig::default(), &[empty, calm]);

    assert_eq!(result.markets_analyzed, 2);
    assert_eq!(result.equity_curve.first().map(|p| p.time), Some(START));
}
