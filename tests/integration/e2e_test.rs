//! End-to-end integration tests

use flash_crash_backtest::backtest::{
    run_batch, BacktestConfig, BacktestSimulator, BatchJob, DataSource,
};
use flash_crash_backtest::cli::BacktestArgs;
use flash_crash_backtest::config::{Config, OutputFormat};
use flash_crash_backtest::data::{load_markets, save_markets};
use flash_crash_backtest::synthetic::{generate_markets, SyntheticConfig};
use rust_decimal_macros::dec;
use std::io::Write;

fn synthetic(markets: usize, seed: u64) -> SyntheticConfig {
    SyntheticConfig {
        markets,
        crash_probability: 0.35,
        seed,
        ..Default::default()
    }
}

#[test]
fn test_config_example_loads() {
    let config = Config::load("config.toml.example").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_file_overrides() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [backtest]
        drop_threshold = 0.05
        stop_loss = 0.08

        [synthetic]
        markets = 12

        [output]
        format = "json"
        "#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.backtest.drop_threshold, dec!(0.05));
    assert_eq!(config.backtest.stop_loss, dec!(0.08));
    assert_eq!(config.backtest.take_profit, dec!(0.10));
    assert_eq!(config.synthetic.markets, 12);
    assert_eq!(config.synthetic.seed, 42);
    assert_eq!(config.output.format, OutputFormat::Json);
}

#[test]
fn test_market_file_replays_like_generator() {
    let markets = generate_markets(&synthetic(10, 42)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("markets.json");
    save_markets(&path, &markets).unwrap();

    let loaded = load_markets(&path).unwrap();
    assert_eq!(loaded, markets);
    assert_eq!(
        loaded.iter().filter(|m| m.crash.is_some()).count(),
        markets.iter().filter(|m| m.crash.is_some()).count()
    );

    let config = BacktestConfig {
        drop_threshold: dec!(0.05),
        ..Default::default()
    };
    let from_memory = BacktestSimulator::new(config.clone()).unwrap().run(&markets);
    let from_file = BacktestSimulator::new(config)
        .unwrap()
        .with_data_source(DataSource::File)
        .run(&loaded);

    assert_eq!(from_file.data_source, DataSource::File);
    assert_eq!(from_file.trades, from_memory.trades);
    assert_eq!(from_file.equity_curve, from_memory.equity_curve);
}

#[test]
fn test_backtest_command_writes_file_result() {
    let dir = tempfile::tempdir().unwrap();
    let markets_path = dir.path().join("markets.json");
    let output_path = dir.path().join("out").join("result.json");

    let markets = generate_markets(&synthetic(4, 7)).unwrap();
    std::fs::write(
        &markets_path,
        serde_json::json!({ "markets": markets }).to_string(),
    )
    .unwrap();

    let args = BacktestArgs {
        markets_file: Some(markets_path),
        drop_threshold: Some(dec!(0.05)),
        format: Some(OutputFormat::Json),
        output: Some(output_path.clone()),
        ..Default::default()
    };
    args.execute(&Config::default()).unwrap();

    let document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(document["data_source"], "file");
    assert_eq!(document["markets_analyzed"], 4);
    assert_eq!(document["config"]["drop_threshold"], 0.05);
    assert!(document["equity_curve"].as_array().is_some_and(|c| !c.is_empty()));
}

#[test]
fn test_backtest_command_cache_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache").join("markets.json");
    let first_out = dir.path().join("first.json");
    let second_out = dir.path().join("second.json");

    let run = |output: &std::path::Path| {
        let args = BacktestArgs {
            markets: Some(6),
            seed: Some(3),
            cache: Some(cache.clone()),
            drop_threshold: Some(dec!(0.05)),
            format: Some(OutputFormat::Json),
            output: Some(output.to_path_buf()),
            ..Default::default()
        };
        args.execute(&Config::default()).unwrap();
        let text = std::fs::read_to_string(output).unwrap();
        serde_json::from_str::<serde_json::Value>(&text).unwrap()
    };

    let first = run(&first_out);
    assert_eq!(first["data_source"], "synthetic");
    assert_eq!(load_markets(&cache).unwrap().len(), 6);

    let second = run(&second_out);
    assert_eq!(second["data_source"], "cached");
    assert_eq!(second["markets_analyzed"], 6);
    assert_eq!(second["trades"], first["trades"]);
    assert_eq!(second["summary"], first["summary"]);
}

#[test]
fn test_backtest_command_missing_file() {
    let args = BacktestArgs {
        markets_file: Some("/nonexistent/markets.json".into()),
        ..Default::default()
    };
    assert!(args.execute(&Config::default()).is_err());
}

#[tokio::test]
async fn test_batch_jobs_are_isolated() {
    let jobs = vec![
        BatchJob::new("a", BacktestConfig::default(), synthetic(8, 1)),
        BatchJob::new("b", BacktestConfig::default(), synthetic(8, 2)),
        BatchJob::new("a-again", BacktestConfig::default(), synthetic(8, 1)),
    ];
    let outcomes = run_batch(jobs).await.unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes[0].result.to_json_pretty().unwrap(),
        outcomes[2].result.to_json_pretty().unwrap()
    );

    let sequential = BacktestSimulator::new(BacktestConfig::default())
        .unwrap()
        .run(&generate_markets(&synthetic(8, 2)).unwrap());
    assert_eq!(outcomes[1].result.trades, sequential.trades);
}
