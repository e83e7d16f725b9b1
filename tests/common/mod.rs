// Common test utilities and helpers

use std::collections::BTreeMap;
use std::path::PathBuf;

use exchange_sim::{Config, DataConfig, LoggingConfig, OrderRecord, OwnerId, SessionConfig, Side};
use tempfile::TempDir;

/// Create a test configuration with sensible defaults
pub fn create_test_config(csv_path: &str) -> Config {
    let mut opening_balances = BTreeMap::new();
    opening_balances.insert("BTC".to_string(), 10.0);

    Config {
        data: DataConfig {
            csv_path: csv_path.to_string(),
        },
        session: SessionConfig {
            participant: "local".to_string(),
            opening_balances,
        },
        logging: LoggingConfig {
            log_trades: false,
            log_rejections: false,
        },
    }
}

/// Build a market-owned order record
pub fn market_order(side: Side, product: &str, price: f64, amount: f64, ts: &str) -> OrderRecord {
    OrderRecord::new(side, product, price, amount, ts, OwnerId::market())
}

/// Write a data file into a temp directory, returning the directory guard
/// and the file path
pub fn write_data_file(lines: &[&str]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("orders.csv");
    std::fs::write(&path, lines.join("\n")).expect("Failed to write data file");
    (temp_dir, path)
}

/// A small two-timestamp dataset for one product
pub fn sample_dataset() -> Vec<&'static str> {
    vec![
        "2020/03/17 17:01:24,ETH/BTC,bid,0.02186299,0.1",
        "2020/03/17 17:01:24,ETH/BTC,ask,0.02187308,7.44564869",
        "2020/03/17 17:01:24,ETH/BTC,ask,0.02186299,0.56342042",
        "2020/03/17 17:01:30,ETH/BTC,bid,0.02187307,3.0",
        "2020/03/17 17:01:30,ETH/BTC,ask,0.02187305,1.0",
    ]
}
