// Exchange Simulator Library
//
// Replays historical order records for currency pairs, matches competing
// buy/sell interest at discrete time steps, and settles the resulting trades
// against a per-participant balance ledger.

pub mod book;        // Order records and the time-ordered session index
pub mod config;      // TOML configuration
pub mod data;        // Delimited record decoder
pub mod error;       // Unified error handling
pub mod simulation;  // Matching engine, ledger, session

// Re-export core types
pub use book::{BookIndex, OrderRecord, OwnerId, Side};
pub use simulation::{Ledger, MatchingEngine, ProductStats, SimSession};

// Re-export error types
pub use error::{SimError, SimResult};

// Re-export configuration
pub use config::{Config, ConfigError, DataConfig, LoggingConfig, SessionConfig};

// Re-export decoder entry points
pub use data::{load_order_records, parse_order_fields, LoadReport};
