// Unified error handling for the exchange simulator
//
// Replaces exception-style unwinding with a result type: bad records are
// skipped and counted, rejected orders are reported to the submitter, and no
// failure path aborts a running session.

use std::io;

/// Main error type for the simulator
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A delimited record had the wrong field count or a non-numeric
    /// price/amount. The decoder skips the record and keeps going.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// A negative quantity was passed to a ledger credit.
    #[error("invalid amount: {0}")]
    InvalidAmount(f64),

    /// An admission check or settlement debit failed.
    #[error("insufficient funds: need {required} {asset}, have {available}")]
    InsufficientFunds {
        asset: String,
        required: f64,
        available: f64,
    },

    /// A product identifier was not of the form BASE/QUOTE.
    #[error("malformed product identifier: {0}")]
    MalformedProduct(String),

    /// The order data file could not be read.
    #[error("failed to read data file {path}: {source}")]
    DataFile { path: String, source: io::Error },

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Bad interactive input (wrong shape, not an order problem).
    #[error("bad input: {0}")]
    BadInput(String),
}

/// Result type alias using SimError
pub type SimResult<T> = Result<T, SimError>;
