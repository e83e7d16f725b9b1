// Simulation: matching engine, balance ledger, and the session orchestrator

pub mod ledger;
pub mod matching_engine;
pub mod session;

pub use ledger::Ledger;
pub use matching_engine::MatchingEngine;
pub use session::{ProductStats, SimSession};
