pub mod reports;
pub mod runner;

pub use runner::{StrategyRun, resolve_strategies, run_strategies};
