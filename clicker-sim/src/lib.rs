//! Clicker Economy Simulator
//!
//! Time-stepped economy of an incremental clicker game. A production rate
//! accumulates a resource over continuous time; a [`Policy`] repeatedly picks
//! an upgrade from a [`Catalog`]; purchases spend the resource and raise the
//! rate. This crate holds the core only: no presentation, no I/O beyond
//! loading catalog definitions.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod policy;
pub mod state;

// Re-export commonly used types
pub use catalog::{
    BuildCatalog, BuildItem, Catalog, CatalogView, DEFAULT_GROWTH_FACTOR, ItemQuote,
};
pub use engine::{
    DEFAULT_DURATION, DEFAULT_MAX_PURCHASES, RunOutcome, SimulationConfig, SimulationEngine,
    Termination, run,
};
pub use error::{CatalogError, SimError};
pub use policy::{
    BestReturnPolicy, CheapestPolicy, DEFAULT_NAIVE_ITEM, ExpensivePolicy, NaiveFirstPolicy,
    NoPurchasePolicy, Policy, Snapshot, Strategy, UnknownStrategy,
};
pub use state::{HistoryEntry, INITIAL_RATE, SimulationState};
