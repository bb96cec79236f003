//! Simulation engine: drives a policy against a catalog for a fixed duration.
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::SimError;
use crate::policy::{Policy, Snapshot};
use crate::state::SimulationState;

/// Simulated duration used by the demonstration driver.
pub const DEFAULT_DURATION: f64 = 10_000_000_000.0;

/// Purchase cap used when none is configured.
pub const DEFAULT_MAX_PURCHASES: usize = 1_000_000;

/// Run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "SimulationConfig::default_duration")]
    pub duration: f64,
    /// Upper bound on purchases per run; reaching it ends the run normally.
    #[serde(default = "SimulationConfig::default_max_purchases")]
    pub max_purchases: usize,
}

impl SimulationConfig {
    const fn default_duration() -> f64 {
        DEFAULT_DURATION
    }

    const fn default_max_purchases() -> usize {
        DEFAULT_MAX_PURCHASES
    }

    #[must_use]
    pub const fn new(duration: f64) -> Self {
        Self {
            duration,
            max_purchases: DEFAULT_MAX_PURCHASES,
        }
    }

    #[must_use]
    pub const fn with_max_purchases(mut self, max_purchases: usize) -> Self {
        self.max_purchases = max_purchases;
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

/// Why a run stopped buying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// Duration was zero, negative, or not a number.
    NoTime,
    /// The clock passed the duration.
    Elapsed,
    /// The policy asked for no further purchases.
    PolicyDeclined,
    /// The chosen item cannot be afforded within the time left.
    Unreachable { item: String },
    /// The configured purchase cap was reached.
    PurchaseLimit,
}

/// Final state of a run together with the catalog it advanced.
#[derive(Debug, Clone)]
pub struct RunOutcome<C> {
    pub state: SimulationState,
    pub catalog: C,
    pub termination: Termination,
}

/// Owns one catalog and one state for the duration of a run.
#[derive(Debug, Clone)]
pub struct SimulationEngine<C: Catalog> {
    catalog: C,
    config: SimulationConfig,
    state: SimulationState,
}

impl<C: Catalog> SimulationEngine<C> {
    /// Take ownership of `catalog`; callers wanting to keep theirs pass a clone.
    #[must_use]
    pub fn new(catalog: C, config: SimulationConfig) -> Self {
        Self {
            catalog,
            config,
            state: SimulationState::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run `policy` until the duration elapses or buying stops.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownItem`] if the policy names an item the
    /// catalog does not carry.
    pub fn run(mut self, policy: &dyn Policy) -> Result<RunOutcome<C>, SimError> {
        let duration = self.config.duration;
        if duration.is_nan() || duration <= 0.0 {
            log::debug!("{}: no time to simulate (duration {duration})", policy.name());
            return Ok(self.finish(Termination::NoTime));
        }

        let termination = loop {
            if self.state.time() > duration {
                break Termination::Elapsed;
            }
            let time_left = duration - self.state.time();
            if self.state.purchase_count() >= self.config.max_purchases {
                break Termination::PurchaseLimit;
            }

            let snapshot = Snapshot {
                balance: self.state.balance(),
                rate: self.state.rate(),
                history: self.state.history(),
                time_left,
            };
            let Some(item) = policy.choose(&snapshot, &self.catalog) else {
                break Termination::PolicyDeclined;
            };
            log::trace!("{} chose {item:?} with {time_left} left", policy.name());

            let cost = self.catalog.cost(&item)?;
            let rate_increment = self.catalog.rate_increment(&item)?;
            let wait = self.state.time_until(cost);
            if wait > time_left {
                break Termination::Unreachable { item };
            }

            self.state.wait(wait);
            if self.state.buy_item(&item, cost, rate_increment) {
                self.catalog.update_item(&item)?;
                log::debug!(
                    "{}: bought {item} for {cost:.2} at t={:.0}, rate now {:.2}",
                    policy.name(),
                    self.state.time(),
                    self.state.rate()
                );
            }
        };

        if termination == Termination::PurchaseLimit {
            log::warn!(
                "{}: cut short after {} purchases at t={}",
                policy.name(),
                self.config.max_purchases,
                self.state.time()
            );
        } else {
            log::debug!("{}: stopped ({termination:?})", policy.name());
        }
        self.state.advance_to(duration);
        Ok(self.finish(termination))
    }

    fn finish(self, termination: Termination) -> RunOutcome<C> {
        RunOutcome {
            state: self.state,
            catalog: self.catalog,
            termination,
        }
    }
}

/// Simulate `policy` for `duration` on a private clone of `catalog`.
///
/// Runs are capped at [`DEFAULT_MAX_PURCHASES`] purchases; a capped run is
/// logged at warn level and still returns its state. Use
/// [`SimulationEngine`] to pick the cap or to see why a run stopped.
///
/// # Errors
///
/// Returns [`SimError::UnknownItem`] if the policy names an item the catalog
/// does not carry.
pub fn run<C: Catalog>(
    catalog: &C,
    duration: f64,
    policy: &dyn Policy,
) -> Result<SimulationState, SimError> {
    SimulationEngine::new(catalog.clone(), SimulationConfig::new(duration))
        .run(policy)
        .map(|outcome| outcome.state)
}
