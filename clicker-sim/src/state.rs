//! Simulation state: clock, balance, production rate and purchase history.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Production rate every run starts with.
pub const INITIAL_RATE: f64 = 1.0;

/// One purchase in the run history. The first entry of every history is the
/// sentinel `(0, None, 0, 0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub time: f64,
    pub item: Option<String>,
    pub cost: f64,
    /// Resource produced up to the moment of purchase.
    pub total_produced: f64,
}

impl HistoryEntry {
    #[must_use]
    pub const fn sentinel() -> Self {
        Self {
            time: 0.0,
            item: None,
            cost: 0.0,
            total_produced: 0.0,
        }
    }
}

/// Mutable economy state owned by a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    time: f64,
    balance: f64,
    total_produced: f64,
    rate: f64,
    history: Vec<HistoryEntry>,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            time: 0.0,
            balance: 0.0,
            total_produced: 0.0,
            rate: INITIAL_RATE,
            history: vec![HistoryEntry::sentinel()],
        }
    }

    /// Spendable resource (not the cumulative total).
    #[must_use]
    pub const fn balance(&self) -> f64 {
        self.balance
    }

    #[must_use]
    pub const fn total_produced(&self) -> f64 {
        self.total_produced
    }

    /// Current production rate per unit of simulated time.
    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Purchase history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Consume the state, returning its history.
    #[must_use]
    pub fn into_history(self) -> Vec<HistoryEntry> {
        self.history
    }

    /// Whole time units until `target` is affordable, or `0.0` if it already is.
    #[must_use]
    pub fn time_until(&self, target: f64) -> f64 {
        let units = ((target - self.balance) / self.rate).ceil();
        if units > 0.0 { units } else { 0.0 }
    }

    /// Let production run for `duration`. Non-positive durations do nothing.
    pub fn wait(&mut self, duration: f64) {
        if duration > 0.0 {
            let produced = duration * self.rate;
            self.time += duration;
            self.balance += produced;
            self.total_produced += produced;
        }
    }

    /// Wait out the remainder up to `end` and pin the clock to exactly `end`.
    ///
    /// `end` must not precede the current time by more than float rounding;
    /// the pin absorbs the last-ulp drift of repeated `wait` sums.
    pub fn advance_to(&mut self, end: f64) {
        self.wait(end - self.time);
        self.time = end;
    }

    /// Buy `item` if the balance covers `cost`. Returns whether it was bought.
    pub fn buy_item(&mut self, item: &str, cost: f64, rate_increment: f64) -> bool {
        if self.balance < cost {
            return false;
        }
        self.balance -= cost;
        self.rate += rate_increment;
        self.history.push(HistoryEntry {
            time: self.time,
            item: Some(item.to_string()),
            cost,
            total_produced: self.total_produced,
        });
        true
    }

    /// Number of purchases made (the sentinel is not counted).
    #[must_use]
    pub fn purchase_count(&self) -> usize {
        self.history.len().saturating_sub(1)
    }
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total produced: {:.2}", self.total_produced)?;
        writeln!(f, "balance: {:.2}", self.balance)?;
        writeln!(f, "time: {:.2}", self.time)?;
        write!(f, "rate: {:.2}", self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn new_state_starts_with_sentinel() {
        let state = SimulationState::new();
        assert!(approx(state.rate(), 1.0));
        assert!(approx(state.balance(), 0.0));
        assert!(approx(state.time(), 0.0));
        assert_eq!(state.history(), &[HistoryEntry::sentinel()]);
        assert_eq!(state.purchase_count(), 0);
    }

    #[test]
    fn time_until_rounds_up_to_whole_units() {
        let mut state = SimulationState::new();
        state.wait(10.0);
        state.buy_item("a", 0.0, 1.0);
        // balance 10, rate 2
        assert!(approx(state.time_until(15.0), 3.0));
        assert!(approx(state.time_until(14.0), 2.0));
        assert!(approx(state.time_until(10.0), 0.0));
        assert!(approx(state.time_until(3.0), 0.0));
        let units = state.time_until(101.0);
        assert!(approx(units.fract(), 0.0));
        assert!(state.balance() + units * state.rate() >= 101.0);
        assert!(state.balance() + (units - 1.0) * state.rate() < 101.0);
    }

    #[test]
    fn wait_ignores_non_positive_durations() {
        let mut state = SimulationState::new();
        state.wait(0.0);
        state.wait(-5.0);
        assert!(approx(state.time(), 0.0));
        state.wait(2.5);
        assert!(approx(state.time(), 2.5));
        assert!(approx(state.balance(), 2.5));
        assert!(approx(state.total_produced(), 2.5));
    }

    #[test]
    fn buy_item_requires_balance_and_records_pre_purchase_total() {
        let mut state = SimulationState::new();
        state.wait(5.0);
        assert!(!state.buy_item("Cursor", 15.0, 0.1));
        assert_eq!(state.history().len(), 1);

        state.wait(10.0);
        assert!(state.buy_item("Cursor", 15.0, 0.1));
        assert!(approx(state.balance(), 0.0));
        assert!(approx(state.rate(), 1.1));
        assert!(approx(state.total_produced(), 15.0));
        let last = state.history().last().unwrap();
        assert_eq!(last.item.as_deref(), Some("Cursor"));
        assert!(approx(last.time, 15.0));
        assert!(approx(last.cost, 15.0));
        assert!(approx(last.total_produced, 15.0));
    }

    #[test]
    fn advance_to_lands_exactly_on_end() {
        let mut state = SimulationState::new();
        state.wait(0.1);
        state.advance_to(0.3);
        assert_eq!(state.time().to_bits(), 0.3_f64.to_bits());
        assert!(approx(state.balance(), 0.3));
        state.advance_to(0.3);
        assert!(approx(state.total_produced(), 0.3));
    }

    #[test]
    fn display_lists_core_figures() {
        let mut state = SimulationState::new();
        state.wait(3.0);
        let text = state.to_string();
        assert!(text.contains("total produced: 3.00"));
        assert!(text.contains("rate: 1.00"));
    }
}
