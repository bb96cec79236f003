//! Purchase policies: pure decision functions over a state snapshot.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogView, ItemQuote};
use crate::state::HistoryEntry;

/// Read-only view of the run handed to a policy on every decision.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub balance: f64,
    pub rate: f64,
    pub history: &'a [HistoryEntry],
    pub time_left: f64,
}

impl Snapshot<'_> {
    /// Upper bound on the balance reachable by the end of the window.
    #[must_use]
    pub fn reachable_balance(&self) -> f64 {
        self.balance + self.rate * self.time_left
    }
}

/// Decision interface for purchase strategies.
///
/// A policy only names the item it wants; it need not check that the item is
/// reachable in the time left, the engine validates every choice.
pub trait Policy {
    /// Name used for logging and reports.
    fn name(&self) -> &str;

    /// Item to pursue next, or `None` to stop buying.
    fn choose(&self, snapshot: &Snapshot<'_>, catalog: &dyn CatalogView) -> Option<String>;
}

impl<F> Policy for F
where
    F: Fn(&Snapshot<'_>, &dyn CatalogView) -> Option<String>,
{
    fn name(&self) -> &str {
        "custom"
    }

    fn choose(&self, snapshot: &Snapshot<'_>, catalog: &dyn CatalogView) -> Option<String> {
        self(snapshot, catalog)
    }
}

/// Built-in purchase strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    None,
    NaiveFirst,
    Cheapest,
    Expensive,
    BestReturn,
}

impl Strategy {
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::NaiveFirst,
        Self::Cheapest,
        Self::Expensive,
        Self::BestReturn,
    ];

    /// Stable key used on the command line.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::NaiveFirst => "naive-first",
            Self::Cheapest => "cheapest",
            Self::Expensive => "expensive",
            Self::BestReturn => "best-return",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "No Purchase",
            Self::NaiveFirst => "Naive First",
            Self::Cheapest => "Cheapest Affordable",
            Self::Expensive => "Most Expensive Affordable",
            Self::BestReturn => "Best Return",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::None => "never buys; passive accumulation baseline",
            Self::NaiveFirst => "always targets Cursor (else the first item), reachable or not",
            Self::Cheapest => "cheapest item reachable in the time left",
            Self::Expensive => "most expensive item reachable in the time left",
            Self::BestReturn => "highest rate increment per unit cost among reachable items",
        }
    }

    /// Build the policy for this strategy. `catalog` fixes the naive target.
    #[must_use]
    pub fn create_policy(self, catalog: &dyn CatalogView) -> Box<dyn Policy + Send + Sync> {
        match self {
            Self::None => Box::new(NoPurchasePolicy),
            Self::NaiveFirst => Box::new(NaiveFirstPolicy::for_catalog(catalog)),
            Self::Cheapest => Box::new(CheapestPolicy),
            Self::Expensive => Box::new(ExpensivePolicy),
            Self::BestReturn => Box::new(BestReturnPolicy),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrecognised strategy key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy {0:?}")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| UnknownStrategy(key.to_string()))
    }
}

/// Never buys anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPurchasePolicy;

/// Item the built-in naive strategy sticks to when the catalog carries it.
pub const DEFAULT_NAIVE_ITEM: &str = "Cursor";

/// Always names the same item without checking feasibility.
#[derive(Debug, Clone, Default)]
pub struct NaiveFirstPolicy {
    item: Option<String>,
}

impl NaiveFirstPolicy {
    #[must_use]
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: Some(item.into()),
        }
    }

    /// Target [`DEFAULT_NAIVE_ITEM`] when `catalog` carries it, else its first
    /// item; an empty catalog yields a policy that never buys.
    #[must_use]
    pub fn for_catalog(catalog: &dyn CatalogView) -> Self {
        let item = if catalog.quote(DEFAULT_NAIVE_ITEM).is_some() {
            Some(DEFAULT_NAIVE_ITEM.to_string())
        } else {
            catalog.items().first().map(|name| (*name).to_string())
        };
        Self { item }
    }

    #[must_use]
    pub fn item(&self) -> Option<&str> {
        self.item.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestPolicy;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpensivePolicy;

#[derive(Debug, Clone, Copy, Default)]
pub struct BestReturnPolicy;

fn reachable_quotes<'c>(
    snapshot: &Snapshot<'_>,
    catalog: &'c dyn CatalogView,
) -> impl Iterator<Item = ItemQuote<'c>> {
    let reachable = snapshot.reachable_balance();
    catalog
        .quotes()
        .into_iter()
        .filter(move |quote| quote.cost <= reachable)
}

impl Policy for NoPurchasePolicy {
    fn name(&self) -> &str {
        Strategy::None.label()
    }

    fn choose(&self, _snapshot: &Snapshot<'_>, _catalog: &dyn CatalogView) -> Option<String> {
        None
    }
}

impl Policy for NaiveFirstPolicy {
    fn name(&self) -> &str {
        Strategy::NaiveFirst.label()
    }

    fn choose(&self, _snapshot: &Snapshot<'_>, _catalog: &dyn CatalogView) -> Option<String> {
        self.item.clone()
    }
}

impl Policy for CheapestPolicy {
    fn name(&self) -> &str {
        Strategy::Cheapest.label()
    }

    fn choose(&self, snapshot: &Snapshot<'_>, catalog: &dyn CatalogView) -> Option<String> {
        let mut best: Option<ItemQuote<'_>> = None;
        for quote in reachable_quotes(snapshot, catalog) {
            if best.is_none_or(|current| quote.cost < current.cost) {
                best = Some(quote);
            }
        }
        best.map(|quote| quote.name.to_string())
    }
}

impl Policy for ExpensivePolicy {
    fn name(&self) -> &str {
        Strategy::Expensive.label()
    }

    fn choose(&self, snapshot: &Snapshot<'_>, catalog: &dyn CatalogView) -> Option<String> {
        let mut best: Option<ItemQuote<'_>> = None;
        for quote in reachable_quotes(snapshot, catalog) {
            if best.is_none_or(|current| quote.cost > current.cost) {
                best = Some(quote);
            }
        }
        best.map(|quote| quote.name.to_string())
    }
}

impl Policy for BestReturnPolicy {
    fn name(&self) -> &str {
        Strategy::BestReturn.label()
    }

    fn choose(&self, snapshot: &Snapshot<'_>, catalog: &dyn CatalogView) -> Option<String> {
        // Baseline 0: a pick must return strictly more than nothing.
        let mut best_score = 0.0;
        let mut best: Option<&str> = None;
        for quote in reachable_quotes(snapshot, catalog) {
            let score = quote.rate_increment / quote.cost;
            if score > best_score {
                best_score = score;
                best = Some(quote.name);
            }
        }
        best.map(str::to_string)
    }
}
