use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use clicker_sim::{
    BuildCatalog, SimulationConfig, SimulationEngine, SimulationState, Strategy, Termination,
};
use serde::{Deserialize, Serialize};

/// Final figures of one strategy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRun {
    pub strategy: Strategy,
    pub label: String,
    pub termination: Termination,
    pub purchases: usize,
    pub state: SimulationState,
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
}

/// Resolve CLI strategy tokens. `all` expands to every built-in; repeats are
/// dropped while keeping first-seen order.
pub fn resolve_strategies(tokens: &[String]) -> Result<Vec<Strategy>> {
    let mut strategies: Vec<Strategy> = Vec::new();
    for token in tokens {
        let expanded: Vec<Strategy> = if token.eq_ignore_ascii_case("all") {
            Strategy::ALL.to_vec()
        } else {
            vec![token.parse::<Strategy>()?]
        };
        for strategy in expanded {
            if !strategies.contains(&strategy) {
                strategies.push(strategy);
            }
        }
    }
    if strategies.is_empty() {
        bail!("no strategies selected");
    }
    Ok(strategies)
}

/// Run a single strategy on a private copy of `catalog`.
pub fn run_strategy(
    catalog: &BuildCatalog,
    config: SimulationConfig,
    strategy: Strategy,
) -> Result<StrategyRun> {
    let policy = strategy.create_policy(catalog);
    let started = Instant::now();
    let outcome = SimulationEngine::new(catalog.clone(), config)
        .run(policy.as_ref())
        .with_context(|| format!("{strategy} run failed"))?;
    let elapsed = started.elapsed();
    log::info!(
        "{strategy}: {} purchases, stopped by {:?} in {elapsed:?}",
        outcome.state.purchase_count(),
        outcome.termination
    );

    Ok(StrategyRun {
        strategy,
        label: strategy.label().to_string(),
        termination: outcome.termination,
        purchases: outcome.state.purchase_count(),
        state: outcome.state,
        elapsed,
    })
}

/// Run every strategy in parallel, one scoped thread each, sharing `catalog`
/// as a read-only template. Results keep the order of `strategies`.
pub fn run_strategies(
    catalog: &BuildCatalog,
    config: SimulationConfig,
    strategies: &[Strategy],
) -> Result<Vec<StrategyRun>> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = strategies
            .iter()
            .map(|&strategy| scope.spawn(move || run_strategy(catalog, config, strategy)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow!("strategy worker panicked"))?
            })
            .collect()
    })
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clicker_sim::{BuildItem, CatalogView};

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolve_expands_all_and_dedupes() {
        let strategies = resolve_strategies(&tokens(&["cheapest", "all"])).unwrap();
        assert_eq!(strategies.len(), Strategy::ALL.len());
        assert_eq!(strategies[0], Strategy::Cheapest);
    }

    #[test]
    fn resolve_rejects_unknown_and_empty() {
        let err = resolve_strategies(&tokens(&["cheapest", "lucky"])).unwrap_err();
        assert!(err.to_string().contains("lucky"));
        assert!(resolve_strategies(&[]).is_err());
    }

    #[test]
    fn run_strategies_preserves_order_and_template() {
        let catalog = BuildCatalog::load_default();
        let strategies = [Strategy::BestReturn, Strategy::None, Strategy::Cheapest];
        let runs = run_strategies(&catalog, SimulationConfig::new(10_000.0), &strategies).unwrap();
        let order: Vec<Strategy> = runs.iter().map(|run| run.strategy).collect();
        assert_eq!(order, strategies);
        assert_eq!(runs[1].purchases, 0);
        assert!(runs[2].purchases > 0);
        assert!(
            catalog
                .items()
                .iter()
                .all(|item| catalog.purchases(item) == Some(0))
        );
    }

    #[test]
    fn naive_run_on_unreachable_item_terminates() {
        let catalog = BuildCatalog::new(vec![BuildItem::new("Cursor", 1e12, 1.0)], 1.15).unwrap();
        let run = run_strategy(&catalog, SimulationConfig::new(100.0), Strategy::NaiveFirst)
            .unwrap();
        assert!(matches!(run.termination, Termination::Unreachable { .. }));
        assert_eq!(run.label, "Naive First");
    }

    #[test]
    fn strategy_run_serializes_elapsed_as_millis() {
        let catalog = BuildCatalog::load_default();
        let run = run_strategy(&catalog, SimulationConfig::new(5.0), Strategy::None).unwrap();
        let json = serde_json::to_value(&run).unwrap();
        assert!(json["elapsed"].is_u64());
        assert_eq!(json["strategy"], "none");
        assert_eq!(json["termination"]["kind"], "policy_declined");
    }
}
