//! Error types for catalog loading and simulation runs.
use thiserror::Error;

/// Errors raised when a catalog definition violates its invariants.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog file could not be read: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog item names must not be empty")]
    EmptyName,
    #[error("catalog item {name:?} is declared more than once")]
    DuplicateItem { name: String },
    #[error("item {name:?} cost must be finite and non-negative (got {cost})")]
    InvalidCost { name: String, cost: f64 },
    #[error("item {name:?} rate increment must be finite and non-negative (got {value})")]
    InvalidRateIncrement { name: String, value: f64 },
    #[error("growth factor must be finite and at least 1.0 (got {0})")]
    InvalidGrowthFactor(f64),
}

/// Errors surfaced by a simulation run.
///
/// Unreachable or unaffordable purchases are not errors; they end the run
/// normally. Only a policy naming an item the catalog does not carry fails.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown item {name:?}")]
    UnknownItem { name: String },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_item_message_names_the_item() {
        let err = SimError::UnknownItem {
            name: "Cursor".to_string(),
        };
        assert_eq!(err.to_string(), "unknown item \"Cursor\"");
    }

    #[test]
    fn catalog_errors_convert_transparently() {
        let err: SimError = CatalogError::InvalidGrowthFactor(0.5).into();
        assert!(matches!(err, SimError::Catalog(_)));
        assert!(err.to_string().contains("0.5"));
    }
}
