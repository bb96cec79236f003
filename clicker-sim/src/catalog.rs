//! Upgrade catalog: the source of truth for item costs and rate increments.
//!
//! The engine and the policies only see the [`CatalogView`] / [`Catalog`]
//! traits. [`BuildCatalog`] is the stock implementation backed by a JSON
//! asset, where every purchase multiplies an item's cost by a catalog-wide
//! growth factor.
use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, SimError};

const DEFAULT_CATALOG_DATA: &str = include_str!("../data/catalog.json");

/// Cost growth applied per purchase when a catalog does not declare one.
pub const DEFAULT_GROWTH_FACTOR: f64 = 1.15;

/// An item's name together with its current cost and rate increment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemQuote<'a> {
    pub name: &'a str,
    pub cost: f64,
    pub rate_increment: f64,
}

/// Read-only catalog access handed to policies.
pub trait CatalogView {
    /// Item names in a stable iteration order.
    fn items(&self) -> Vec<&str>;

    /// Current cost and rate increment for `item`, if the catalog carries it.
    fn quote(&self, item: &str) -> Option<ItemQuote<'_>>;

    /// Quotes for every item, in [`CatalogView::items`] order.
    fn quotes(&self) -> Vec<ItemQuote<'_>> {
        self.items()
            .into_iter()
            .filter_map(|name| self.quote(name))
            .collect()
    }

    /// Current purchase cost of `item`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownItem`] if the catalog has no such item.
    fn cost(&self, item: &str) -> Result<f64, SimError> {
        self.quote(item)
            .map(|quote| quote.cost)
            .ok_or_else(|| SimError::UnknownItem {
                name: item.to_string(),
            })
    }

    /// Production rate granted by one purchase of `item`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownItem`] if the catalog has no such item.
    fn rate_increment(&self, item: &str) -> Result<f64, SimError> {
        self.quote(item)
            .map(|quote| quote.rate_increment)
            .ok_or_else(|| SimError::UnknownItem {
                name: item.to_string(),
            })
    }
}

/// A catalog the engine can own and advance. `Clone` must be a deep copy.
pub trait Catalog: CatalogView + Clone {
    /// Record one purchase of `item`, growing its future cost.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownItem`] if the catalog has no such item.
    fn update_item(&mut self, item: &str) -> Result<(), SimError>;
}

/// A single purchasable upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildItem {
    pub name: String,
    /// Cost of the first purchase.
    pub cost: f64,
    pub rate_increment: f64,
    #[serde(default)]
    pub purchases: u32,
}

impl BuildItem {
    #[must_use]
    pub fn new(name: impl Into<String>, cost: f64, rate_increment: f64) -> Self {
        Self {
            name: name.into(),
            cost,
            rate_increment,
            purchases: 0,
        }
    }

    fn current_cost(&self, growth_factor: f64) -> f64 {
        self.cost * growth_factor.powf(f64::from(self.purchases))
    }
}

/// Catalog with geometric cost growth per purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildCatalog {
    #[serde(default = "BuildCatalog::default_growth_factor")]
    growth_factor: f64,
    #[serde(default)]
    items: Vec<BuildItem>,
}

impl BuildCatalog {
    const fn default_growth_factor() -> f64 {
        DEFAULT_GROWTH_FACTOR
    }

    /// Build a catalog from items in iteration order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if any item or the growth factor is invalid.
    pub fn new(items: Vec<BuildItem>, growth_factor: f64) -> Result<Self, CatalogError> {
        let catalog = Self {
            growth_factor,
            items,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the catalog is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The embedded ten-item catalog.
    #[must_use]
    pub fn load_default() -> Self {
        Self::from_json(DEFAULT_CATALOG_DATA).unwrap_or_else(|_| Self::empty())
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            growth_factor: DEFAULT_GROWTH_FACTOR,
            items: Vec::new(),
        }
    }

    /// Replace the growth factor, keeping items and purchase counts.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidGrowthFactor`] for factors below 1.0.
    pub fn with_growth_factor(mut self, growth_factor: f64) -> Result<Self, CatalogError> {
        if !growth_factor.is_finite() || growth_factor < 1.0 {
            return Err(CatalogError::InvalidGrowthFactor(growth_factor));
        }
        self.growth_factor = growth_factor;
        Ok(self)
    }

    #[must_use]
    pub const fn growth_factor(&self) -> f64 {
        self.growth_factor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// How many times `item` has been bought from this catalog instance.
    #[must_use]
    pub fn purchases(&self, item: &str) -> Option<u32> {
        self.find(item).map(|entry| entry.purchases)
    }

    fn find(&self, item: &str) -> Option<&BuildItem> {
        self.items.iter().find(|entry| entry.name == item)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if !self.growth_factor.is_finite() || self.growth_factor < 1.0 {
            return Err(CatalogError::InvalidGrowthFactor(self.growth_factor));
        }
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.name.trim().is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if !seen.insert(item.name.as_str()) {
                return Err(CatalogError::DuplicateItem {
                    name: item.name.clone(),
                });
            }
            if !item.cost.is_finite() || item.cost < 0.0 {
                return Err(CatalogError::InvalidCost {
                    name: item.name.clone(),
                    cost: item.cost,
                });
            }
            if !item.rate_increment.is_finite() || item.rate_increment < 0.0 {
                return Err(CatalogError::InvalidRateIncrement {
                    name: item.name.clone(),
                    value: item.rate_increment,
                });
            }
        }
        Ok(())
    }
}

impl Default for BuildCatalog {
    fn default() -> Self {
        Self::load_default()
    }
}

impl CatalogView for BuildCatalog {
    fn items(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }

    fn quote(&self, item: &str) -> Option<ItemQuote<'_>> {
        self.find(item).map(|entry| ItemQuote {
            name: entry.name.as_str(),
            cost: entry.current_cost(self.growth_factor),
            rate_increment: entry.rate_increment,
        })
    }
}

impl Catalog for BuildCatalog {
    fn update_item(&mut self, item: &str) -> Result<(), SimError> {
        let entry = self
            .items
            .iter_mut()
            .find(|entry| entry.name == item)
            .ok_or_else(|| SimError::UnknownItem {
                name: item.to_string(),
            })?;
        entry.purchases = entry.purchases.saturating_add(1);
        Ok(())
    }
}
