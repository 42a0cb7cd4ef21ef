//! Catalogue configuration.
//!
//! Every section has defaults, so a partial JSON document only needs the
//! values it changes:
//!
//! ```json
//! {
//!   "menu": { "beverages": { "Espresso": 249 } },
//!   "dispenser": { "denominations": [500, 200, 100] }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use behavior_core::{HubConfig, Money};
use serde::{Deserialize, Serialize};

use crate::beverage::{Beverage, Condiment};
use crate::CatalogError;

/// Prices for the coffee menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Base beverages by name.
    pub beverages: BTreeMap<String, Money>,
    /// Condiment add-ons by name.
    pub condiments: BTreeMap<String, Money>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            beverages: Beverage::ALL
                .iter()
                .map(|b| (b.name().to_string(), b.price()))
                .collect(),
            condiments: Condiment::ALL
                .iter()
                .map(|c| (c.name().to_string(), c.price()))
                .collect(),
        }
    }
}

impl MenuConfig {
    /// Add or reprice a beverage.
    pub fn with_beverage(mut self, name: impl Into<String>, price: Money) -> Self {
        self.beverages.insert(name.into(), price);
        self
    }

    /// Add or reprice a condiment.
    pub fn with_condiment(mut self, name: impl Into<String>, price: Money) -> Self {
        self.condiments.insert(name.into(), price);
        self
    }
}

/// Note denominations for the cash dispenser, in dispensing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispenserConfig {
    pub denominations: Vec<u64>,
}

impl Default for DispenserConfig {
    fn default() -> Self {
        Self {
            denominations: vec![2000, 500, 100],
        }
    }
}

impl DispenserConfig {
    /// Replace the denominations.
    pub fn with_denominations(mut self, denominations: Vec<u64>) -> Self {
        self.denominations = denominations;
        self
    }

    /// Reject zero or repeated denominations.
    ///
    /// An empty list is left to the chain builder, which refuses it.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.denominations.contains(&0) {
            return Err(CatalogError::InvalidConfig {
                reason: "denomination must be non-zero".to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for &d in &self.denominations {
            if !seen.insert(d) {
                return Err(CatalogError::InvalidConfig {
                    reason: format!("denomination {d} listed twice"),
                });
            }
        }
        Ok(())
    }
}

/// Top-level configuration for the catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub menu: MenuConfig,
    pub dispenser: DispenserConfig,
    pub hub: HubConfig,
}

impl CatalogConfig {
    /// Parse a JSON document; missing sections take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let config: CatalogConfig = serde_json::from_str(json)?;
        config.dispenser.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_menu_lists_reference_items() {
        let menu = MenuConfig::default();
        assert_eq!(menu.beverages.get("Espresso"), Some(&Money::cents(199)));
        assert_eq!(menu.condiments.get("Whip"), Some(&Money::cents(20)));
        assert_eq!(menu.beverages.len(), 3);
        assert_eq!(menu.condiments.len(), 4);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config = CatalogConfig::from_json(
            r#"{ "dispenser": { "denominations": [500, 200, 100] } }"#,
        )
        .unwrap();

        assert_eq!(config.dispenser.denominations, vec![500, 200, 100]);
        assert_eq!(config.menu, MenuConfig::default());
        assert!(config.hub.prune_stale);
    }

    #[test]
    fn test_json_round_trip() {
        let config = CatalogConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(CatalogConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_zero_denomination_rejected() {
        let result = CatalogConfig::from_json(r#"{ "dispenser": { "denominations": [100, 0] } }"#);
        assert!(matches!(result, Err(CatalogError::InvalidConfig { .. })));
    }

    #[test]
    fn test_duplicate_denomination_rejected() {
        let config = DispenserConfig::default().with_denominations(vec![500, 100, 500]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = CatalogConfig::from_json("{ not json");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }
}
