//! # Coffee Orders
//!
//! Beverages are leaves, condiments are additive layers:
//!
//! ```text
//!   Whip ( Mocha ( Espresso ) )
//!   cost  = 199 + 20 + 20 = 239
//!   desc  = "Espresso, Mocha, Whip"
//! ```
//!
//! [`Menu`] resolves names to prices from a [`MenuConfig`], so repricing or
//! adding an item is configuration rather than a new type.

use std::collections::BTreeMap;
use std::fmt;

use behavior_core::{Addition, BehaviorUnit, DecoratorChain, Leaf, Money};

use crate::config::MenuConfig;
use crate::CatalogError;

// ============================================================================
// Reference Items
// ============================================================================

/// The reference base beverages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Beverage {
    Espresso,
    DarkRoast,
    HouseBlend,
}

impl Beverage {
    pub const ALL: &'static [Beverage] =
        &[Beverage::Espresso, Beverage::DarkRoast, Beverage::HouseBlend];

    pub fn name(&self) -> &'static str {
        match self {
            Beverage::Espresso => "Espresso",
            Beverage::DarkRoast => "DarkRoast",
            Beverage::HouseBlend => "HouseBlend",
        }
    }

    /// List price.
    pub fn price(&self) -> Money {
        match self {
            Beverage::Espresso => Money::cents(199),
            Beverage::DarkRoast => Money::cents(99),
            Beverage::HouseBlend => Money::cents(89),
        }
    }

    /// A root unit at list price.
    pub fn unit(&self) -> Leaf {
        Leaf::new(self.name(), self.price())
    }
}

impl fmt::Display for Beverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The reference condiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condiment {
    Milk,
    Soy,
    Mocha,
    Whip,
}

impl Condiment {
    pub const ALL: &'static [Condiment] = &[
        Condiment::Milk,
        Condiment::Soy,
        Condiment::Mocha,
        Condiment::Whip,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Condiment::Milk => "Milk",
            Condiment::Soy => "Soy",
            Condiment::Mocha => "Mocha",
            Condiment::Whip => "Whip",
        }
    }

    /// List price.
    pub fn price(&self) -> Money {
        match self {
            Condiment::Milk => Money::cents(10),
            Condiment::Soy => Money::cents(15),
            Condiment::Mocha => Money::cents(20),
            Condiment::Whip => Money::cents(20),
        }
    }

    /// An additive layer at list price.
    pub fn layer(&self) -> Addition {
        Addition::new(self.name(), self.price())
    }
}

impl fmt::Display for Condiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Menu
// ============================================================================

/// A priced menu that builds orders by name.
///
/// # Example
///
/// ```
/// use behavior_catalog::Menu;
/// use behavior_core::BehaviorUnit;
///
/// let menu = Menu::default();
/// let order = menu.order("Espresso", &["Mocha", "Whip"]).unwrap();
/// assert_eq!(order.compute().as_cents(), 239);
/// assert_eq!(order.describe(), "Espresso, Mocha, Whip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    beverages: BTreeMap<String, Money>,
    condiments: BTreeMap<String, Money>,
}

impl Menu {
    pub fn new(config: &MenuConfig) -> Self {
        Self {
            beverages: config.beverages.clone(),
            condiments: config.condiments.clone(),
        }
    }

    /// Beverage names, sorted.
    pub fn beverages(&self) -> impl Iterator<Item = &str> {
        self.beverages.keys().map(String::as_str)
    }

    /// Condiment names, sorted.
    pub fn condiments(&self) -> impl Iterator<Item = &str> {
        self.condiments.keys().map(String::as_str)
    }

    /// Build `base` wrapped in `condiments`, first condiment innermost.
    ///
    /// Every name is resolved before anything is built, so an unknown item
    /// fails the whole order.
    pub fn order(
        &self,
        base: &str,
        condiments: &[&str],
    ) -> Result<Box<dyn BehaviorUnit>, CatalogError> {
        let price = self
            .beverages
            .get(base)
            .copied()
            .ok_or_else(|| CatalogError::UnknownItem {
                kind: "beverage",
                name: base.to_string(),
            })?;

        let layers = condiments
            .iter()
            .map(|name| {
                self.condiments
                    .get(*name)
                    .map(|delta| Addition::new(*name, *delta))
                    .ok_or_else(|| CatalogError::UnknownItem {
                        kind: "condiment",
                        name: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let chain = layers
            .into_iter()
            .fold(DecoratorChain::new().base(Leaf::new(base, price)), |chain, layer| {
                chain.wrap(layer)
            });

        let unit = chain.build()?;
        tracing::debug!(order = %unit.describe(), cost = %unit.compute(), "order built");
        Ok(unit)
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new(&MenuConfig::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
