//! # Capability Interface
//!
//! The contract every composable behavior unit satisfies.
//!
//! ## The Problem with Variant Subclasses
//!
//! Putting every variant combination into its own type explodes quickly:
//! ```text
//! Beverage
//! ├── Espresso
//! │    ├── EspressoWithMilk
//! │    ├── EspressoWithSoyAndWhip
//! │    └── EspressoWithMilkAndWhip
//! └── DarkRoast
//!      └── ...
//! ```
//!
//! ## Design
//!
//! - [`BehaviorUnit`]: "compute a cost" and "render a description"
//! - [`Leaf`]: a root unit with a fixed name and cost
//! - [`Money`]: integer minor currency units
//!
//! The third capability, "handle a request", is [`crate::chain::Handler`].
//! Wrappers live in [`crate::decorator`] and implement the same trait, so a
//! caller never knows how deep the composition goes.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

// ============================================================================
// Money
// ============================================================================

/// An amount in minor currency units (cents).
///
/// Addition saturates at `u64::MAX` instead of wrapping.
///
/// # Example
///
/// ```
/// use behavior_core::Money;
///
/// let total = Money::cents(199) + Money::cents(20);
/// assert_eq!(total.as_cents(), 219);
/// assert_eq!(total.to_string(), "$2.19");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero.
    pub const ZERO: Money = Money(0);

    /// Create an amount from cents.
    pub const fn cents(cents: u64) -> Self {
        Self(cents)
    }

    /// The amount in cents.
    pub const fn as_cents(self) -> u64 {
        self.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// ============================================================================
// Behavior Unit
// ============================================================================

/// A composable unit of behavior.
///
/// Leaves return their own values; decorators delegate to the unit they
/// wrap and augment the result.
pub trait BehaviorUnit: Send + Sync {
    /// Short name of this unit (the leaf name, or the layer name for wrappers).
    fn name(&self) -> &str;

    /// Compute the unit's cost.
    fn compute(&self) -> Money;

    /// Render the unit's description.
    fn describe(&self) -> String;

    /// The wrapped unit, if this is a decorator.
    fn inner(&self) -> Option<&dyn BehaviorUnit> {
        None
    }
}

impl<T: BehaviorUnit + ?Sized> BehaviorUnit for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compute(&self) -> Money {
        (**self).compute()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn inner(&self) -> Option<&dyn BehaviorUnit> {
        (**self).inner()
    }
}

// ============================================================================
// Leaf
// ============================================================================

/// A root unit with a fixed name and cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    name: String,
    cost: Money,
}

impl Leaf {
    /// Create a new leaf unit.
    pub fn new(name: impl Into<String>, cost: Money) -> Self {
        Self {
            name: name.into(),
            cost,
        }
    }
}

impl BehaviorUnit for Leaf {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self) -> Money {
        self.cost
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_addition_saturates() {
        let near_max = Money::cents(u64::MAX - 1);
        assert_eq!((near_max + Money::cents(5)).as_cents(), u64::MAX);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::cents(5).to_string(), "$0.05");
        assert_eq!(Money::cents(1234).to_string(), "$12.34");
        assert_eq!(Money::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_money_sum() {
        let total: Money = [10, 15, 20].into_iter().map(Money::cents).sum();
        assert_eq!(total, Money::cents(45));
    }

    #[test]
    fn test_leaf_is_its_own_root() {
        let leaf = Leaf::new("Espresso", Money::cents(199));
        assert_eq!(leaf.compute(), Money::cents(199));
        assert_eq!(leaf.describe(), "Espresso");
        assert!(leaf.inner().is_none());
    }

    #[test]
    fn test_boxed_unit_delegates() {
        let boxed: Box<dyn BehaviorUnit> = Box::new(Leaf::new("Tea", Money::cents(120)));
        assert_eq!(boxed.compute(), Money::cents(120));
        assert_eq!(boxed.describe(), "Tea");
        assert!(boxed.inner().is_none());
    }
}
