//! # Ducks
//!
//! Flying and walking vary independently of what kind of duck a host is,
//! so each is a [`StrategySlot`] the duck delegates to. A rubber duck and a
//! mallard are the same type with different strategies plugged in:
//!
//! ```text
//!   Duck "mallard"
//!     fly  ──▶ SimpleFly
//!     walk ──▶ Waddle
//!
//!   Duck "rubber"
//!     fly  ──▶ NoFly      (swappable at run time: set_fly_behavior(JetFly))
//!     walk ──▶ NoWalk
//! ```

use std::sync::Arc;

use behavior_core::{SharedStrategy, Strategy, StrategySlot};

use crate::CatalogError;

/// A flying strategy, given the duck's name.
pub type FlyBehavior = SharedStrategy<str, String>;

/// A walking strategy, given the duck's name.
pub type WalkBehavior = SharedStrategy<str, String>;

// ============================================================================
// Strategies
// ============================================================================

/// Flaps its wings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleFly;

impl Strategy<str, String> for SimpleFly {
    fn name(&self) -> &str {
        "simple-fly"
    }

    fn apply(&self, duck: &str) -> String {
        format!("{duck} flies by flapping its wings")
    }
}

/// Stays on the ground.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFly;

impl Strategy<str, String> for NoFly {
    fn name(&self) -> &str {
        "no-fly"
    }

    fn apply(&self, duck: &str) -> String {
        format!("{duck} cannot fly")
    }
}

/// Rocket-assisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct JetFly;

impl Strategy<str, String> for JetFly {
    fn name(&self) -> &str {
        "jet-fly"
    }

    fn apply(&self, duck: &str) -> String {
        format!("{duck} flies with a jet pack")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Waddle;

impl Strategy<str, String> for Waddle {
    fn name(&self) -> &str {
        "waddle"
    }

    fn apply(&self, duck: &str) -> String {
        format!("{duck} waddles")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoWalk;

impl Strategy<str, String> for NoWalk {
    fn name(&self) -> &str {
        "no-walk"
    }

    fn apply(&self, duck: &str) -> String {
        format!("{duck} cannot walk")
    }
}

// ============================================================================
// Duck
// ============================================================================

/// A host whose movement is entirely delegated.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use behavior_catalog::flight::{Duck, JetFly, NoFly};
///
/// let duck = Duck::new("rubber").with_fly_behavior(Arc::new(NoFly));
/// assert_eq!(duck.fly().unwrap(), "rubber cannot fly");
///
/// duck.set_fly_behavior(Arc::new(JetFly));
/// assert_eq!(duck.fly().unwrap(), "rubber flies with a jet pack");
/// ```
#[derive(Debug)]
pub struct Duck {
    name: String,
    fly: StrategySlot<str, String>,
    walk: StrategySlot<str, String>,
}

impl Duck {
    /// A duck with no behaviors yet. Calling `fly` or `walk` before a
    /// strategy is set fails with `StrategyUnset`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fly: StrategySlot::labelled("fly"),
            walk: StrategySlot::labelled("walk"),
        }
    }

    /// A duck that flaps and waddles.
    pub fn mallard(name: impl Into<String>) -> Self {
        Self::new(name)
            .with_fly_behavior(Arc::new(SimpleFly))
            .with_walk_behavior(Arc::new(Waddle))
    }

    /// A duck that does neither.
    pub fn rubber(name: impl Into<String>) -> Self {
        Self::new(name)
            .with_fly_behavior(Arc::new(NoFly))
            .with_walk_behavior(Arc::new(NoWalk))
    }

    pub fn with_fly_behavior(self, behavior: FlyBehavior) -> Self {
        self.fly.set_strategy(behavior);
        self
    }

    pub fn with_walk_behavior(self, behavior: WalkBehavior) -> Self {
        self.walk.set_strategy(behavior);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Swap the flying strategy; returns the one it replaced.
    pub fn set_fly_behavior(&self, behavior: FlyBehavior) -> Option<FlyBehavior> {
        self.fly.set_strategy(behavior)
    }

    /// Swap the walking strategy; returns the one it replaced.
    pub fn set_walk_behavior(&self, behavior: WalkBehavior) -> Option<WalkBehavior> {
        self.walk.set_strategy(behavior)
    }

    pub fn fly(&self) -> Result<String, CatalogError> {
        Ok(self.fly.invoke(&self.name)?)
    }

    pub fn walk(&self) -> Result<String, CatalogError> {
        Ok(self.walk.invoke(&self.name)?)
    }

    /// Names of the active strategies, `(fly, walk)`.
    pub fn behaviors(&self) -> (Option<String>, Option<String>) {
        (self.fly.current_name(), self.walk.current_name())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use behavior_core::CoreError;

    #[test]
    fn test_mallard_and_rubber() {
        let mallard = Duck::mallard("Mallard");
        let rubber = Duck::rubber("Rubber");

        assert_eq!(mallard.fly().unwrap(), "Mallard flies by flapping its wings");
        assert_eq!(mallard.walk().unwrap(), "Mallard waddles");
        assert_eq!(rubber.fly().unwrap(), "Rubber cannot fly");
        assert_eq!(rubber.walk().unwrap(), "Rubber cannot walk");
    }

    #[test]
    fn test_unconfigured_duck_fails() {
        let duck = Duck::new("decoy");
        let err = duck.fly().unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Core(CoreError::StrategyUnset { ref capability }) if capability == "fly"
        ));
        assert_eq!(duck.behaviors(), (None, None));
    }

    #[test]
    fn test_swap_returns_previous() {
        let duck = Duck::rubber("Rubber");
        let previous = duck.set_fly_behavior(Arc::new(JetFly)).unwrap();
        assert_eq!(previous.name(), "no-fly");
        assert_eq!(duck.fly().unwrap(), "Rubber flies with a jet pack");
        assert_eq!(duck.behaviors().0.as_deref(), Some("jet-fly"));
    }

    #[test]
    fn test_shared_strategy_across_ducks() {
        let jet: FlyBehavior = Arc::new(JetFly);
        let a = Duck::new("a").with_fly_behavior(Arc::clone(&jet));
        let b = Duck::new("b").with_fly_behavior(jet);

        assert_eq!(a.fly().unwrap(), "a flies with a jet pack");
        assert_eq!(b.fly().unwrap(), "b flies with a jet pack");
        // Swapping one host leaves the other alone.
        a.set_fly_behavior(Arc::new(NoFly));
        assert_eq!(b.fly().unwrap(), "b flies with a jet pack");
    }
}
