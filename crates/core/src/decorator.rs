//! # Decorator Chains
//!
//! Wrap a base unit with layers, each one delegating to the wrapped unit and
//! then applying exactly one additive change to the result.
//!
//! ```text
//!   ┌───────────────────────────────┐
//!   │ Whip                          │  cost = inner + 20
//!   │  ┌─────────────────────────┐  │
//!   │  │ Mocha                   │  │  cost = inner + 20
//!   │  │  ┌───────────────────┐  │  │
//!   │  │  │ Espresso (root)   │  │  │  cost = 199
//!   │  │  └───────────────────┘  │  │
//!   │  └─────────────────────────┘  │
//!   └───────────────────────────────┘
//! ```
//!
//! Calls travel from the outermost layer down to the root; effects compose
//! back up, so the innermost layer applies first.
//!
//! ## Ownership
//!
//! A [`Decorated`] exclusively owns the unit it wraps. The wrap relation is a
//! strict forward chain ending at exactly one root: there is no way to share
//! a wrapped unit or to build a cycle. Shared handles are not units:
//!
//! ```compile_fail
//! use std::sync::Arc;
//! use behavior_core::decorator::wrap;
//! use behavior_core::{Addition, Leaf, Money};
//!
//! let base = Arc::new(Leaf::new("Espresso", Money::cents(199)));
//! let milk = wrap(Arc::clone(&base), Addition::new("Milk", Money::cents(10)));
//! ```

use crate::capability::{BehaviorUnit, Money};
use crate::error::CoreError;

// ============================================================================
// Layer
// ============================================================================

/// One additive transformation applied on top of a wrapped unit.
pub trait Layer: Send + Sync {
    /// Name of this layer (e.g. "Mocha").
    fn name(&self) -> &str;

    /// Transform the wrapped unit's cost.
    fn apply_cost(&self, inner: Money) -> Money;

    /// Transform the wrapped unit's description.
    fn apply_description(&self, inner: String) -> String;
}

/// A layer that adds a fixed cost and appends a description fragment.
///
/// # Example
///
/// ```
/// use behavior_core::{Addition, BehaviorUnit, Leaf, Money};
/// use behavior_core::decorator::wrap;
///
/// let espresso = Leaf::new("Espresso", Money::cents(199));
/// let mocha = wrap(espresso, Addition::new("Mocha", Money::cents(20)));
///
/// assert_eq!(mocha.compute(), Money::cents(219));
/// assert_eq!(mocha.describe(), "Espresso, Mocha");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addition {
    label: String,
    delta: Money,
}

impl Addition {
    /// Create an additive layer.
    pub fn new(label: impl Into<String>, delta: Money) -> Self {
        Self {
            label: label.into(),
            delta,
        }
    }

    /// The fixed cost this layer adds.
    pub fn delta(&self) -> Money {
        self.delta
    }
}

impl Layer for Addition {
    fn name(&self) -> &str {
        &self.label
    }

    fn apply_cost(&self, inner: Money) -> Money {
        inner + self.delta
    }

    fn apply_description(&self, mut inner: String) -> String {
        inner.push_str(", ");
        inner.push_str(&self.label);
        inner
    }
}

// ============================================================================
// Decorated
// ============================================================================

/// A unit wrapped by one layer. Owns the wrapped unit.
pub struct Decorated {
    inner: Box<dyn BehaviorUnit>,
    layer: Box<dyn Layer>,
}

impl Decorated {
    /// Wrap `inner` with `layer`.
    pub fn new(inner: Box<dyn BehaviorUnit>, layer: Box<dyn Layer>) -> Self {
        Self { inner, layer }
    }

    /// Remove the outer layer, returning the wrapped unit.
    pub fn unwrap_layer(self) -> Box<dyn BehaviorUnit> {
        self.inner
    }
}

impl BehaviorUnit for Decorated {
    fn name(&self) -> &str {
        self.layer.name()
    }

    fn compute(&self) -> Money {
        self.layer.apply_cost(self.inner.compute())
    }

    fn describe(&self) -> String {
        self.layer.apply_description(self.inner.describe())
    }

    fn inner(&self) -> Option<&dyn BehaviorUnit> {
        Some(self.inner.as_ref())
    }
}

impl std::fmt::Debug for Decorated {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decorated")
            .field("layer", &self.layer.name())
            .field("inner", &self.inner.name())
            .finish()
    }
}

/// Wrap a unit with one layer.
pub fn wrap<U, L>(base: U, layer: L) -> Decorated
where
    U: BehaviorUnit + 'static,
    L: Layer + 'static,
{
    Decorated::new(Box::new(base), Box::new(layer))
}

// ============================================================================
// Chain Builder
// ============================================================================

/// Assembles a decorator chain at configuration time.
///
/// Layers are applied in the order they are added: the first `wrap` call
/// becomes the innermost layer.
///
/// # Example
///
/// ```
/// use behavior_core::{Addition, BehaviorUnit, DecoratorChain, Leaf, Money};
///
/// let order = DecoratorChain::new()
///     .base(Leaf::new("DarkRoast", Money::cents(99)))
///     .wrap(Addition::new("Mocha", Money::cents(20)))
///     .wrap(Addition::new("Mocha", Money::cents(20)))
///     .wrap(Addition::new("Whip", Money::cents(20)))
///     .build()
///     .unwrap();
///
/// assert_eq!(order.compute(), Money::cents(159));
/// assert_eq!(order.describe(), "DarkRoast, Mocha, Mocha, Whip");
///
/// // No base: fails fast.
/// assert!(DecoratorChain::new().wrap(Addition::new("Soy", Money::cents(15))).build().is_err());
/// ```
#[derive(Default)]
pub struct DecoratorChain {
    base: Option<Box<dyn BehaviorUnit>>,
    layers: Vec<Box<dyn Layer>>,
}

impl DecoratorChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root unit. Replaces any previously set base.
    pub fn base<U: BehaviorUnit + 'static>(mut self, unit: U) -> Self {
        self.base = Some(Box::new(unit));
        self
    }

    /// Set the root unit from an already boxed unit.
    pub fn base_boxed(mut self, unit: Box<dyn BehaviorUnit>) -> Self {
        self.base = Some(unit);
        self
    }

    /// Add a layer on top of everything added so far.
    pub fn wrap<L: Layer + 'static>(mut self, layer: L) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Add an already boxed layer.
    pub fn wrap_boxed(mut self, layer: Box<dyn Layer>) -> Self {
        self.layers.push(layer);
        self
    }

    /// Number of layers added so far.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Build the composed unit.
    ///
    /// Returns `MissingBase` if no root unit was set.
    pub fn build(self) -> Result<Box<dyn BehaviorUnit>, CoreError> {
        let base = self.base.ok_or(CoreError::MissingBase {
            layers: self.layers.len(),
        })?;

        let root = base.name().to_string();
        let depth = self.layers.len();
        let unit = self
            .layers
            .into_iter()
            .fold(base, |inner, layer| -> Box<dyn BehaviorUnit> {
                Box::new(Decorated::new(inner, layer))
            });

        tracing::trace!(root = %root, depth, "built decorator chain");
        Ok(unit)
    }
}

impl std::fmt::Debug for DecoratorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoratorChain")
            .field("base", &self.base.as_ref().map(|b| b.name().to_string()))
            .field("layer_count", &self.layers.len())
            .finish()
    }
}

// ============================================================================
// Inspection
// ============================================================================

/// Number of layers above the root.
pub fn depth(unit: &dyn BehaviorUnit) -> usize {
    let mut depth = 0;
    let mut current = unit;
    while let Some(inner) = current.inner() {
        depth += 1;
        current = inner;
    }
    depth
}

/// The unique non-decorator unit at the base of the chain.
pub fn root(unit: &dyn BehaviorUnit) -> &dyn BehaviorUnit {
    let mut current = unit;
    while let Some(inner) = current.inner() {
        current = inner;
    }
    current
}

/// Layer names, innermost first.
pub fn layer_names(unit: &dyn BehaviorUnit) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = unit;
    while let Some(inner) = current.inner() {
        names.push(current.name().to_string());
        current = inner;
    }
    names.reverse();
    names
}

// ============================================================================
// Tests
// ============================================================================
