//! # Strategy Slots
//!
//! A host holds exactly one active algorithm for a capability and can swap
//! it at any time without changing the host's type.
//!
//! ```text
//!        ┌──────────────┐
//!  In ──▶│ StrategySlot │──▶ Out
//!        └──────┬───────┘
//!               │ holds one of
//!      ┌────────┼────────┐
//!   SimpleFly  NoFly   JetFly
//! ```
//!
//! Swap the strategy → different behavior, same host.
//!
//! ## Concurrency
//!
//! Each slot has its own lock. `invoke` clones the current `Arc` under a read
//! lock and runs it after the lock is released, so a concurrent
//! `set_strategy` is seen either entirely or not at all.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::CoreError;

/// A swappable algorithm: `In → Out`.
pub trait Strategy<In: ?Sized, Out>: Send + Sync {
    /// Human-readable name of this strategy.
    fn name(&self) -> &str;

    /// Run the algorithm.
    fn apply(&self, input: &In) -> Out;
}

/// Adapts a closure into a [`Strategy`].
pub struct FnStrategy<F> {
    name: String,
    f: F,
}

impl<F> FnStrategy<F> {
    /// Create a named strategy from a closure.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<In: ?Sized, Out, F> Strategy<In, Out> for FnStrategy<F>
where
    F: Fn(&In) -> Out + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, input: &In) -> Out {
        (self.f)(input)
    }
}

/// A shared handle to a strategy.
pub type SharedStrategy<In, Out> = Arc<dyn Strategy<In, Out>>;

/// Holds the active strategy for one capability of a host.
///
/// # Example
///
/// ```
/// use behavior_core::{FnStrategy, StrategySlot};
/// use std::sync::Arc;
///
/// let slot: StrategySlot<u32, u32> = StrategySlot::labelled("pricing");
/// assert!(slot.invoke(&10).is_err());
///
/// slot.set_strategy(Arc::new(FnStrategy::new("double", |x: &u32| x * 2)));
/// assert_eq!(slot.invoke(&10).unwrap(), 20);
///
/// slot.set_strategy(Arc::new(FnStrategy::new("identity", |x: &u32| *x)));
/// assert_eq!(slot.invoke(&10).unwrap(), 10);
/// ```
pub struct StrategySlot<In: ?Sized, Out> {
    label: String,
    current: RwLock<Option<SharedStrategy<In, Out>>>,
}

impl<In: ?Sized, Out> StrategySlot<In, Out> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::labelled("strategy")
    }

    /// Create an empty slot with a capability label used in errors and logs.
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            current: RwLock::new(None),
        }
    }

    /// Create a slot that already holds a strategy.
    pub fn with_strategy(label: impl Into<String>, strategy: SharedStrategy<In, Out>) -> Self {
        Self {
            label: label.into(),
            current: RwLock::new(Some(strategy)),
        }
    }

    /// The capability label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the active strategy, returning the previous one.
    pub fn set_strategy(
        &self,
        strategy: SharedStrategy<In, Out>,
    ) -> Option<SharedStrategy<In, Out>> {
        tracing::debug!(slot = %self.label, strategy = strategy.name(), "strategy set");
        self.current.write().replace(strategy)
    }

    /// Remove the active strategy, returning it.
    pub fn clear(&self) -> Option<SharedStrategy<In, Out>> {
        self.current.write().take()
    }

    /// Whether a strategy is currently held.
    pub fn is_configured(&self) -> bool {
        self.current.read().is_some()
    }

    /// Name of the active strategy, if any.
    pub fn current_name(&self) -> Option<String> {
        self.current.read().as_ref().map(|s| s.name().to_string())
    }

    /// The active strategy, if any.
    pub fn current(&self) -> Option<SharedStrategy<In, Out>> {
        self.current.read().clone()
    }

    /// Delegate to the active strategy.
    ///
    /// Returns `StrategyUnset` if no strategy has been set.
    pub fn invoke(&self, input: &In) -> Result<Out, CoreError> {
        let strategy = self.current().ok_or_else(|| CoreError::StrategyUnset {
            capability: self.label.clone(),
        })?;
        tracing::trace!(slot = %self.label, strategy = strategy.name(), "invoking strategy");
        Ok(strategy.apply(input))
    }
}

impl<In: ?Sized, Out> Default for StrategySlot<In, Out> {
    fn default() -> Self {
        Self::new()
    }
}

impl<In: ?Sized, Out> fmt::Debug for StrategySlot<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategySlot")
            .field("label", &self.label)
            .field("current", &self.current_name())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
