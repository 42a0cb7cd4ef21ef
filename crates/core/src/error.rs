//! # Error Types
//!
//! Structural failures: attempts to use a composition that was never
//! completely assembled. These abort the single operation that hit them and
//! leave the instance untouched.
//!
//! Expected outcomes a caller branches on are *not* here: a rejected state
//! transition is [`crate::state::Rejection`], and a request no handler could
//! finish is [`crate::chain::Unsatisfiable`].

use thiserror::Error;

/// Configuration errors for the composition runtime.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A decorator chain was built without a root unit.
    #[error("Decorator chain has no base unit ({layers} layer(s) pending)")]
    MissingBase { layers: usize },

    /// A strategy slot was invoked before any strategy was set.
    #[error("No strategy set for capability '{capability}'")]
    StrategyUnset { capability: String },

    /// A responsibility chain was built with no handlers.
    #[error("Responsibility chain has no entry handler")]
    EmptyChain,

    /// A transition table leaves a (state, operation) pair undefined.
    #[error("Transition table has no rule for ({state}, {operation})")]
    IncompleteTable { state: String, operation: String },

    /// A transition table defines the same (state, operation) pair twice.
    #[error("Transition table defines ({state}, {operation}) more than once")]
    DuplicateRule { state: String, operation: String },
}
