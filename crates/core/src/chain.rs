//! # Responsibility Chains
//!
//! An ordered sequence of handlers. Each one consumes the part of a request
//! it can satisfy and forwards the remainder to the next.
//!
//! ```text
//!  8700 ──▶ [2000] ──700──▶ [500] ──200──▶ [100] ──0──▶ done
//!             │               │              │
//!          4 × 2000        1 × 500        2 × 100
//! ```
//!
//! ## Design
//!
//! - [`Handler<R>`]: "take what you can from `R`, hand back the rest"
//! - [`Chain`]: owns every handler in an arena; each node keeps a
//!   non-owning index to its successor
//! - [`Dispatch`]: the portions produced plus a [`Resolution`]
//!
//! A remainder that survives the last handler is reported as
//! [`Resolution::Unsatisfiable`], never silently dropped.
//!
//! The handler sequence is data, fixed at build time. Links only ever point
//! forward, so a chain has exactly one entry and no cycles.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CoreError;

// ============================================================================
// Requests and Handlers
// ============================================================================

/// A request quantity that handlers reduce step by step.
pub trait Remainder: Clone + fmt::Debug + Send {
    /// Whether nothing is left to handle.
    fn is_exhausted(&self) -> bool;
}

macro_rules! impl_remainder_for_unsigned {
    ($($t:ty),*) => {
        $(
            impl Remainder for $t {
                fn is_exhausted(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_remainder_for_unsigned!(u8, u16, u32, u64, u128, usize);

/// What one handler did with the request it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split<R, P> {
    /// The part this handler satisfied, if any.
    pub portion: Option<P>,
    /// What is left for the rest of the chain.
    pub remainder: R,
}

impl<R, P> Split<R, P> {
    /// The handler satisfied `portion` and left `remainder`.
    pub fn took(portion: P, remainder: R) -> Self {
        Self {
            portion: Some(portion),
            remainder,
        }
    }

    /// The handler could not satisfy anything.
    pub fn pass(remainder: R) -> Self {
        Self {
            portion: None,
            remainder,
        }
    }
}

/// A link in a responsibility chain.
///
/// Handlers take `&self`: handling a request never changes a handler's
/// configuration, and a handler cannot reach any other handler.
pub trait Handler<R>: Send + Sync {
    /// The partial result this handler produces.
    type Portion;

    /// Human-readable label (e.g. "2000 note").
    fn label(&self) -> String;

    /// Satisfy what this handler can and return the remainder.
    fn take(&self, request: R) -> Split<R, Self::Portion>;
}

/// Adapts a closure into a [`Handler`].
pub struct FnHandler<F> {
    label: String,
    f: F,
}

impl<F> FnHandler<F> {
    /// Create a labelled handler from a closure.
    pub fn new(label: impl Into<String>, f: F) -> Self {
        Self {
            label: label.into(),
            f,
        }
    }
}

impl<R, P, F> Handler<R> for FnHandler<F>
where
    F: Fn(R) -> Split<R, P> + Send + Sync,
{
    type Portion = P;

    fn label(&self) -> String {
        self.label.clone()
    }

    fn take(&self, request: R) -> Split<R, P> {
        (self.f)(request)
    }
}

// ============================================================================
// Dispatch Results
// ============================================================================

/// Index of a handler inside its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandlerId(pub usize);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// A partial result produced by one handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portion<P> {
    /// Which handler produced it.
    pub handler: HandlerId,
    /// That handler's label.
    pub label: String,
    /// The partial result.
    pub value: P,
}

/// Whether the chain reduced the request to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution<R> {
    /// The remainder reached zero.
    Satisfied,
    /// The last handler still left something over.
    Unsatisfiable { remainder: R },
}

/// The full result of [`Chain::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch<R, P> {
    /// Partial results, in chain order.
    pub portions: Vec<Portion<P>>,
    /// Overall outcome.
    pub resolution: Resolution<R>,
}

impl<R, P> Dispatch<R, P> {
    /// Whether the request was fully satisfied.
    pub fn is_satisfied(&self) -> bool {
        matches!(self.resolution, Resolution::Satisfied)
    }

    /// The unresolved remainder, if any.
    pub fn remainder(&self) -> Option<&R> {
        match &self.resolution {
            Resolution::Satisfied => None,
            Resolution::Unsatisfiable { remainder } => Some(remainder),
        }
    }

    /// Convert into a `Result`, treating a leftover as an error.
    pub fn into_result(self) -> Result<Vec<Portion<P>>, Unsatisfiable<R, P>> {
        match self.resolution {
            Resolution::Satisfied => Ok(self.portions),
            Resolution::Unsatisfiable { remainder } => Err(Unsatisfiable {
                remainder,
                partial: self.portions,
            }),
        }
    }
}

/// A request the chain could not reduce to zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request unsatisfiable: {remainder:?} left after the last handler")]
pub struct Unsatisfiable<R, P> {
    /// What no handler could take.
    pub remainder: R,
    /// What the handlers did take before giving up.
    pub partial: Vec<Portion<P>>,
}

// ============================================================================
// Chain
// ============================================================================

struct Link<R, P> {
    handler: Box<dyn Handler<R, Portion = P>>,
    next: Option<HandlerId>,
}

/// An ordered, immutable sequence of handlers.
///
/// # Example
///
/// ```
/// use behavior_core::chain::{ChainBuilder, FnHandler, Split};
///
/// let note = |unit: u64| {
///     FnHandler::new(format!("{unit}"), move |amount: u64| {
///         if amount >= unit {
///             Split::took(amount / unit, amount % unit)
///         } else {
///             Split::pass(amount)
///         }
///     })
/// };
///
/// let chain = ChainBuilder::new()
///     .then(note(2000))
///     .then(note(500))
///     .then(note(100))
///     .build()
///     .unwrap();
///
/// let result = chain.dispatch(8700);
/// assert!(result.is_satisfied());
/// let counts: Vec<u64> = result.portions.iter().map(|p| p.value).collect();
/// assert_eq!(counts, vec![4, 1, 2]);
///
/// assert_eq!(chain.dispatch(8753).remainder(), Some(&53));
/// ```
pub struct Chain<R, P> {
    links: Vec<Link<R, P>>,
}

impl<R: Remainder, P> Chain<R, P> {
    /// The entry handler.
    pub fn entry(&self) -> HandlerId {
        HandlerId(0)
    }

    /// Number of handlers.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Always false: a built chain has at least one handler.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The successor of a handler, if any.
    pub fn next_of(&self, id: HandlerId) -> Option<HandlerId> {
        self.links.get(id.0).and_then(|link| link.next)
    }

    /// Handler labels in chain order.
    pub fn labels(&self) -> Vec<String> {
        self.links.iter().map(|link| link.handler.label()).collect()
    }

    /// Present a request to the entry handler and follow the links.
    pub fn dispatch(&self, request: R) -> Dispatch<R, P> {
        let mut portions = Vec::new();
        let mut remainder = request;
        let mut cursor = Some(self.entry());

        while let Some(id) = cursor {
            let link = &self.links[id.0];
            let split = link.handler.take(remainder);
            remainder = split.remainder;

            if let Some(value) = split.portion {
                let label = link.handler.label();
                tracing::debug!(handler = %id, label = %label, remainder = ?remainder, "handler took portion");
                portions.push(Portion {
                    handler: id,
                    label,
                    value,
                });
            }

            if remainder.is_exhausted() {
                return Dispatch {
                    portions,
                    resolution: Resolution::Satisfied,
                };
            }
            cursor = link.next;
        }

        tracing::warn!(remainder = ?remainder, "request unsatisfiable");
        Dispatch {
            portions,
            resolution: Resolution::Unsatisfiable { remainder },
        }
    }
}

impl<R, P> fmt::Debug for Chain<R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field(
                "handlers",
                &self.links.iter().map(|l| l.handler.label()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Assembles a [`Chain`] in caller-supplied order.
pub struct ChainBuilder<R, P> {
    handlers: Vec<Box<dyn Handler<R, Portion = P>>>,
}

impl<R, P> ChainBuilder<R, P> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Append a handler after those already added.
    pub fn then<H>(mut self, handler: H) -> Self
    where
        H: Handler<R, Portion = P> + 'static,
    {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Append an already boxed handler.
    pub fn then_boxed(mut self, handler: Box<dyn Handler<R, Portion = P>>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Link the handlers in order.
    ///
    /// Returns `EmptyChain` if no handler was added.
    pub fn build(self) -> Result<Chain<R, P>, CoreError> {
        if self.handlers.is_empty() {
            return Err(CoreError::EmptyChain);
        }

        let count = self.handlers.len();
        let links = self
            .handlers
            .into_iter()
            .enumerate()
            .map(|(i, handler)| Link {
                handler,
                next: (i + 1 < count).then_some(HandlerId(i + 1)),
            })
            .collect();

        Ok(Chain { links })
    }
}

impl<R, P> Default for ChainBuilder<R, P> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
