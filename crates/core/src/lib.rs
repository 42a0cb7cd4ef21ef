//! # Behavior Core - Run-Time Behavior Composition
//!
//! This crate lets a host attach, swap, and sequence behaviors on an object
//! at run time without modifying the object itself:
//!
//! - **Capabilities**: The common contract composable units implement
//! - **Decorators**: Additive layers wrapped around a single root unit
//! - **Strategies**: One swappable algorithm per capability slot
//! - **Chains**: Ordered handlers that each consume part of a request
//! - **State Machines**: Operations governed by a total transition table
//! - **Notification Hubs**: Synchronous, ordered one-to-many delivery
//!
//! ## Design Philosophy
//!
//! Composition over inheritance. Instead of one type per combination
//! (`EspressoWithMilkAndWhip`), a fixed set of single-purpose pieces is
//! combined at run time, and the rules that govern them (handler order,
//! transition tables) are data that can be inspected and tested directly.
//!
//! Everything is synchronous and in-process. Mutable shared pieces (strategy
//! slots, hubs, machine state) each carry their own lock.

pub mod capability;
pub mod chain;
pub mod config;
pub mod decorator;
pub mod error;
pub mod notify;
pub mod state;
pub mod strategy;

// Re-export key types at crate root for convenience
pub use capability::{BehaviorUnit, Leaf, Money};
pub use chain::{
    Chain, ChainBuilder, Dispatch, FnHandler, Handler, HandlerId, Portion, Remainder, Resolution,
    Split, Unsatisfiable,
};
pub use config::HubConfig;
pub use decorator::{Addition, Decorated, DecoratorChain, Layer};
pub use error::CoreError;
pub use notify::{
    CompositeObserver, Delivery, FnObserver, LoggingObserver, NotificationHub, ObservedValue,
    Observer,
};
pub use state::{
    OperationSet, Outcome, Rejection, Rule, StateMachine, StateSet, Transition, TransitionTable,
};
pub use strategy::{FnStrategy, SharedStrategy, Strategy, StrategySlot};
