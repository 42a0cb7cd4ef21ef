//! # State Machines
//!
//! A host whose operations depend on a current state drawn from a finite
//! set. The rules live in a [`TransitionTable`]: data, not branching code.
//!
//! ## Totality
//!
//! Every `(state, operation)` pair must have a rule, either
//! [`Rule::Allow`] or [`Rule::Reject`]. The builder refuses incomplete
//! tables, so no operation can silently do nothing.
//!
//! ## Reference Instance
//!
//! | State      | `edit`                    | `publish`         |
//! |------------|---------------------------|-------------------|
//! | Draft      | allowed, stays Draft      | → Moderation      |
//! | Moderation | rejected (under review)   | → Published       |
//! | Published  | rejected (immutable)      | rejected          |
//!
//! ## Inspection
//!
//! [`TransitionTable::graph`] exposes the state-changing transitions as a
//! `petgraph` digraph, which makes properties like "Draft is unreachable
//! once left" checkable without running the machine.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::HubConfig;
use crate::error::CoreError;
use crate::notify::NotificationHub;

// ============================================================================
// State and Operation Sets
// ============================================================================

/// A finite set of states.
pub trait StateSet: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Every state, in a fixed order.
    fn all() -> &'static [Self];
}

/// A finite set of operations.
pub trait OperationSet: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Every operation, in a fixed order.
    fn all() -> &'static [Self];
}

// ============================================================================
// Transition Table
// ============================================================================

/// The outcome an operation has in a given state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule<S> {
    /// Perform `effect` and move to `next` (which may equal the current state).
    Allow { next: S, effect: String },
    /// Refuse the operation.
    Reject { reason: String },
}

/// A total mapping `(state, operation) → rule`.
#[derive(Debug, Clone)]
pub struct TransitionTable<S, O> {
    rules: HashMap<(S, O), Rule<S>>,
}

impl<S: StateSet, O: OperationSet> TransitionTable<S, O> {
    /// Start building a table.
    pub fn builder() -> TransitionTableBuilder<S, O> {
        TransitionTableBuilder::new()
    }

    /// The rule for `op` in `state`.
    pub fn rule(&self, state: S, op: O) -> Option<&Rule<S>> {
        self.rules.get(&(state, op))
    }

    /// Every state, in declaration order.
    pub fn states(&self) -> &'static [S] {
        S::all()
    }

    /// State-changing transitions as a digraph. Node `i` is `S::all()[i]`.
    ///
    /// Self-loops (allowed operations that keep the state) are omitted.
    pub fn graph(&self) -> DiGraph<S, O> {
        let mut graph = DiGraph::new();
        let nodes: HashMap<S, NodeIndex> = S::all()
            .iter()
            .map(|&s| (s, graph.add_node(s)))
            .collect();

        for &state in S::all() {
            for &op in O::all() {
                if let Some(Rule::Allow { next, .. }) = self.rule(state, op) {
                    if *next != state {
                        if let (Some(&from), Some(&to)) = (nodes.get(&state), nodes.get(next)) {
                            graph.add_edge(from, to, op);
                        }
                    }
                }
            }
        }
        graph
    }

    /// Every state reachable from `start` by zero or more transitions.
    pub fn reachable_from(&self, start: S) -> Vec<S> {
        let graph = self.graph();
        let Some(index) = S::all().iter().position(|&s| s == start) else {
            return Vec::new();
        };

        let mut reached = Vec::new();
        let mut bfs = Bfs::new(&graph, NodeIndex::new(index));
        while let Some(node) = bfs.next(&graph) {
            reached.push(graph[node]);
        }
        reached
    }

    /// Whether no operation moves the machine out of `state`.
    pub fn is_terminal(&self, state: S) -> bool {
        O::all().iter().all(|&op| match self.rule(state, op) {
            Some(Rule::Allow { next, .. }) => *next == state,
            _ => true,
        })
    }
}

/// Collects rules and checks the table is total.
#[derive(Debug)]
pub struct TransitionTableBuilder<S, O> {
    rules: HashMap<(S, O), Rule<S>>,
    duplicate: Option<(S, O)>,
}

impl<S: StateSet, O: OperationSet> TransitionTableBuilder<S, O> {
    fn new() -> Self {
        Self {
            rules: HashMap::new(),
            duplicate: None,
        }
    }

    fn insert(mut self, state: S, op: O, rule: Rule<S>) -> Self {
        if self.rules.insert((state, op), rule).is_some() && self.duplicate.is_none() {
            self.duplicate = Some((state, op));
        }
        self
    }

    /// Allow `op` in `state`, moving to `next` with a described effect.
    pub fn allow(self, state: S, op: O, next: S, effect: impl Into<String>) -> Self {
        self.insert(
            state,
            op,
            Rule::Allow {
                next,
                effect: effect.into(),
            },
        )
    }

    /// Reject `op` in `state`.
    pub fn reject(self, state: S, op: O, reason: impl Into<String>) -> Self {
        self.insert(
            state,
            op,
            Rule::Reject {
                reason: reason.into(),
            },
        )
    }

    /// Validate and build.
    ///
    /// Fails with `DuplicateRule` if a pair was defined twice, or
    /// `IncompleteTable` naming the first pair left undefined.
    pub fn build(self) -> Result<TransitionTable<S, O>, CoreError> {
        if let Some((state, op)) = self.duplicate {
            return Err(CoreError::DuplicateRule {
                state: state.to_string(),
                operation: op.to_string(),
            });
        }

        for &state in S::all() {
            for &op in O::all() {
                if !self.rules.contains_key(&(state, op)) {
                    return Err(CoreError::IncompleteTable {
                        state: state.to_string(),
                        operation: op.to_string(),
                    });
                }
            }
        }

        Ok(TransitionTable { rules: self.rules })
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// An operation that was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition<S, O> {
    pub from: S,
    pub to: S,
    pub operation: O,
    pub effect: String,
}

impl<S: PartialEq, O> Transition<S, O> {
    /// Whether the state actually changed.
    pub fn changed_state(&self) -> bool {
        self.from != self.to
    }
}

/// An operation the current state does not permit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{operation} rejected in state {state}: {reason}")]
pub struct Rejection<S, O> {
    pub state: S,
    pub operation: O,
    pub reason: String,
}

/// Result of [`StateMachine::apply`]. Rejection is a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome<S, O> {
    Applied(Transition<S, O>),
    Rejected(Rejection<S, O>),
}

impl<S, O> Outcome<S, O> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    /// Convert into a `Result` so a rejection can be propagated with `?`.
    pub fn into_result(self) -> Result<Transition<S, O>, Rejection<S, O>> {
        match self {
            Outcome::Applied(transition) => Ok(transition),
            Outcome::Rejected(rejection) => Err(rejection),
        }
    }
}

// ============================================================================
// State Machine
// ============================================================================

struct Current<S> {
    state: S,
    applied: usize,
}

/// A host object whose state changes only through its transition table.
///
/// Applied transitions are announced on [`StateMachine::hub`] after the
/// new state is stored and the machine's lock is released.
///
/// Each applied transition is delivered exactly once, but when two threads
/// apply operations concurrently their notifications may reach observers in
/// the opposite order to the one in which the transitions were applied.
/// Observers that need the serial order should read [`Transition::from`]
/// and [`Transition::to`] rather than rely on arrival order.
///
/// # Example
///
/// ```
/// use behavior_core::state::{OperationSet, StateMachine, StateSet, TransitionTable};
/// use std::fmt;
/// use std::sync::Arc;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Light { Off, On }
/// impl StateSet for Light {
///     fn all() -> &'static [Self] { &[Light::Off, Light::On] }
/// }
/// impl fmt::Display for Light {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:?}", self) }
/// }
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Toggle { Flip }
/// impl OperationSet for Toggle {
///     fn all() -> &'static [Self] { &[Toggle::Flip] }
/// }
/// impl fmt::Display for Toggle {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "flip") }
/// }
///
/// let table = TransitionTable::builder()
///     .allow(Light::Off, Toggle::Flip, Light::On, "lamp on")
///     .allow(Light::On, Toggle::Flip, Light::Off, "lamp off")
///     .build()
///     .unwrap();
///
/// let lamp = StateMachine::new(Arc::new(table), Light::Off);
/// assert!(lamp.apply(Toggle::Flip).is_applied());
/// assert_eq!(lamp.state(), Light::On);
/// ```
pub struct StateMachine<S, O> {
    table: Arc<TransitionTable<S, O>>,
    current: Mutex<Current<S>>,
    hub: NotificationHub<Transition<S, O>>,
}

impl<S: StateSet, O: OperationSet> StateMachine<S, O> {
    /// Create a machine in `initial` state.
    pub fn new(table: Arc<TransitionTable<S, O>>, initial: S) -> Self {
        Self::with_config(table, initial, HubConfig::default().with_label("state"))
    }

    /// Create a machine whose transition hub uses `config`.
    pub fn with_config(table: Arc<TransitionTable<S, O>>, initial: S, config: HubConfig) -> Self {
        Self {
            table,
            current: Mutex::new(Current {
                state: initial,
                applied: 0,
            }),
            hub: NotificationHub::with_config(config),
        }
    }

    /// The current state.
    pub fn state(&self) -> S {
        self.current.lock().state
    }

    /// Number of operations applied so far (rejections not counted).
    pub fn applied_count(&self) -> usize {
        self.current.lock().applied
    }

    /// The shared transition table.
    pub fn table(&self) -> &Arc<TransitionTable<S, O>> {
        &self.table
    }

    /// Observers of applied transitions.
    pub fn hub(&self) -> &NotificationHub<Transition<S, O>> {
        &self.hub
    }

    /// Apply `op` according to the transition table.
    pub fn apply(&self, op: O) -> Outcome<S, O> {
        self.apply_with(op, |_| {})
    }

    /// Apply `op`, running the host's side effect if the table allows it.
    ///
    /// `effect` runs after the new state is stored and before observers are
    /// notified, while the machine is still locked. It must not call back
    /// into this machine.
    pub fn apply_with<F>(&self, op: O, effect: F) -> Outcome<S, O>
    where
        F: FnOnce(&Transition<S, O>),
    {
        let outcome = {
            let mut current = self.current.lock();
            let from = current.state;
            match self.table.rule(from, op) {
                Some(Rule::Allow { next, effect: note }) => {
                    current.state = *next;
                    current.applied += 1;
                    let transition = Transition {
                        from,
                        to: *next,
                        operation: op,
                        effect: note.clone(),
                    };
                    effect(&transition);
                    Outcome::Applied(transition)
                }
                Some(Rule::Reject { reason }) => Outcome::Rejected(Rejection {
                    state: from,
                    operation: op,
                    reason: reason.clone(),
                }),
                // Unreachable for built tables; still a rejection, never a no-op.
                None => Outcome::Rejected(Rejection {
                    state: from,
                    operation: op,
                    reason: "no rule defined".to_string(),
                }),
            }
        };

        match &outcome {
            Outcome::Applied(transition) => {
                tracing::debug!(
                    from = %transition.from,
                    to = %transition.to,
                    operation = %op,
                    "transition applied"
                );
                self.hub.notify(transition);
            }
            Outcome::Rejected(rejection) => {
                tracing::debug!(
                    state = %rejection.state,
                    operation = %op,
                    reason = %rejection.reason,
                    "transition rejected"
                );
            }
        }
        outcome
    }
}

impl<S: fmt::Debug + Copy, O> fmt::Debug for StateMachine<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.current.lock();
        f.debug_struct("StateMachine")
            .field("state", &current.state)
            .field("applied", &current.applied)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::FnObserver;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Doc {
        Draft,
        Moderation,
        Published,
    }

    impl StateSet for Doc {
        fn all() -> &'static [Self] {
            &[Doc::Draft, Doc::Moderation, Doc::Published]
        }
    }

    impl fmt::Display for Doc {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            fmt::Debug::fmt(self, f)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Op {
        Edit,
        Publish,
    }

    impl OperationSet for Op {
        fn all() -> &'static [Self] {
            &[Op::Edit, Op::Publish]
        }
    }

    impl fmt::Display for Op {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Op::Edit => write!(f, "edit"),
                Op::Publish => write!(f, "publish"),
            }
        }
    }

    fn table() -> Arc<TransitionTable<Doc, Op>> {
        Arc::new(
            TransitionTable::builder()
                .allow(Doc::Draft, Op::Edit, Doc::Draft, "editing draft")
                .allow(Doc::Draft, Op::Publish, Doc::Moderation, "sent for review")
                .reject(Doc::Moderation, Op::Edit, "under review")
                .allow(Doc::Moderation, Op::Publish, Doc::Published, "approved")
                .reject(Doc::Published, Op::Edit, "immutable")
                .reject(Doc::Published, Op::Publish, "already published")
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_reference_workflow() {
        let machine = StateMachine::new(table(), Doc::Draft);

        let edit = machine.apply(Op::Edit).into_result().unwrap();
        assert!(!edit.changed_state());
        assert_eq!(machine.state(), Doc::Draft);

        assert!(machine.apply(Op::Publish).is_applied());
        assert_eq!(machine.state(), Doc::Moderation);

        let rejected = machine.apply(Op::Edit);
        assert!(rejected.is_rejected());
        assert_eq!(machine.state(), Doc::Moderation);

        assert!(machine.apply(Op::Publish).is_applied());
        assert_eq!(machine.state(), Doc::Published);

        let err = machine.apply(Op::Publish).into_result().unwrap_err();
        assert_eq!(err.state, Doc::Published);
        assert_eq!(err.to_string(), "publish rejected in state Published: already published");
        assert_eq!(machine.applied_count(), 3);
    }

    #[test]
    fn test_incomplete_table_rejected() {
        let result = TransitionTable::<Doc, Op>::builder()
            .allow(Doc::Draft, Op::Edit, Doc::Draft, "edit")
            .allow(Doc::Draft, Op::Publish, Doc::Moderation, "review")
            .build();

        assert_eq!(
            result.unwrap_err(),
            CoreError::IncompleteTable {
                state: "Moderation".to_string(),
                operation: "edit".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let result = TransitionTable::<Doc, Op>::builder()
            .reject(Doc::Published, Op::Edit, "immutable")
            .reject(Doc::Published, Op::Edit, "still immutable")
            .build();

        assert!(matches!(result, Err(CoreError::DuplicateRule { .. })));
    }

    #[test]
    fn test_draft_unreachable_once_left() {
        let table = table();
        assert_eq!(table.reachable_from(Doc::Draft), Doc::all().to_vec());
        assert!(!table.reachable_from(Doc::Moderation).contains(&Doc::Draft));
        assert_eq!(table.reachable_from(Doc::Published), vec![Doc::Published]);
    }

    #[test]
    fn test_terminal_states() {
        let table = table();
        assert!(!table.is_terminal(Doc::Draft));
        assert!(!table.is_terminal(Doc::Moderation));
        assert!(table.is_terminal(Doc::Published));
    }

    #[test]
    fn test_graph_omits_self_loops() {
        let graph = table().graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_hub_sees_applied_transitions_after_mutation() {
        let machine = Arc::new(StateMachine::new(table(), Doc::Draft));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let observer = {
            let machine = Arc::clone(&machine);
            let seen = Arc::clone(&seen);
            Arc::new(FnObserver::new(move |t: &Transition<Doc, Op>| {
                // The machine is already in the new state.
                assert_eq!(machine.state(), t.to);
                seen.lock().push((t.from, t.to));
            }))
        };
        machine.hub().subscribe(&observer);

        machine.apply(Op::Edit);
        machine.apply(Op::Publish);
        machine.apply(Op::Edit); // rejected: no notification
        machine.apply(Op::Publish);

        assert_eq!(
            *seen.lock(),
            vec![
                (Doc::Draft, Doc::Draft),
                (Doc::Draft, Doc::Moderation),
                (Doc::Moderation, Doc::Published),
            ]
        );
    }

    #[test]
    fn test_host_effect_runs_only_when_applied() {
        let machine = StateMachine::new(table(), Doc::Moderation);
        let mut ran = Vec::new();

        machine.apply_with(Op::Edit, |t| ran.push(t.to));
        assert!(ran.is_empty());

        machine.apply_with(Op::Publish, |t| ran.push(t.to));
        assert_eq!(ran, vec![Doc::Published]);
    }

    #[test]
    fn test_concurrent_applies_each_notify_once() {
        let machine = StateMachine::new(table(), Doc::Draft);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer = Arc::new(FnObserver::new(move |t: &Transition<Doc, Op>| {
            sink.lock().push(t.operation);
        }));
        machine.hub().subscribe(&observer);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        assert!(machine.apply(Op::Edit).is_applied());
                    }
                });
            }
        });

        // Arrival order across threads is unspecified; the count is not.
        assert_eq!(machine.applied_count(), 100);
        assert_eq!(seen.lock().len(), 100);
        assert_eq!(machine.state(), Doc::Draft);
    }

    #[test]
    fn test_machines_share_a_table() {
        let table = table();
        let a = StateMachine::new(Arc::clone(&table), Doc::Draft);
        let b = StateMachine::new(Arc::clone(&table), Doc::Draft);

        a.apply(Op::Publish);
        assert_eq!(a.state(), Doc::Moderation);
        assert_eq!(b.state(), Doc::Draft);
    }
}
