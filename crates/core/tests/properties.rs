//! Property tests for the composition mechanisms.

use std::fmt;
use std::sync::{Arc, Mutex};

use behavior_core::{
    Addition, BehaviorUnit, ChainBuilder, DecoratorChain, Dispatch, FnObserver, FnStrategy,
    Handler, Leaf, Money, NotificationHub, OperationSet, Outcome, Rule, SharedStrategy, Split,
    StateMachine, StateSet, StrategySlot, TransitionTable,
};
use proptest::prelude::*;

struct Denomination(u64);

impl Handler<u64> for Denomination {
    type Portion = u64;

    fn label(&self) -> String {
        self.0.to_string()
    }

    fn take(&self, amount: u64) -> Split<u64, u64> {
        match amount / self.0 {
            0 => Split::pass(amount),
            count => Split::took(count, amount % self.0),
        }
    }
}

fn dispense(amount: u64) -> Dispatch<u64, u64> {
    ChainBuilder::new()
        .then(Denomination(2000))
        .then(Denomination(500))
        .then(Denomination(100))
        .build()
        .unwrap()
        .dispatch(amount)
}

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
        fmt::Debug::fmt(self, f)
    }
}

fn workflow() -> Arc<TransitionTable<Doc, Op>> {
    Arc::new(
        TransitionTable::builder()
            .allow(Doc::Draft, Op::Edit, Doc::Draft, "draft updated")
            .allow(Doc::Draft, Op::Publish, Doc::Moderation, "submitted")
            .reject(Doc::Moderation, Op::Edit, "under review")
            .allow(Doc::Moderation, Op::Publish, Doc::Published, "approved")
            .reject(Doc::Published, Op::Edit, "immutable")
            .reject(Doc::Published, Op::Publish, "already published")
            .build()
            .unwrap(),
    )
}

proptest! {
    #[test]
    fn workflow_never_returns_to_draft(
        ops in prop::collection::vec(prop_oneof![Just(Op::Edit), Just(Op::Publish)], 0..40),
    ) {
        let table = workflow();
        let machine = StateMachine::new(Arc::clone(&table), Doc::Draft);
        let mut left_draft = false;

        for op in ops {
            let before = machine.state();
            let rule = table.rule(before, op).cloned();

            match machine.apply(op) {
                Outcome::Applied(transition) => {
                    prop_assert_eq!(transition.from, before);
                    prop_assert_eq!(machine.state(), transition.to);
                    match rule {
                        Some(Rule::Allow { next, .. }) => {
                            prop_assert_eq!(next, transition.to);
                        }
                        other => {
                            prop_assert!(false, "applied {} without an allow rule: {:?}", op, other);
                        }
                    }
                }
                Outcome::Rejected(rejection) => {
                    prop_assert_eq!(rejection.state, before);
                    prop_assert_eq!(machine.state(), before);
                    prop_assert!(
                        matches!(rule, Some(Rule::Reject { .. })),
                        "rejected {} under {:?}",
                        op,
                        rule
                    );
                }
            }

            left_draft |= machine.state() != Doc::Draft;
            if left_draft {
                prop_assert_ne!(machine.state(), Doc::Draft);
            }
        }
    }

    #[test]
    fn decorator_cost_is_base_plus_deltas(
        base in 0u64..10_000,
        deltas in prop::collection::vec((0usize..4, 0u64..500), 0..12),
    ) {
        let kinds = ["Milk", "Soy", "Mocha", "Whip"];
        let chain = deltas.iter().fold(
            DecoratorChain::new().base(Leaf::new("Base", Money::cents(base))),
            |chain, &(kind, delta)| chain.wrap(Addition::new(kinds[kind], Money::cents(delta))),
        );
        let unit = chain.build().unwrap();

        let expected = base + deltas.iter().map(|&(_, d)| d).sum::<u64>();
        prop_assert_eq!(unit.compute(), Money::cents(expected));

        let fragments = unit.describe().matches(", ").count();
        prop_assert_eq!(fragments, deltas.len());
    }

    #[test]
    fn chain_accounts_for_every_unit(amount in 0u64..1_000_000) {
        let result = dispense(amount);
        let dispensed: u64 = result
            .portions
            .iter()
            .map(|p| p.value * p.label.parse::<u64>().unwrap())
            .sum();
        let leftover = result.remainder().copied().unwrap_or(0);

        prop_assert_eq!(dispensed + leftover, amount);
        prop_assert_eq!(leftover, amount % 100);
        prop_assert_eq!(result.is_satisfied(), amount % 100 == 0);
    }

    #[test]
    fn hub_delivers_in_registration_order(count in 1usize..20, payload in any::<i64>()) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let observers: Vec<_> = (0..count)
            .map(|i| {
                let log = Arc::clone(&log);
                Arc::new(FnObserver::new(move |p: &i64| log.lock().unwrap().push((i, *p))))
            })
            .collect();

        let hub: NotificationHub<i64> = NotificationHub::new();
        for observer in &observers {
            hub.subscribe(observer);
        }
        prop_assert_eq!(hub.notify(&payload).delivered, count);

        let expected: Vec<_> = (0..count).map(|i| (i, payload)).collect();
        prop_assert_eq!(log.lock().unwrap().clone(), expected);
    }

    #[test]
    fn repeated_set_strategy_is_idempotent(factor in 0u64..1000, times in 1usize..5, input in 0u64..1000) {
        let strategy: SharedStrategy<u64, u64> =
            Arc::new(FnStrategy::new("scale", move |x: &u64| x * factor));

        let slot: StrategySlot<u64, u64> = StrategySlot::new();
        for _ in 0..times {
            slot.set_strategy(Arc::clone(&strategy));
        }
        prop_assert_eq!(slot.invoke(&input).unwrap(), input * factor);
    }
}

#[test]
fn chain_reference_amounts() {
    let full = dispense(8700);
    let counts: Vec<u64> = full.portions.iter().map(|p| p.value).collect();
    assert_eq!(counts, vec![4, 1, 2]);
    assert!(full.is_satisfied());

    assert_eq!(dispense(8753).remainder(), Some(&53));
}
