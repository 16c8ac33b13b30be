//! Property-based tests for registry ordering and removal accounting.
//!
//! Driven through `sweep` with explicit instants so no runtime is needed.

use kudos_core::EffectFamily;
use kudos_expression::{AnimationRegistry, EffectId, FeedbackDescriptor};
use proptest::prelude::*;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
enum Op {
    Spawn(u64),
    Dismiss(usize),
    Sweep(u64),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1u64..2000).prop_map(Op::Spawn),
        2 => (0usize..64).prop_map(Op::Dismiss),
        1 => (0u64..1500).prop_map(Op::Sweep),
    ]
}

proptest! {
    /// **Ordering**: `list()` is always the spawn-ordered subsequence of
    /// live ids, and every spawned id is removed at most once.
    #[test]
    fn list_is_ordered_and_removal_unique(ops in proptest::collection::vec(arb_op(), 1..120)) {
        let registry = AnimationRegistry::default();
        let start = Instant::now();
        let mut clock = Duration::ZERO;
        let mut spawned: Vec<EffectId> = Vec::new();
        let mut removed = 0u64;

        for op in ops {
            match op {
                Op::Spawn(ms) => {
                    let id = registry.spawn(FeedbackDescriptor::new(EffectFamily::Hearts).with_duration_ms(ms));
                    if let Some(last) = spawned.last() {
                        prop_assert!(*last < id);
                    }
                    spawned.push(id);
                }
                Op::Dismiss(i) => {
                    if let Some(id) = spawned.get(i % spawned.len().max(1)) {
                        if registry.dismiss(*id) {
                            removed += 1;
                        }
                    }
                }
                Op::Sweep(ms) => {
                    clock += Duration::from_millis(ms);
                    removed += registry.sweep(start + clock).expired.len() as u64;
                }
            }

            let listed: Vec<EffectId> = registry.list().into_iter().map(|e| e.id).collect();
            prop_assert!(listed.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(listed.len() as u64 + removed, spawned.len() as u64);
        }

        let stats = registry.stats();
        prop_assert_eq!(stats.expired + stats.dismissed, removed);
    }
}
