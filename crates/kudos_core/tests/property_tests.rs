//! Property-based tests for kudos_core.
//!
//! Uses proptest to verify invariants that must hold for ALL possible inputs,
//! not just hand-picked examples.

use kudos_core::{scale, scale_duration, Intensity, Level, Mood, PartialState, PsychologicalState};
use proptest::prelude::*;
use std::time::Duration;

// ============================================================================
// Strategies
// ============================================================================

fn arb_intensity() -> impl Strategy<Value = Intensity> {
    prop_oneof![
        Just(Intensity::Low),
        Just(Intensity::Medium),
        Just(Intensity::High)
    ]
}

fn arb_level() -> impl Strategy<Value = Level> {
    prop_oneof![Just(Level::Low), Just(Level::Medium), Just(Level::High)]
}

fn arb_mood() -> impl Strategy<Value = Mood> {
    proptest::sample::select(Mood::ALL.to_vec())
}

fn arb_state() -> impl Strategy<Value = PsychologicalState> {
    (arb_mood(), arb_level(), arb_level(), arb_level()).prop_map(|(mood, s, f, m)| {
        PsychologicalState {
            mood,
            stress_level: s,
            focus_level: f,
            motivation_level: m,
        }
    })
}

fn arb_partial() -> impl Strategy<Value = PartialState> {
    (
        proptest::option::of(arb_mood()),
        proptest::option::of(arb_level()),
        proptest::option::of(arb_level()),
        proptest::option::of(arb_level()),
    )
        .prop_map(|(mood, s, f, m)| PartialState {
            mood,
            stress_level: s,
            focus_level: f,
            motivation_level: m,
        })
}

// ============================================================================
// Intensity Policy Properties
// ============================================================================

proptest! {
    /// **Ordering**: low ≤ medium ≤ high for every base count.
    #[test]
    fn scale_is_ordered_by_intensity(base in 0u32..1_000_000) {
        let low = scale(base, Intensity::Low);
        let mid = scale(base, Intensity::Medium);
        let high = scale(base, Intensity::High);
        prop_assert!(low <= mid && mid <= high, "{} {} {}", low, mid, high);
        prop_assert_eq!(mid, base);
    }

    /// **Floor semantics** match the documented multipliers exactly.
    #[test]
    fn scale_matches_floored_multiplier(base in 0u32..10_000_000) {
        prop_assert_eq!(scale(base, Intensity::Low) as u64, (base as u64 * 5) / 10);
        prop_assert_eq!(scale(base, Intensity::High) as u64, (base as u64 * 15) / 10);
    }

    /// **Monotonic in base** for a fixed intensity.
    #[test]
    fn scale_monotonic_in_base(a in 0u32..100_000, b in 0u32..100_000, i in arb_intensity()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(scale(lo, i) <= scale(hi, i));
    }

    /// Scaled durations are never zero.
    #[test]
    fn scaled_duration_positive(ms in 0u64..1_000_000, i in arb_intensity()) {
        prop_assert!(scale_duration(Duration::from_millis(ms), i) >= Duration::from_millis(1));
    }
}

// ============================================================================
// State Merge Properties
// ============================================================================

proptest! {
    /// **Shallow merge**: fields absent from the partial are untouched,
    /// present fields are overwritten.
    #[test]
    fn merge_is_shallow(state in arb_state(), partial in arb_partial()) {
        let next = state.merged(&partial);
        prop_assert_eq!(next.mood, partial.mood.unwrap_or(state.mood));
        prop_assert_eq!(next.stress_level, partial.stress_level.unwrap_or(state.stress_level));
        prop_assert_eq!(next.focus_level, partial.focus_level.unwrap_or(state.focus_level));
        prop_assert_eq!(next.motivation_level, partial.motivation_level.unwrap_or(state.motivation_level));
    }

    /// **Idempotent**: merging the same partial twice equals merging once.
    #[test]
    fn merge_is_idempotent(state in arb_state(), partial in arb_partial()) {
        let once = state.merged(&partial);
        let twice = once.merged(&partial);
        prop_assert_eq!(once, twice);
    }

    /// An empty partial never changes anything.
    #[test]
    fn empty_merge_is_noop(state in arb_state()) {
        let mut s = state;
        prop_assert!(!s.apply(&PartialState::new()));
        prop_assert_eq!(s, state);
    }
}
