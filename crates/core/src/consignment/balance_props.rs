//! Property tests for consignment balance deltas.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::{edit_delta, reversal_delta, signed_delta};
use super::types::ConsignmentDirection;

fn delta_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn direction_strategy() -> impl Strategy<Value = ConsignmentDirection> {
    prop_oneof![
        Just(ConsignmentDirection::Give),
        Just(ConsignmentDirection::Receive),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Applying a delta then its reversal restores the starting balance,
    /// for any sequence of GIVE/RECEIVE operations.
    #[test]
    fn prop_apply_then_reverse_round_trips(
        start in (-1_000_000i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)),
        ops in prop::collection::vec((direction_strategy(), delta_strategy()), 1..30),
    ) {
        let mut balance = start;
        for &(direction, delta) in &ops {
            balance += signed_delta(direction, delta);
        }
        // Reverse in any order; addition commutes.
        for &(direction, delta) in ops.iter().rev() {
            balance += reversal_delta(direction, delta);
        }
        prop_assert_eq!(balance, start);
    }

    /// An edit to identical values never moves the balance; an edit is
    /// equivalent to a delete followed by a create with the new values.
    #[test]
    fn prop_edit_matches_delete_then_create(
        direction in direction_strategy(),
        old_delta in delta_strategy(),
        new_delta in delta_strategy(),
    ) {
        prop_assert_eq!(edit_delta(direction, old_delta, old_delta), Decimal::ZERO);
        prop_assert_eq!(
            edit_delta(direction, old_delta, new_delta),
            reversal_delta(direction, old_delta) + signed_delta(direction, new_delta)
        );
    }
}
