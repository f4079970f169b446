//! Property tests for payment reconciliation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::reconcile::{Reconciliation, SETTLEMENT_EPSILON};
use super::types::PaymentStatus;

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Status only moves forward for any sequence of applications, and the
    /// paid amount never exceeds total + epsilon.
    #[test]
    fn prop_status_monotone_forward(
        total in amount_strategy(),
        amounts in prop::collection::vec(amount_strategy(), 1..25),
    ) {
        let mut r = Reconciliation::new(total);
        let mut last = r.status();
        prop_assert_eq!(last, PaymentStatus::Pending);

        for amount in amounts {
            if let Ok(next) = r.apply(amount) {
                r = next;
            }
            let status = r.status();
            prop_assert!(status >= last, "status moved backward: {last:?} -> {status:?}");
            last = status;
            prop_assert!(r.paid <= r.total + SETTLEMENT_EPSILON);
            prop_assert!(r.remaining() >= Decimal::ZERO);
        }
    }

    /// A rejected application leaves the state untouched.
    #[test]
    fn prop_rejection_leaves_state_unchanged(
        total in amount_strategy(),
        amount in amount_strategy(),
    ) {
        let r = Reconciliation::new(total);
        let before = r;
        if r.apply(amount).is_err() {
            prop_assert_eq!(r, before);
        }
    }

    /// remaining() is always total - paid clamped at zero, and completion
    /// happens exactly at the epsilon boundary.
    #[test]
    fn prop_remaining_and_completion_boundary(
        total in amount_strategy(),
        amounts in prop::collection::vec(amount_strategy(), 0..25),
    ) {
        let mut r = Reconciliation::new(total);
        for amount in amounts {
            if let Ok(next) = r.apply(amount) {
                r = next;
            }
        }
        prop_assert_eq!(r.remaining(), (r.total - r.paid).max(Decimal::ZERO));
        prop_assert_eq!(
            r.status() == PaymentStatus::Completed,
            r.remaining() <= SETTLEMENT_EPSILON
        );
    }
}
