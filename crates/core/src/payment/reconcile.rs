//! Incremental payment reconciliation.
//!
//! A `Reconciliation` mirrors the persisted Payment aggregate: total owed and
//! cumulative paid. Applying an amount and re-deriving the total after a
//! transaction edit are the only mutations; both derive the status from the
//! same rule so the aggregate can never disagree with its history of
//! immutable detail rows.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::PaymentError;
use super::types::PaymentStatus;

/// Rounding tolerance at status-transition boundaries.
///
/// A payment is COMPLETED when remaining <= epsilon, and an application may
/// overshoot the total by at most this much.
pub const SETTLEMENT_EPSILON: Decimal = dec!(0.01);

/// Reconciliation state of one payment aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// Total amount owed.
    pub total: Decimal,
    /// Cumulative amount applied so far.
    pub paid: Decimal,
}

impl Reconciliation {
    /// Creates the state for a freshly issued payment: nothing paid.
    #[must_use]
    pub const fn new(total: Decimal) -> Self {
        Self {
            total,
            paid: Decimal::ZERO,
        }
    }

    /// Remaining amount, clamped at zero.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        (self.total - self.paid).max(Decimal::ZERO)
    }

    /// Derives the status from the current state.
    ///
    /// COMPLETED requires a recorded payment and a remainder within the
    /// settlement epsilon. With nothing paid the status is PENDING, even for
    /// a zero total; once any positive payment has been recorded it never
    /// reverts to PENDING.
    #[must_use]
    pub fn status(&self) -> PaymentStatus {
        if self.paid <= Decimal::ZERO {
            PaymentStatus::Pending
        } else if self.remaining() <= SETTLEMENT_EPSILON {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Partial
        }
    }

    /// Applies one payment of `amount`.
    ///
    /// # Errors
    ///
    /// Rejects non-positive amounts and amounts that would push the
    /// cumulative paid beyond total + epsilon; the state is unchanged on
    /// error.
    pub fn apply(&self, amount: Decimal) -> Result<Self, PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveAmount(amount));
        }
        if self.paid + amount > self.total + SETTLEMENT_EPSILON {
            return Err(PaymentError::Overpayment {
                paid: self.paid,
                amount,
                total: self.total,
            });
        }
        Ok(Self {
            total: self.total,
            paid: self.paid + amount,
        })
    }

    /// Re-derives the aggregate after the linked transaction's total changed.
    ///
    /// Raising the total of a completed payment reopens it as PARTIAL - an
    /// explicit rule, since a real unpaid remainder now exists. Lowering the
    /// total below the paid amount clamps remaining to zero and leaves the
    /// payment COMPLETED; no refund flow is modeled.
    #[must_use]
    pub fn retotal(&self, new_total: Decimal) -> Self {
        Self {
            total: new_total,
            paid: self.paid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_payment_is_pending_with_full_remainder() {
        let r = Reconciliation::new(dec!(18320));
        assert_eq!(r.remaining(), dec!(18320));
        assert_eq!(r.status(), PaymentStatus::Pending);
    }

    #[test]
    fn test_zero_total_payment_opens_pending() {
        // A zero-priced trade owes nothing, but its payment still opens
        // PENDING like every other fresh payment.
        let r = Reconciliation::new(Decimal::ZERO);
        assert_eq!(r.remaining(), Decimal::ZERO);
        assert_eq!(r.status(), PaymentStatus::Pending);
    }

    #[test]
    fn test_partial_then_complete_scenario() {
        // total 18320: pay 10000 -> PARTIAL with 8320 left, pay 8320 -> COMPLETED.
        let r = Reconciliation::new(dec!(18320));

        let r = r.apply(dec!(10000)).unwrap();
        assert_eq!(r.paid, dec!(10000));
        assert_eq!(r.remaining(), dec!(8320));
        assert_eq!(r.status(), PaymentStatus::Partial);

        let r = r.apply(dec!(8320)).unwrap();
        assert_eq!(r.remaining(), Decimal::ZERO);
        assert_eq!(r.status(), PaymentStatus::Completed);

        // Any further positive amount is an overpayment.
        assert!(matches!(
            r.apply(dec!(0.02)),
            Err(PaymentError::Overpayment { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        let r = Reconciliation::new(dec!(100));
        assert_eq!(
            r.apply(Decimal::ZERO),
            Err(PaymentError::NonPositiveAmount(Decimal::ZERO))
        );
        assert!(matches!(
            r.apply(dec!(-5)),
            Err(PaymentError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_overpayment_within_epsilon_is_tolerated() {
        let r = Reconciliation::new(dec!(100));
        // 100.01 overshoots by exactly the epsilon: accepted and completed.
        let r = r.apply(dec!(100.01)).unwrap();
        assert_eq!(r.status(), PaymentStatus::Completed);
        assert_eq!(r.remaining(), Decimal::ZERO);
    }

    #[test]
    fn test_overpayment_beyond_epsilon_rejected() {
        let r = Reconciliation::new(dec!(100));
        assert!(matches!(
            r.apply(dec!(100.02)),
            Err(PaymentError::Overpayment { .. })
        ));
    }

    #[test]
    fn test_completion_within_epsilon() {
        let r = Reconciliation::new(dec!(100)).apply(dec!(99.995)).unwrap();
        // Remaining 0.005 <= 0.01: settled.
        assert_eq!(r.status(), PaymentStatus::Completed);
    }

    #[test]
    fn test_retotal_reopens_completed_payment_when_total_rises() {
        let r = Reconciliation::new(dec!(100)).apply(dec!(100)).unwrap();
        assert_eq!(r.status(), PaymentStatus::Completed);

        let r = r.retotal(dec!(150));
        assert_eq!(r.status(), PaymentStatus::Partial);
        assert_eq!(r.remaining(), dec!(50));
    }

    #[test]
    fn test_retotal_below_paid_clamps_and_stays_completed() {
        let r = Reconciliation::new(dec!(100)).apply(dec!(100)).unwrap();

        let r = r.retotal(dec!(80));
        assert_eq!(r.remaining(), Decimal::ZERO);
        assert_eq!(r.status(), PaymentStatus::Completed);
    }

    #[test]
    fn test_retotal_with_nothing_paid_stays_pending() {
        let r = Reconciliation::new(dec!(100)).retotal(dec!(120));
        assert_eq!(r.status(), PaymentStatus::Pending);
        assert_eq!(r.remaining(), dec!(120));
    }
}
