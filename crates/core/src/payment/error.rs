//! Payment error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during payment reconciliation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// Payment amount must be positive.
    #[error("Payment amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Applying the amount would exceed the total beyond the settlement
    /// epsilon.
    #[error("Overpayment: {paid} already paid + {amount} exceeds total {total}")]
    Overpayment {
        /// Cumulative amount already applied.
        paid: Decimal,
        /// Amount the caller attempted to apply.
        amount: Decimal,
        /// Total amount owed.
        total: Decimal,
    },
}
