//! Payment reconciliation: cumulative settlement of a transaction's total.

pub mod error;
pub mod reconcile;
pub mod types;

#[cfg(test)]
mod reconcile_props;

pub use error::PaymentError;
pub use reconcile::{Reconciliation, SETTLEMENT_EPSILON};
pub use types::{PaymentKind, PaymentMethod, PaymentStatus};
