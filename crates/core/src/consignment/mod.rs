//! Consignments: trust-custody events and customer balance deltas.

pub mod balance;
pub mod error;
pub mod types;

#[cfg(test)]
mod balance_props;

pub use balance::{balance_delta, edit_delta, reversal_delta, signed_delta};
pub use error::ConsignmentError;
pub use types::{ConsignmentDirection, ConsignmentStatus, CurrencyCode, ItemKind, ProductCustody};
