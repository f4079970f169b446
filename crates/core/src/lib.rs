//! Core business logic for Sarraf.
//!
//! Pure calculation and rule modules with no web or database dependencies:
//! - `trade` - unit conversion, purity-weighted pricing, and the stock fold
//! - `consignment` - trust-custody balance deltas
//! - `payment` - incremental payment reconciliation
//! - `validation` - pre-condition checks run before any mutation

pub mod consignment;
pub mod payment;
pub mod trade;
pub mod validation;
