//! Product trading: unit conversion, pricing, and the stock ledger.

pub mod error;
pub mod pricing;
pub mod stock;
pub mod types;

#[cfg(test)]
mod pricing_props;

pub use error::TradeError;
pub use pricing::{grams_of, total_amount, transaction_profit};
pub use stock::{current_stock, ensure_sufficient_stock, signed_effect, stock_delta};
pub use types::{Direction, StockEvent, UnitKind};
