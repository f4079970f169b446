//! Consignment error types.

use thiserror::Error;

use crate::trade::TradeError;

/// Errors that can occur while computing consignment balance deltas.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsignmentError {
    /// A product-kind consignment is missing quantity or purity.
    #[error("Product consignment requires quantity and purity")]
    MissingCustodyFields,

    /// A currency-kind consignment is missing its amount.
    #[error("Currency consignment requires an amount")]
    MissingAmount,

    /// Unit conversion failed.
    #[error(transparent)]
    Trade(#[from] TradeError),
}
