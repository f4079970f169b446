//! Trade error types for pricing and stock operations.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during pricing and stock calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TradeError {
    // ========== Input Errors ==========
    /// Quantity must be positive.
    #[error("Quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    /// Adjustment (bonus/discount) cannot be negative.
    #[error("Adjustment cannot be negative, got {0}")]
    NegativeAdjustment(Decimal),

    /// Unit price cannot be negative.
    #[error("Unit price cannot be negative, got {0}")]
    NegativePrice(Decimal),

    /// Purity must lie in (0, 1].
    #[error("Purity must be in (0, 1], got {0}")]
    PurityOutOfRange(Decimal),

    /// A SELL discount larger than the base amount would price the trade
    /// negative.
    #[error("Adjustment {adjustment} exceeds the base amount {base}")]
    AdjustmentExceedsBase {
        /// The requested discount.
        adjustment: Decimal,
        /// grams x purity x unit price.
        base: Decimal,
    },

    // ========== Invariant Violations ==========
    /// A piece-kind product is missing its grams-per-piece factor.
    ///
    /// This is a configuration error, never valid user input: a well-formed
    /// PIECE product always carries the factor.
    #[error("Piece-kind product is missing grams-per-piece factor")]
    MissingGramsPerPiece,

    // ========== Stock Errors ==========
    /// A sale would drive stock negative.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Quantity the sale requested.
        requested: Decimal,
        /// Stock currently on hand.
        available: Decimal,
    },
}
