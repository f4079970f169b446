//! Trade domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a product transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Shop buys from the market or a customer; adds to stock.
    Buy,
    /// Shop sells; subtracts from stock.
    Sell,
}

impl Direction {
    /// Returns true for purchases.
    #[must_use]
    pub fn is_buy(self) -> bool {
        matches!(self, Self::Buy)
    }
}

/// How a product's quantity is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitKind {
    /// Quantity is already in grams.
    Gram,
    /// Quantity counts discrete pieces; `grams_per_piece` converts to grams.
    Piece,
}

/// One stock-affecting event for a product, in creation order.
///
/// The stock ledger is a fold over these: BUY adds quantity, SELL subtracts.
#[derive(Debug, Clone, Copy)]
pub struct StockEvent {
    /// Transaction direction.
    pub direction: Direction,
    /// Unit-kind-specific quantity (pieces or grams).
    pub quantity: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Direction::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&Direction::Sell).unwrap(), "\"SELL\"");
        let d: Direction = serde_json::from_str("\"SELL\"").unwrap();
        assert_eq!(d, Direction::Sell);
    }

    #[test]
    fn test_unit_kind_serde_uppercase() {
        assert_eq!(serde_json::to_string(&UnitKind::Gram).unwrap(), "\"GRAM\"");
        assert_eq!(serde_json::to_string(&UnitKind::Piece).unwrap(), "\"PIECE\"");
    }
}
