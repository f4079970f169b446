//! Consignment domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a consignment event, from the shop's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsignmentDirection {
    /// Shop gives an item to the customer; the customer owes it back.
    Give,
    /// Shop receives an item from the customer in trust.
    Receive,
}

/// Lifecycle of a consignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsignmentStatus {
    /// Held in trust; counts against deletion guards.
    Active,
    /// Explicitly returned.
    Returned,
}

/// Foreign currencies a consignment (or a customer balance) can be
/// denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    /// Turkish lira.
    Try,
    /// US dollar.
    Usd,
    /// Euro.
    Eur,
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Try => write!(f, "TRY"),
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
        }
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRY" => Ok(Self::Try),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

/// What is held in trust: a catalog product or a currency amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", tag = "kind", content = "currency")]
pub enum ItemKind {
    /// A product; the consignment carries quantity + purity.
    Product,
    /// A currency amount; the consignment carries amount + exchange rates.
    Currency(CurrencyCode),
}

/// The value-bearing fields of a product-kind consignment.
#[derive(Debug, Clone, Copy)]
pub struct ProductCustody {
    /// Unit-kind-specific quantity.
    pub quantity: Decimal,
    /// Purity fraction applied to this custody event.
    pub purity: Decimal,
    /// How the product's quantity is measured.
    pub unit_kind: crate::trade::UnitKind,
    /// Grams-per-piece factor when the product is piece-kind.
    pub grams_per_piece: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_currency_code_round_trip() {
        for code in [CurrencyCode::Try, CurrencyCode::Usd, CurrencyCode::Eur] {
            assert_eq!(CurrencyCode::from_str(&code.to_string()).unwrap(), code);
        }
        assert!(CurrencyCode::from_str("GBP").is_err());
    }

    #[test]
    fn test_direction_serde() {
        assert_eq!(
            serde_json::to_string(&ConsignmentDirection::Give).unwrap(),
            "\"GIVE\""
        );
        assert_eq!(
            serde_json::to_string(&ConsignmentDirection::Receive).unwrap(),
            "\"RECEIVE\""
        );
    }
}
