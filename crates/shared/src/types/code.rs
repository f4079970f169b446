//! Human-readable entity codes.
//!
//! Every customer-facing record carries a code like `BUY-000042`: a fixed
//! per-entity prefix plus a zero-padded counter value minted from the
//! `counters` table.

use serde::{Deserialize, Serialize};

/// Width of the zero-padded counter portion of a code.
pub const CODE_PAD_WIDTH: usize = 6;

/// The entity families that receive generated codes.
///
/// Each kind owns an independent monotonic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeKind {
    /// Product catalog entries.
    Product,
    /// Customer records.
    Customer,
    /// Purchase (buy) transactions.
    Purchase,
    /// Sale (sell) transactions.
    Sale,
    /// Consignment records.
    Consignment,
}

impl CodeKind {
    /// Name of the counter row backing this code kind.
    #[must_use]
    pub const fn counter_name(self) -> &'static str {
        match self {
            Self::Product => "PRODUCT_CODE",
            Self::Customer => "CUSTOMER_CODE",
            Self::Purchase => "TRANSACTION_BUY",
            Self::Sale => "TRANSACTION_SELL",
            Self::Consignment => "CONSIGNMENT_CODE",
        }
    }

    /// Fixed human-facing prefix for this code kind.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Product => "PRD",
            Self::Customer => "CST",
            Self::Purchase => "BUY",
            Self::Sale => "SEL",
            Self::Consignment => "CSG",
        }
    }

    /// Formats a counter value as a full code, e.g. `PRD-000007`.
    #[must_use]
    pub fn format(self, value: i64) -> String {
        format!("{}-{:0>width$}", self.prefix(), value, width = CODE_PAD_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_names_are_distinct() {
        let names = [
            CodeKind::Product.counter_name(),
            CodeKind::Customer.counter_name(),
            CodeKind::Purchase.counter_name(),
            CodeKind::Sale.counter_name(),
            CodeKind::Consignment.counter_name(),
        ];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_format_zero_pads_to_six_digits() {
        assert_eq!(CodeKind::Product.format(1), "PRD-000001");
        assert_eq!(CodeKind::Customer.format(42), "CST-000042");
        assert_eq!(CodeKind::Purchase.format(123_456), "BUY-123456");
        assert_eq!(CodeKind::Sale.format(7), "SEL-000007");
        assert_eq!(CodeKind::Consignment.format(999), "CSG-000999");
    }

    #[test]
    fn test_format_values_beyond_pad_width() {
        // Counter values larger than 6 digits are never truncated.
        assert_eq!(CodeKind::Product.format(1_234_567), "PRD-1234567");
    }
}
