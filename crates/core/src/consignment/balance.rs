//! Customer balance deltas for consignment events.
//!
//! Sign convention, preserved exactly on every path: GIVE applies `+delta`
//! (the customer owes the shop more trust-gold), RECEIVE applies `-delta`.
//! Create applies the signed delta, edit applies the signed difference of
//! new and old deltas, delete applies the signed reversal.

use rust_decimal::Decimal;

use super::error::ConsignmentError;
use super::types::{ConsignmentDirection, CurrencyCode, ItemKind, ProductCustody};
use crate::trade::grams_of;

/// Unsigned balance delta for a consignment.
///
/// Product kind: gram-equivalent = grams x purity. Currency kind: the amount,
/// but only when the consignment currency matches the customer's balance
/// currency - a gram-denominated balance is never mutated by a currency
/// event, and vice versa.
///
/// # Errors
///
/// Returns an error when the value-bearing fields for the item kind are
/// absent, or when a piece-kind product is missing its grams-per-piece factor.
pub fn balance_delta(
    item_kind: ItemKind,
    custody: Option<ProductCustody>,
    amount: Option<Decimal>,
    balance_currency: Option<CurrencyCode>,
) -> Result<Decimal, ConsignmentError> {
    match item_kind {
        ItemKind::Product => {
            let custody = custody.ok_or(ConsignmentError::MissingCustodyFields)?;
            let grams = grams_of(custody.quantity, custody.unit_kind, custody.grams_per_piece)?;
            Ok(grams * custody.purity)
        }
        ItemKind::Currency(code) => {
            let amount = amount.ok_or(ConsignmentError::MissingAmount)?;
            if balance_currency == Some(code) {
                Ok(amount)
            } else {
                Ok(Decimal::ZERO)
            }
        }
    }
}

/// Applies the directional sign: GIVE -> `+delta`, RECEIVE -> `-delta`.
#[must_use]
pub fn signed_delta(direction: ConsignmentDirection, delta: Decimal) -> Decimal {
    match direction {
        ConsignmentDirection::Give => delta,
        ConsignmentDirection::Receive => -delta,
    }
}

/// Signed balance adjustment for an edit: the difference of the new and old
/// unsigned deltas, under the (possibly unchanged) consignment direction.
#[must_use]
pub fn edit_delta(
    direction: ConsignmentDirection,
    old_delta: Decimal,
    new_delta: Decimal,
) -> Decimal {
    signed_delta(direction, new_delta - old_delta)
}

/// Signed balance adjustment that exactly reverses the original application.
#[must_use]
pub fn reversal_delta(direction: ConsignmentDirection, delta: Decimal) -> Decimal {
    -signed_delta(direction, delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trade::UnitKind;
    use rust_decimal_macros::dec;

    fn piece_custody(quantity: Decimal, purity: Decimal, factor: Decimal) -> ProductCustody {
        ProductCustody {
            quantity,
            purity,
            unit_kind: UnitKind::Piece,
            grams_per_piece: Some(factor),
        }
    }

    #[test]
    fn test_product_delta_piece_kind() {
        // 2 pieces x 5 g/piece x 0.995 = 9.95
        let delta = balance_delta(
            ItemKind::Product,
            Some(piece_custody(dec!(2), dec!(0.995), dec!(5))),
            None,
            None,
        )
        .unwrap();
        assert_eq!(delta, dec!(9.95));
    }

    #[test]
    fn test_product_delta_gram_kind() {
        let custody = ProductCustody {
            quantity: dec!(12),
            purity: dec!(0.916),
            unit_kind: UnitKind::Gram,
            grams_per_piece: None,
        };
        let delta = balance_delta(ItemKind::Product, Some(custody), None, None).unwrap();
        assert_eq!(delta, dec!(10.992));
    }

    #[test]
    fn test_product_delta_requires_custody() {
        assert_eq!(
            balance_delta(ItemKind::Product, None, None, None),
            Err(ConsignmentError::MissingCustodyFields)
        );
    }

    #[test]
    fn test_currency_delta_matching_balance_currency() {
        let delta = balance_delta(
            ItemKind::Currency(CurrencyCode::Usd),
            None,
            Some(dec!(500)),
            Some(CurrencyCode::Usd),
        )
        .unwrap();
        assert_eq!(delta, dec!(500));
    }

    #[test]
    fn test_currency_delta_mismatched_balance_currency_is_zero() {
        // A USD consignment never touches a gram- or EUR-denominated balance.
        for balance_currency in [None, Some(CurrencyCode::Eur)] {
            let delta = balance_delta(
                ItemKind::Currency(CurrencyCode::Usd),
                None,
                Some(dec!(500)),
                balance_currency,
            )
            .unwrap();
            assert_eq!(delta, Decimal::ZERO);
        }
    }

    #[test]
    fn test_signed_delta_convention() {
        assert_eq!(signed_delta(ConsignmentDirection::Give, dec!(9.95)), dec!(9.95));
        assert_eq!(
            signed_delta(ConsignmentDirection::Receive, dec!(9.95)),
            dec!(-9.95)
        );
    }

    #[test]
    fn test_create_then_delete_round_trips() {
        let delta = dec!(9.95);
        for direction in [ConsignmentDirection::Give, ConsignmentDirection::Receive] {
            let applied = signed_delta(direction, delta);
            let reversed = reversal_delta(direction, delta);
            assert_eq!(applied + reversed, Decimal::ZERO);
        }
    }

    #[test]
    fn test_edit_delta_is_difference() {
        // GIVE edited from 9.95 to 14.95 adds 5 more.
        assert_eq!(
            edit_delta(ConsignmentDirection::Give, dec!(9.95), dec!(14.95)),
            dec!(5.00)
        );
        // RECEIVE edited the same way subtracts 5 more.
        assert_eq!(
            edit_delta(ConsignmentDirection::Receive, dec!(9.95), dec!(14.95)),
            dec!(-5.00)
        );
        // Editing to identical values is a no-op.
        assert_eq!(
            edit_delta(ConsignmentDirection::Give, dec!(9.95), dec!(9.95)),
            Decimal::ZERO
        );
    }
}
