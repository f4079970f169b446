//! Unit conversion and purity-weighted pricing.
//!
//! All monetary and purity arithmetic uses `rust_decimal::Decimal`; the
//! calculations here are pure and side-effect free.

use rust_decimal::Decimal;

use super::error::TradeError;
use super::types::{Direction, UnitKind};

/// Converts a product quantity to its gram equivalent.
///
/// GRAM quantities pass through unchanged; PIECE quantities are multiplied
/// by the product's grams-per-piece factor.
///
/// # Errors
///
/// Returns `TradeError::MissingGramsPerPiece` if a PIECE-kind product has no
/// grams-per-piece factor - an invariant violation, not a user input error.
pub fn grams_of(
    quantity: Decimal,
    unit_kind: UnitKind,
    grams_per_piece: Option<Decimal>,
) -> Result<Decimal, TradeError> {
    match unit_kind {
        UnitKind::Gram => Ok(quantity),
        UnitKind::Piece => {
            let factor = grams_per_piece.ok_or(TradeError::MissingGramsPerPiece)?;
            Ok(quantity * factor)
        }
    }
}

/// Computes a transaction's total monetary amount.
///
/// base = grams x purity x unit price. A BUY adds the adjustment (a bonus
/// paid on top of cost); a SELL subtracts it (a discount off revenue).
///
/// # Errors
///
/// Returns an error for a negative adjustment, non-positive grams, a
/// negative unit price, a purity outside (0, 1], or a SELL discount larger
/// than the base amount. A total is never negative.
pub fn total_amount(
    grams: Decimal,
    purity: Decimal,
    unit_price: Decimal,
    direction: Direction,
    adjustment: Decimal,
) -> Result<Decimal, TradeError> {
    if grams <= Decimal::ZERO {
        return Err(TradeError::NonPositiveQuantity(grams));
    }
    if purity <= Decimal::ZERO || purity > Decimal::ONE {
        return Err(TradeError::PurityOutOfRange(purity));
    }
    if unit_price < Decimal::ZERO {
        return Err(TradeError::NegativePrice(unit_price));
    }
    if adjustment < Decimal::ZERO {
        return Err(TradeError::NegativeAdjustment(adjustment));
    }

    let base = grams * purity * unit_price;

    match direction {
        Direction::Buy => Ok(base + adjustment),
        Direction::Sell => {
            if adjustment > base {
                return Err(TradeError::AdjustmentExceedsBase { adjustment, base });
            }
            Ok(base - adjustment)
        }
    }
}

/// Profit realized by selling a quantity bought at `buy_price` for
/// `sell_price`, at the same purity.
#[must_use]
pub fn transaction_profit(
    buy_price: Decimal,
    sell_price: Decimal,
    quantity: Decimal,
    purity: Decimal,
) -> Decimal {
    let buy_total = quantity * purity * buy_price;
    let sell_total = quantity * purity * sell_price;
    sell_total - buy_total
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_grams_of_gram_kind_passes_through() {
        assert_eq!(
            grams_of(dec!(12.5), UnitKind::Gram, None).unwrap(),
            dec!(12.5)
        );
        // A stray factor on a gram product is ignored.
        assert_eq!(
            grams_of(dec!(3), UnitKind::Gram, Some(dec!(5))).unwrap(),
            dec!(3)
        );
    }

    #[test]
    fn test_grams_of_piece_kind_multiplies() {
        assert_eq!(
            grams_of(dec!(2), UnitKind::Piece, Some(dec!(5))).unwrap(),
            dec!(10)
        );
        assert_eq!(
            grams_of(dec!(0.5), UnitKind::Piece, Some(dec!(7.2))).unwrap(),
            dec!(3.6)
        );
    }

    #[test]
    fn test_grams_of_piece_without_factor_is_invariant_violation() {
        assert_eq!(
            grams_of(dec!(2), UnitKind::Piece, None),
            Err(TradeError::MissingGramsPerPiece)
        );
    }

    #[test]
    fn test_total_amount_buy_adds_adjustment() {
        // 10g x 0.916 x 2000 = 18320
        let total =
            total_amount(dec!(10), dec!(0.916), dec!(2000), Direction::Buy, dec!(0)).unwrap();
        assert_eq!(total, dec!(18320.000));

        let with_bonus =
            total_amount(dec!(10), dec!(0.916), dec!(2000), Direction::Buy, dec!(50)).unwrap();
        assert_eq!(with_bonus, dec!(18370.000));
    }

    #[test]
    fn test_total_amount_sell_subtracts_adjustment() {
        let total =
            total_amount(dec!(10), dec!(0.916), dec!(2000), Direction::Sell, dec!(100)).unwrap();
        assert_eq!(total, dec!(18220.000));
    }

    #[test]
    fn test_total_amount_rejects_sell_discount_beyond_base() {
        // base = 10 x 0.916 x 2000 = 18320; a larger discount is rejected
        // rather than pricing the sale negative.
        assert!(matches!(
            total_amount(dec!(10), dec!(0.916), dec!(2000), Direction::Sell, dec!(20000)),
            Err(TradeError::AdjustmentExceedsBase { .. })
        ));

        // A discount of exactly the base is a zero-total trade, not an error.
        let total =
            total_amount(dec!(10), dec!(0.916), dec!(2000), Direction::Sell, dec!(18320))
                .unwrap();
        assert_eq!(total, Decimal::ZERO);

        // A BUY bonus has no such cap; it only raises the total.
        let total =
            total_amount(dec!(10), dec!(0.916), dec!(2000), Direction::Buy, dec!(20000))
                .unwrap();
        assert_eq!(total, dec!(38320.000));
    }

    #[test]
    fn test_total_amount_rejects_negative_adjustment() {
        assert_eq!(
            total_amount(dec!(10), dec!(0.916), dec!(2000), Direction::Buy, dec!(-1)),
            Err(TradeError::NegativeAdjustment(dec!(-1)))
        );
    }

    #[test]
    fn test_total_amount_rejects_bad_purity() {
        assert!(matches!(
            total_amount(dec!(10), dec!(0), dec!(2000), Direction::Buy, dec!(0)),
            Err(TradeError::PurityOutOfRange(_))
        ));
        assert!(matches!(
            total_amount(dec!(10), dec!(1.001), dec!(2000), Direction::Buy, dec!(0)),
            Err(TradeError::PurityOutOfRange(_))
        ));
        // Fine gold at exactly 1.000 is valid.
        assert!(total_amount(dec!(10), dec!(1), dec!(2000), Direction::Buy, dec!(0)).is_ok());
    }

    #[test]
    fn test_total_amount_rejects_non_positive_grams() {
        assert!(matches!(
            total_amount(dec!(0), dec!(0.916), dec!(2000), Direction::Buy, dec!(0)),
            Err(TradeError::NonPositiveQuantity(_))
        ));
    }

    #[test]
    fn test_transaction_profit() {
        // Bought at 2000, sold at 2100: 10g x 0.916 x 100 = 91.60 profit
        assert_eq!(
            transaction_profit(dec!(2000), dec!(2100), dec!(10), dec!(0.916)),
            dec!(916.000)
        );
        // Selling below cost yields a negative profit.
        assert!(
            transaction_profit(dec!(2100), dec!(2000), dec!(10), dec!(0.916)) < Decimal::ZERO
        );
    }
}
