//! Stock ledger: fold-over-history stock derivation.
//!
//! A product's on-hand quantity is the fold of all its transactions in
//! creation order: BUY adds quantity, SELL subtracts. Each persisted
//! transaction row also stores the running total as a `remaining_stock`
//! snapshot; the functions here are the single definition both the fold and
//! the snapshot bookkeeping must agree with.

use rust_decimal::Decimal;

use super::error::TradeError;
use super::types::{Direction, StockEvent};

/// Signed stock effect of one transaction: +quantity for BUY, -quantity for SELL.
#[must_use]
pub fn signed_effect(direction: Direction, quantity: Decimal) -> Decimal {
    match direction {
        Direction::Buy => quantity,
        Direction::Sell => -quantity,
    }
}

/// Current stock for a product: fold of its events in creation order.
#[must_use]
pub fn current_stock<I>(events: I) -> Decimal
where
    I: IntoIterator<Item = StockEvent>,
{
    events
        .into_iter()
        .fold(Decimal::ZERO, |stock, e| {
            stock + signed_effect(e.direction, e.quantity)
        })
}

/// Rejects a SELL that would drive stock negative.
///
/// BUYs always pass. The caller must hold the current stock and the insert
/// inside one database transaction so the check cannot race a sibling write.
///
/// # Errors
///
/// Returns `TradeError::InsufficientStock` when `available < quantity` on a
/// SELL; state must be left untouched by the caller in that case.
pub fn ensure_sufficient_stock(
    direction: Direction,
    available: Decimal,
    quantity: Decimal,
) -> Result<(), TradeError> {
    if direction == Direction::Sell && available < quantity {
        return Err(TradeError::InsufficientStock {
            requested: quantity,
            available,
        });
    }
    Ok(())
}

/// Snapshot delta for a quantity edit: new signed effect minus old.
///
/// Applied to the edited row's stored `remaining_stock` snapshot; later
/// siblings' snapshots are not rewritten (see the repository's
/// `recompute_snapshots` for the full-history repair).
#[must_use]
pub fn stock_delta(direction: Direction, old_quantity: Decimal, new_quantity: Decimal) -> Decimal {
    signed_effect(direction, new_quantity) - signed_effect(direction, old_quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn buy(q: Decimal) -> StockEvent {
        StockEvent {
            direction: Direction::Buy,
            quantity: q,
        }
    }

    fn sell(q: Decimal) -> StockEvent {
        StockEvent {
            direction: Direction::Sell,
            quantity: q,
        }
    }

    #[test]
    fn test_signed_effect() {
        assert_eq!(signed_effect(Direction::Buy, dec!(5)), dec!(5));
        assert_eq!(signed_effect(Direction::Sell, dec!(5)), dec!(-5));
    }

    #[test]
    fn test_current_stock_fold() {
        let events = [buy(dec!(10)), sell(dec!(3)), buy(dec!(2.5)), sell(dec!(1))];
        assert_eq!(current_stock(events), dec!(8.5));
    }

    #[test]
    fn test_current_stock_empty_history() {
        assert_eq!(current_stock([]), Decimal::ZERO);
    }

    #[test]
    fn test_ensure_sufficient_stock_rejects_oversell() {
        let err = ensure_sufficient_stock(Direction::Sell, dec!(5), dec!(8)).unwrap_err();
        assert_eq!(
            err,
            TradeError::InsufficientStock {
                requested: dec!(8),
                available: dec!(5),
            }
        );
    }

    #[test]
    fn test_ensure_sufficient_stock_allows_exact_sale() {
        assert!(ensure_sufficient_stock(Direction::Sell, dec!(5), dec!(5)).is_ok());
    }

    #[test]
    fn test_ensure_sufficient_stock_ignores_buys() {
        // A purchase never fails the stock check, even from zero.
        assert!(ensure_sufficient_stock(Direction::Buy, Decimal::ZERO, dec!(100)).is_ok());
    }

    #[test]
    fn test_stock_delta_for_edits() {
        // Growing a BUY from 10 to 12 adds 2.
        assert_eq!(stock_delta(Direction::Buy, dec!(10), dec!(12)), dec!(2));
        // Growing a SELL from 3 to 5 removes 2 more.
        assert_eq!(stock_delta(Direction::Sell, dec!(3), dec!(5)), dec!(-2));
        // An unchanged quantity is a no-op.
        assert_eq!(stock_delta(Direction::Sell, dec!(3), dec!(3)), Decimal::ZERO);
    }
}
