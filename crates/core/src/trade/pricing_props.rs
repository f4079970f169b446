//! Property tests for pricing and the stock fold.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::TradeError;
use super::pricing::{grams_of, total_amount};
use super::stock::{current_stock, ensure_sufficient_stock, signed_effect};
use super::types::{Direction, StockEvent, UnitKind};

/// Strategy for positive quantities up to 10,000.00.
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for purity fractions in (0, 1].
fn purity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=1000i64).prop_map(|n| Decimal::new(n, 3))
}

/// Strategy for non-negative unit prices.
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Buy), Just(Direction::Sell)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Gram-kind conversion is the identity; piece-kind multiplies by the factor.
    #[test]
    fn prop_grams_of_identities(
        quantity in quantity_strategy(),
        factor in quantity_strategy(),
    ) {
        prop_assert_eq!(grams_of(quantity, UnitKind::Gram, None).unwrap(), quantity);
        prop_assert_eq!(
            grams_of(quantity, UnitKind::Piece, Some(factor)).unwrap(),
            quantity * factor
        );
    }

    /// Total amount grows with the unit price.
    #[test]
    fn prop_total_monotone_in_price(
        grams in quantity_strategy(),
        purity in purity_strategy(),
        price in price_strategy(),
        bump in (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)),
        direction in direction_strategy(),
    ) {
        let lo = total_amount(grams, purity, price, direction, Decimal::ZERO).unwrap();
        let hi = total_amount(grams, purity, price + bump, direction, Decimal::ZERO).unwrap();
        prop_assert!(hi > lo);
    }

    /// Total amount grows with the gram quantity.
    #[test]
    fn prop_total_monotone_in_grams(
        grams in quantity_strategy(),
        purity in purity_strategy(),
        price in (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2)),
        bump in quantity_strategy(),
        direction in direction_strategy(),
    ) {
        let lo = total_amount(grams, purity, price, direction, Decimal::ZERO).unwrap();
        let hi = total_amount(grams + bump, purity, price, direction, Decimal::ZERO).unwrap();
        prop_assert!(hi > lo);
    }

    /// A BUY total rises with the adjustment. A SELL total falls but never
    /// below zero; discounts beyond the base are rejected instead.
    #[test]
    fn prop_adjustment_direction(
        grams in quantity_strategy(),
        purity in purity_strategy(),
        price in price_strategy(),
        adjustment in (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)),
    ) {
        let buy_base = total_amount(grams, purity, price, Direction::Buy, Decimal::ZERO).unwrap();
        let buy_adj = total_amount(grams, purity, price, Direction::Buy, adjustment).unwrap();
        prop_assert!(buy_adj > buy_base);

        let sell_base = total_amount(grams, purity, price, Direction::Sell, Decimal::ZERO).unwrap();
        match total_amount(grams, purity, price, Direction::Sell, adjustment) {
            Ok(sell_adj) => {
                prop_assert!(sell_adj < sell_base);
                prop_assert!(sell_adj >= Decimal::ZERO);
            }
            Err(e) => {
                let is_expected = matches!(e, TradeError::AdjustmentExceedsBase { .. });
                prop_assert!(is_expected);
                prop_assert!(adjustment > sell_base);
            }
        }
    }

    /// Stock never goes negative after any sequence of accepted SELLs.
    #[test]
    fn prop_accepted_sells_never_go_negative(
        ops in prop::collection::vec((any::<bool>(), quantity_strategy()), 1..40),
    ) {
        let mut accepted: Vec<StockEvent> = Vec::new();
        let mut stock = Decimal::ZERO;

        for (is_buy, quantity) in ops {
            let direction = if is_buy { Direction::Buy } else { Direction::Sell };
            match ensure_sufficient_stock(direction, stock, quantity) {
                Ok(()) => {
                    stock += signed_effect(direction, quantity);
                    accepted.push(StockEvent { direction, quantity });
                }
                Err(_) => {
                    // Rejected sale leaves stock unchanged.
                    prop_assert_eq!(current_stock(accepted.iter().copied()), stock);
                }
            }
            prop_assert!(stock >= Decimal::ZERO);
        }

        // The incremental total always matches the fold-over-history definition.
        prop_assert_eq!(current_stock(accepted), stock);
    }
}
