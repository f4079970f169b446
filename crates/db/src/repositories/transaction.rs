//! Transaction repository for buy/sell trade operations.
//!
//! Creating a trade touches three records inside one database transaction:
//! the transaction row itself (with its `remaining_stock` snapshot), the
//! product's stock snapshot via an atomic guarded increment, and the linked
//! payment aggregate. Editing or deleting a trade reverses exactly what it
//! applied; snapshots of later sibling rows are left alone and can be
//! repaired wholesale with [`TransactionRepository::recompute_snapshots`].

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use sarraf_core::payment::{PaymentKind, Reconciliation};
use sarraf_core::trade::{
    ensure_sufficient_stock, grams_of, signed_effect, stock_delta, total_amount, Direction,
    TradeError,
};
use sarraf_shared::CodeKind;

use super::counter::{CounterError, CounterRepository};
use super::product::apply_stock_delta;
use crate::entities::{payments, product_transactions, products};

/// Error types for trade operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// A business rule rejected the trade.
    #[error(transparent)]
    Trade(#[from] TradeError),

    /// Counter error while minting the transaction code.
    #[error(transparent)]
    Counter(#[from] CounterError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a trade.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Traded product.
    pub product_id: Uuid,
    /// BUY or SELL.
    pub direction: Direction,
    /// Quantity in the product's own unit.
    pub quantity: Decimal,
    /// Gold price per pure gram when buying.
    pub gold_buy_price: Decimal,
    /// Gold price per pure gram when selling.
    pub gold_sell_price: Decimal,
    /// Non-negative adjustment: added on BUY, subtracted on SELL.
    pub adjustment: Decimal,
    /// Customer the linked payment belongs to, if any.
    pub customer_id: Option<Uuid>,
    /// Free-form note.
    pub note: Option<String>,
}

/// Input for updating a trade. The direction and product are immutable.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// Quantity in the product's own unit.
    pub quantity: Option<Decimal>,
    /// Gold price per pure gram when buying.
    pub gold_buy_price: Option<Decimal>,
    /// Gold price per pure gram when selling.
    pub gold_sell_price: Option<Decimal>,
    /// Non-negative adjustment.
    pub adjustment: Option<Decimal>,
    /// Free-form note.
    pub note: Option<Option<String>>,
}

/// Filter options for listing trades.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    /// Restrict to one product.
    pub product_id: Option<Uuid>,
    /// Restrict to one direction.
    pub direction: Option<Direction>,
}

/// A trade together with its payment aggregate.
#[derive(Debug, Clone)]
pub struct TransactionWithPayment {
    /// The trade row.
    pub transaction: product_transactions::Model,
    /// The linked payment, if one exists.
    pub payment: Option<payments::Model>,
}

/// Transaction repository for trade operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a trade: validates, mints the code, snapshots stock, and
    /// opens the linked payment, all in one database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The product does not exist
    /// - A SELL exceeds the available stock
    /// - Pricing inputs are rejected by the business rules
    /// - A database operation fails
    pub async fn create_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<TransactionWithPayment, TransactionError> {
        let txn = self.db.begin().await?;

        let product = products::Entity::find_by_id(input.product_id)
            .one(&txn)
            .await?
            .ok_or(TransactionError::ProductNotFound(input.product_id))?;

        let (milyem, unit_price) = match input.direction {
            Direction::Buy => (product.buy_milyem, input.gold_buy_price),
            Direction::Sell => (product.sell_milyem, input.gold_sell_price),
        };

        let grams = grams_of(
            input.quantity,
            product.unit_kind.into(),
            product.grams_per_piece,
        )?;
        ensure_sufficient_stock(input.direction, product.current_stock, input.quantity)?;
        let total = total_amount(grams, milyem, unit_price, input.direction, input.adjustment)?;

        let code_kind = match input.direction {
            Direction::Buy => CodeKind::Purchase,
            Direction::Sell => CodeKind::Sale,
        };
        let code = CounterRepository::next_code(&txn, code_kind).await?;

        // Guarded atomic increment; the pre-check above cannot race a
        // sibling SELL, this can.
        let delta = signed_effect(input.direction, input.quantity);
        let remaining = apply_stock_delta(&txn, product.id, delta, true)
            .await?
            .ok_or(TradeError::InsufficientStock {
                requested: input.quantity,
                available: product.current_stock,
            })?;

        self.refresh_reference_prices(&txn, &product, &input).await?;

        let now = chrono::Utc::now().into();
        let transaction = product_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            product_id: Set(product.id),
            direction: Set(input.direction.into()),
            quantity: Set(input.quantity),
            milyem: Set(milyem),
            gold_buy_price: Set(input.gold_buy_price),
            gold_sell_price: Set(input.gold_sell_price),
            adjustment: Set(input.adjustment),
            total_grams: Set(grams),
            total_amount: Set(total),
            remaining_stock: Set(remaining),
            note: Set(input.note),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let transaction = transaction.insert(&txn).await?;

        let kind = match input.direction {
            Direction::Buy => PaymentKind::Payable,
            Direction::Sell => PaymentKind::Receivable,
        };
        let payment = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_transaction_id: Set(Some(transaction.id)),
            customer_id: Set(input.customer_id),
            kind: Set(kind.into()),
            total_amount: Set(total),
            paid_amount: Set(Decimal::ZERO),
            remaining_amount: Set(total),
            status: Set(Reconciliation::new(total).status().into()),
            note: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let payment = payment.insert(&txn).await?;

        txn.commit().await?;

        tracing::info!(code = %transaction.code, %total, "transaction recorded");
        Ok(TransactionWithPayment {
            transaction,
            payment: Some(payment),
        })
    }

    /// Fetches a trade with its payment aggregate.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no trade exists with the given id.
    pub async fn get_transaction(
        &self,
        id: Uuid,
    ) -> Result<TransactionWithPayment, TransactionError> {
        let (transaction, payment) = product_transactions::Entity::find_by_id(id)
            .find_also_related(payments::Entity)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))?;

        Ok(TransactionWithPayment {
            transaction,
            payment,
        })
    }

    /// Lists trades, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<product_transactions::Model>, TransactionError> {
        let mut query = product_transactions::Entity::find()
            .order_by_desc(product_transactions::Column::CreatedAt);

        if let Some(product_id) = filter.product_id {
            query = query.filter(product_transactions::Column::ProductId.eq(product_id));
        }
        if let Some(direction) = filter.direction {
            let direction: crate::entities::sea_orm_active_enums::TradeDirection =
                direction.into();
            query = query.filter(product_transactions::Column::Direction.eq(direction));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Edits a trade, shifting the stock snapshot by the quantity delta and
    /// re-deriving the linked payment from the new total.
    ///
    /// Snapshots of later sibling rows keep their recorded values; run
    /// [`Self::recompute_snapshots`] to realign the whole history.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The trade does not exist
    /// - The new quantity would drive stock negative
    /// - Pricing inputs are rejected by the business rules
    /// - A database operation fails
    pub async fn update_transaction(
        &self,
        id: Uuid,
        input: UpdateTransactionInput,
    ) -> Result<TransactionWithPayment, TransactionError> {
        let txn = self.db.begin().await?;

        let transaction = product_transactions::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(id))?;
        let product = products::Entity::find_by_id(transaction.product_id)
            .one(&txn)
            .await?
            .ok_or(TransactionError::ProductNotFound(transaction.product_id))?;

        let direction: Direction = transaction.direction.into();
        let new_quantity = input.quantity.unwrap_or(transaction.quantity);
        let new_buy_price = input.gold_buy_price.unwrap_or(transaction.gold_buy_price);
        let new_sell_price = input.gold_sell_price.unwrap_or(transaction.gold_sell_price);
        let new_adjustment = input.adjustment.unwrap_or(transaction.adjustment);

        let unit_price = match direction {
            Direction::Buy => new_buy_price,
            Direction::Sell => new_sell_price,
        };

        // The purity stays as captured at creation time.
        let grams = grams_of(new_quantity, product.unit_kind.into(), product.grams_per_piece)?;
        let total = total_amount(grams, transaction.milyem, unit_price, direction, new_adjustment)?;

        let delta = stock_delta(direction, transaction.quantity, new_quantity);
        if delta != Decimal::ZERO {
            apply_stock_delta(&txn, product.id, delta, delta < Decimal::ZERO)
                .await?
                .ok_or(TradeError::InsufficientStock {
                    requested: new_quantity,
                    available: product.current_stock,
                })?;
        }

        let new_snapshot = transaction.remaining_stock + delta;
        let old_total = transaction.total_amount;
        let transaction_id = transaction.id;

        let mut active: product_transactions::ActiveModel = transaction.into();
        active.quantity = Set(new_quantity);
        active.gold_buy_price = Set(new_buy_price);
        active.gold_sell_price = Set(new_sell_price);
        active.adjustment = Set(new_adjustment);
        active.total_grams = Set(grams);
        active.total_amount = Set(total);
        active.remaining_stock = Set(new_snapshot);
        if let Some(note) = input.note {
            active.note = Set(note);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let transaction = active.update(&txn).await?;

        let payment = self
            .retotal_payment(&txn, transaction_id, old_total, total)
            .await?;

        txn.commit().await?;

        tracing::info!(code = %transaction.code, %total, "transaction updated");
        Ok(TransactionWithPayment {
            transaction,
            payment,
        })
    }

    /// Deletes a trade, reversing its stock effect and dropping the linked
    /// payment with its history.
    ///
    /// The reversal is unguarded: correcting a mistaken BUY may leave the
    /// snapshot negative until the history is repaired.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no trade exists with the given id.
    pub async fn delete_transaction(&self, id: Uuid) -> Result<(), TransactionError> {
        let txn = self.db.begin().await?;

        let transaction = product_transactions::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(id))?;

        let direction: Direction = transaction.direction.into();
        let reversal = -signed_effect(direction, transaction.quantity);
        apply_stock_delta(&txn, transaction.product_id, reversal, false).await?;

        payments::Entity::delete_many()
            .filter(payments::Column::ProductTransactionId.eq(id))
            .exec(&txn)
            .await?;
        product_transactions::Entity::delete_by_id(id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(code = %transaction.code, "transaction deleted");
        Ok(())
    }

    /// Replays a product's full history in creation order, rewriting every
    /// stale `remaining_stock` snapshot and the product's stock to the fold.
    ///
    /// Returns the number of rows corrected.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if the product does not exist.
    pub async fn recompute_snapshots(&self, product_id: Uuid) -> Result<u64, TransactionError> {
        let txn = self.db.begin().await?;

        let product = products::Entity::find_by_id(product_id)
            .one(&txn)
            .await?
            .ok_or(TransactionError::ProductNotFound(product_id))?;

        let history = product_transactions::Entity::find()
            .filter(product_transactions::Column::ProductId.eq(product_id))
            .order_by_asc(product_transactions::Column::CreatedAt)
            .order_by_asc(product_transactions::Column::Code)
            .all(&txn)
            .await?;

        let mut corrected = 0u64;
        let mut running = Decimal::ZERO;
        for row in history {
            running += signed_effect(row.direction.into(), row.quantity);
            if row.remaining_stock != running {
                let mut active: product_transactions::ActiveModel = row.into();
                active.remaining_stock = Set(running);
                active.update(&txn).await?;
                corrected += 1;
            }
        }

        if product.current_stock != running {
            let mut active: products::ActiveModel = product.into();
            active.current_stock = Set(running);
            active.update(&txn).await?;
            corrected += 1;
        }

        txn.commit().await?;

        tracing::info!(%product_id, corrected, "snapshots recomputed");
        Ok(corrected)
    }

    /// Stores the trade's gold prices on the product as reference prices.
    async fn refresh_reference_prices(
        &self,
        txn: &DatabaseTransaction,
        product: &products::Model,
        input: &CreateTransactionInput,
    ) -> Result<(), TransactionError> {
        let mut active: products::ActiveModel = product.clone().into();
        active.gold_buy_price = Set(Some(input.gold_buy_price));
        active.gold_sell_price = Set(Some(input.gold_sell_price));
        active.update(txn).await?;
        Ok(())
    }

    /// Re-derives the linked payment aggregate from a changed total.
    async fn retotal_payment(
        &self,
        txn: &DatabaseTransaction,
        transaction_id: Uuid,
        old_total: Decimal,
        new_total: Decimal,
    ) -> Result<Option<payments::Model>, TransactionError> {
        let Some(payment) = payments::Entity::find()
            .filter(payments::Column::ProductTransactionId.eq(transaction_id))
            .one(txn)
            .await?
        else {
            return Ok(None);
        };

        if old_total == new_total {
            return Ok(Some(payment));
        }

        let reconciliation = Reconciliation {
            total: payment.total_amount,
            paid: payment.paid_amount,
        }
        .retotal(new_total);

        let mut active: payments::ActiveModel = payment.into();
        active.total_amount = Set(reconciliation.total);
        active.remaining_amount = Set(reconciliation.remaining());
        active.status = Set(reconciliation.status().into());
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(Some(active.update(txn).await?))
    }
}
