//! Consignment repository for customer custody operations.
//!
//! Every consignment row stores the signed `balance_delta` it currently has
//! applied to its customer's balance. Create applies it, edit applies the
//! difference, return and delete reverse it. The stored value is the single
//! source of truth for reversal, so a later change to a product's conversion
//! factor can never corrupt a customer balance.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use sarraf_core::consignment::{
    balance_delta, signed_delta, ConsignmentDirection, ConsignmentError, ConsignmentStatus,
    CurrencyCode, ItemKind, ProductCustody,
};
use sarraf_shared::CodeKind;

use super::counter::{CounterError, CounterRepository};
use super::customer::apply_balance_delta;
use crate::entities::{
    consignments, customers, products, sea_orm_active_enums::ConsignmentItemKind,
};

/// Error types for consignment operations.
#[derive(Debug, thiserror::Error)]
pub enum ConsignmentRepoError {
    /// Consignment not found.
    #[error("Consignment not found: {0}")]
    NotFound(Uuid),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Returned consignments are closed; only deletion is allowed.
    #[error("Consignment {0} has been returned and can no longer be edited")]
    AlreadyReturned(Uuid),

    /// A business rule rejected the consignment.
    #[error(transparent)]
    Consignment(#[from] ConsignmentError),

    /// Counter error while minting the consignment code.
    #[error(transparent)]
    Counter(#[from] CounterError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// The item side of a consignment.
#[derive(Debug, Clone)]
pub enum ConsignmentItemInput {
    /// Custody of a catalog product.
    Product {
        /// The consigned product.
        product_id: Uuid,
        /// Quantity in the product's own unit.
        quantity: Decimal,
        /// Purity of the consigned goods.
        milyem: Decimal,
    },
    /// Custody of foreign or local currency.
    Currency {
        /// Currency of the consigned amount.
        currency: CurrencyCode,
        /// Consigned amount.
        amount: Decimal,
        /// Reference buy price at consignment time.
        buy_price: Option<Decimal>,
        /// Reference sell price at consignment time.
        sell_price: Option<Decimal>,
    },
}

/// Input for creating a consignment.
#[derive(Debug, Clone)]
pub struct CreateConsignmentInput {
    /// Owning customer.
    pub customer_id: Uuid,
    /// GIVE or RECEIVE.
    pub direction: ConsignmentDirection,
    /// The consigned item.
    pub item: ConsignmentItemInput,
    /// When the goods changed hands.
    pub delivered_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    /// Free-form note.
    pub note: Option<String>,
}

/// Input for updating an active consignment. Direction, item kind, customer,
/// and product are immutable.
#[derive(Debug, Clone, Default)]
pub struct UpdateConsignmentInput {
    /// Quantity in the product's own unit.
    pub quantity: Option<Decimal>,
    /// Purity of the consigned goods.
    pub milyem: Option<Decimal>,
    /// Consigned currency amount.
    pub amount: Option<Decimal>,
    /// Reference buy price.
    pub currency_buy_price: Option<Option<Decimal>>,
    /// Reference sell price.
    pub currency_sell_price: Option<Option<Decimal>>,
    /// When the goods changed hands.
    pub delivered_at: Option<Option<chrono::DateTime<chrono::FixedOffset>>>,
    /// Free-form note.
    pub note: Option<Option<String>>,
}

/// Filter options for listing consignments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsignmentFilter {
    /// Restrict to one customer.
    pub customer_id: Option<Uuid>,
    /// Restrict to one status.
    pub status: Option<ConsignmentStatus>,
}

/// Consignment repository for custody and balance operations.
#[derive(Debug, Clone)]
pub struct ConsignmentRepository {
    db: DatabaseConnection,
}

impl ConsignmentRepository {
    /// Creates a new consignment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a consignment and applies its balance delta to the customer,
    /// both inside one database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The customer or product does not exist
    /// - The item's value-bearing fields are incomplete
    /// - A database operation fails
    pub async fn create_consignment(
        &self,
        input: CreateConsignmentInput,
    ) -> Result<consignments::Model, ConsignmentRepoError> {
        let txn = self.db.begin().await?;

        let customer = customers::Entity::find_by_id(input.customer_id)
            .one(&txn)
            .await?
            .ok_or(ConsignmentRepoError::CustomerNotFound(input.customer_id))?;
        let balance_currency = customer.balance_currency.map(Into::into);

        let applied = match &input.item {
            ConsignmentItemInput::Product {
                product_id,
                quantity,
                milyem,
            } => {
                let product = products::Entity::find_by_id(*product_id)
                    .one(&txn)
                    .await?
                    .ok_or(ConsignmentRepoError::ProductNotFound(*product_id))?;
                let custody = ProductCustody {
                    quantity: *quantity,
                    purity: *milyem,
                    unit_kind: product.unit_kind.into(),
                    grams_per_piece: product.grams_per_piece,
                };
                let delta =
                    balance_delta(ItemKind::Product, Some(custody), None, balance_currency)?;
                signed_delta(input.direction, delta)
            }
            ConsignmentItemInput::Currency {
                currency, amount, ..
            } => {
                let delta = balance_delta(
                    ItemKind::Currency(*currency),
                    None,
                    Some(*amount),
                    balance_currency,
                )?;
                signed_delta(input.direction, delta)
            }
        };

        let code = CounterRepository::next_code(&txn, CodeKind::Consignment).await?;
        apply_balance_delta(&txn, customer.id, applied).await?;

        let now = chrono::Utc::now().into();
        let (item_kind, product_id, quantity, milyem, currency, amount, buy_price, sell_price) =
            match input.item {
                ConsignmentItemInput::Product {
                    product_id,
                    quantity,
                    milyem,
                } => (
                    ConsignmentItemKind::Product,
                    Some(product_id),
                    Some(quantity),
                    Some(milyem),
                    None,
                    None,
                    None,
                    None,
                ),
                ConsignmentItemInput::Currency {
                    currency,
                    amount,
                    buy_price,
                    sell_price,
                } => (
                    ConsignmentItemKind::Currency,
                    None,
                    None,
                    None,
                    Some(currency.into()),
                    Some(amount),
                    buy_price,
                    sell_price,
                ),
            };

        let consignment = consignments::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            customer_id: Set(customer.id),
            direction: Set(input.direction.into()),
            item_kind: Set(item_kind),
            product_id: Set(product_id),
            quantity: Set(quantity),
            milyem: Set(milyem),
            currency: Set(currency),
            amount: Set(amount),
            currency_buy_price: Set(buy_price),
            currency_sell_price: Set(sell_price),
            balance_delta: Set(applied),
            status: Set(ConsignmentStatus::Active.into()),
            delivered_at: Set(input.delivered_at),
            returned_at: Set(None),
            note: Set(input.note),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let consignment = consignment.insert(&txn).await?;

        txn.commit().await?;

        tracing::info!(code = %consignment.code, delta = %applied, "consignment recorded");
        Ok(consignment)
    }

    /// Fetches a consignment by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no consignment exists with the given id.
    pub async fn get_consignment(
        &self,
        id: Uuid,
    ) -> Result<consignments::Model, ConsignmentRepoError> {
        consignments::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ConsignmentRepoError::NotFound(id))
    }

    /// Lists consignments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_consignments(
        &self,
        filter: ConsignmentFilter,
    ) -> Result<Vec<consignments::Model>, ConsignmentRepoError> {
        let mut query =
            consignments::Entity::find().order_by_desc(consignments::Column::CreatedAt);

        if let Some(customer_id) = filter.customer_id {
            query = query.filter(consignments::Column::CustomerId.eq(customer_id));
        }
        if let Some(status) = filter.status {
            let status: crate::entities::sea_orm_active_enums::ConsignmentStatus = status.into();
            query = query.filter(consignments::Column::Status.eq(status));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Edits an active consignment, applying the signed difference of the
    /// new and old balance deltas to the customer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The consignment does not exist or has been returned
    /// - The item's value-bearing fields are incomplete
    /// - A database operation fails
    pub async fn update_consignment(
        &self,
        id: Uuid,
        input: UpdateConsignmentInput,
    ) -> Result<consignments::Model, ConsignmentRepoError> {
        let txn = self.db.begin().await?;

        let consignment = self.find_active(&txn, id).await?;
        let customer = customers::Entity::find_by_id(consignment.customer_id)
            .one(&txn)
            .await?
            .ok_or(ConsignmentRepoError::CustomerNotFound(
                consignment.customer_id,
            ))?;
        let balance_currency = customer.balance_currency.map(Into::into);

        let new_quantity = input.quantity.or(consignment.quantity);
        let new_milyem = input.milyem.or(consignment.milyem);
        let new_amount = input.amount.or(consignment.amount);

        let new_applied = match consignment.item_kind {
            ConsignmentItemKind::Product => {
                let product_id = consignment
                    .product_id
                    .ok_or(ConsignmentError::MissingCustodyFields)?;
                let product = products::Entity::find_by_id(product_id)
                    .one(&txn)
                    .await?
                    .ok_or(ConsignmentRepoError::ProductNotFound(product_id))?;
                let custody = ProductCustody {
                    quantity: new_quantity.ok_or(ConsignmentError::MissingCustodyFields)?,
                    purity: new_milyem.ok_or(ConsignmentError::MissingCustodyFields)?,
                    unit_kind: product.unit_kind.into(),
                    grams_per_piece: product.grams_per_piece,
                };
                let delta =
                    balance_delta(ItemKind::Product, Some(custody), None, balance_currency)?;
                signed_delta(consignment.direction.into(), delta)
            }
            ConsignmentItemKind::Currency => {
                let currency = consignment
                    .currency
                    .ok_or(ConsignmentError::MissingAmount)?;
                let delta = balance_delta(
                    ItemKind::Currency(currency.into()),
                    None,
                    new_amount,
                    balance_currency,
                )?;
                signed_delta(consignment.direction.into(), delta)
            }
        };

        let difference = new_applied - consignment.balance_delta;
        if difference != Decimal::ZERO {
            apply_balance_delta(&txn, customer.id, difference).await?;
        }

        let mut active: consignments::ActiveModel = consignment.into();
        active.quantity = Set(new_quantity);
        active.milyem = Set(new_milyem);
        active.amount = Set(new_amount);
        if let Some(buy_price) = input.currency_buy_price {
            active.currency_buy_price = Set(buy_price);
        }
        if let Some(sell_price) = input.currency_sell_price {
            active.currency_sell_price = Set(sell_price);
        }
        if let Some(delivered_at) = input.delivered_at {
            active.delivered_at = Set(delivered_at);
        }
        if let Some(note) = input.note {
            active.note = Set(note);
        }
        active.balance_delta = Set(new_applied);
        active.updated_at = Set(chrono::Utc::now().into());
        let consignment = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(code = %consignment.code, delta = %difference, "consignment updated");
        Ok(consignment)
    }

    /// Closes a consignment: reverses its applied balance delta and marks it
    /// RETURNED with a return timestamp.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyReturned` if the consignment is already closed,
    /// `NotFound` if it does not exist.
    pub async fn mark_returned(
        &self,
        id: Uuid,
    ) -> Result<consignments::Model, ConsignmentRepoError> {
        let txn = self.db.begin().await?;

        let consignment = self.find_active(&txn, id).await?;
        if consignment.balance_delta != Decimal::ZERO {
            apply_balance_delta(&txn, consignment.customer_id, -consignment.balance_delta)
                .await?;
        }

        let now = chrono::Utc::now().into();
        let mut active: consignments::ActiveModel = consignment.into();
        active.balance_delta = Set(Decimal::ZERO);
        active.status = Set(ConsignmentStatus::Returned.into());
        active.returned_at = Set(Some(now));
        active.updated_at = Set(now);
        let consignment = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(code = %consignment.code, "consignment returned");
        Ok(consignment)
    }

    /// Deletes a consignment, reversing whatever balance delta it still has
    /// applied. Deleting a returned consignment touches no balance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no consignment exists with the given id.
    pub async fn delete_consignment(&self, id: Uuid) -> Result<(), ConsignmentRepoError> {
        let txn = self.db.begin().await?;

        let consignment = consignments::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ConsignmentRepoError::NotFound(id))?;

        if consignment.balance_delta != Decimal::ZERO {
            apply_balance_delta(&txn, consignment.customer_id, -consignment.balance_delta)
                .await?;
        }

        consignments::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(code = %consignment.code, "consignment deleted");
        Ok(())
    }

    /// Fetches a consignment and rejects closed ones.
    async fn find_active(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
    ) -> Result<consignments::Model, ConsignmentRepoError> {
        let consignment = consignments::Entity::find_by_id(id)
            .one(txn)
            .await?
            .ok_or(ConsignmentRepoError::NotFound(id))?;

        if consignment.status == crate::entities::sea_orm_active_enums::ConsignmentStatus::Returned
        {
            return Err(ConsignmentRepoError::AlreadyReturned(id));
        }
        Ok(consignment)
    }
}
