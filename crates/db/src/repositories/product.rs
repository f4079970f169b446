//! Product repository for catalog database operations.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use sarraf_core::trade::UnitKind;
use sarraf_shared::CodeKind;

use super::counter::{CounterError, CounterRepository};
use crate::entities::{consignments, product_transactions, products};

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// Cannot delete a product that has recorded transactions.
    #[error("Cannot delete product: {0} transactions reference it")]
    HasTransactions(u64),

    /// Cannot delete a product that has recorded consignments.
    #[error("Cannot delete product: {0} consignments reference it")]
    HasConsignments(u64),

    /// Counter error while minting the product code.
    #[error(transparent)]
    Counter(#[from] CounterError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Product name.
    pub name: String,
    /// Whether the product is traded by gram or by piece.
    pub unit_kind: UnitKind,
    /// Grams per piece for piece-kind products.
    pub grams_per_piece: Option<Decimal>,
    /// Purity applied when buying.
    pub buy_milyem: Decimal,
    /// Purity applied when selling.
    pub sell_milyem: Decimal,
}

/// Input for updating a product.
///
/// The unit kind is immutable after creation; changing it would silently
/// reinterpret the whole stock history.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    /// Product name.
    pub name: Option<String>,
    /// Grams per piece for piece-kind products.
    pub grams_per_piece: Option<Option<Decimal>>,
    /// Purity applied when buying.
    pub buy_milyem: Option<Decimal>,
    /// Purity applied when selling.
    pub sell_milyem: Option<Decimal>,
}

/// Product repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a product, minting its code in the same database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<products::Model, ProductError> {
        let txn = self.db.begin().await?;

        let code = CounterRepository::next_code(&txn, CodeKind::Product).await?;
        let now = chrono::Utc::now().into();

        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(input.name),
            unit_kind: Set(input.unit_kind.into()),
            grams_per_piece: Set(input.grams_per_piece),
            buy_milyem: Set(input.buy_milyem),
            sell_milyem: Set(input.sell_milyem),
            gold_buy_price: Set(None),
            gold_sell_price: Set(None),
            current_stock: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let product = product.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(code = %product.code, "product created");
        Ok(product)
    }

    /// Fetches a product by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no product exists with the given id.
    pub async fn get_product(&self, id: Uuid) -> Result<products::Model, ProductError> {
        products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Lists products ordered by code, optionally filtered by a name search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_products(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<products::Model>, ProductError> {
        let mut query = products::Entity::find().order_by_asc(products::Column::Code);

        if let Some(term) = search {
            query = query.filter(products::Column::Name.contains(term));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Updates a product's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no product exists with the given id.
    pub async fn update_product(
        &self,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<products::Model, ProductError> {
        let product = self.get_product(id).await?;
        let mut active: products::ActiveModel = product.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(grams_per_piece) = input.grams_per_piece {
            active.grams_per_piece = Set(grams_per_piece);
        }
        if let Some(buy_milyem) = input.buy_milyem {
            active.buy_milyem = Set(buy_milyem);
        }
        if let Some(sell_milyem) = input.sell_milyem {
            active.sell_milyem = Set(sell_milyem);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a product that nothing references.
    ///
    /// # Errors
    ///
    /// Returns `HasTransactions` or `HasConsignments` if the product is still
    /// referenced, `NotFound` if it does not exist.
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ProductError> {
        let product = self.get_product(id).await?;

        let transaction_count = product_transactions::Entity::find()
            .filter(product_transactions::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;
        if transaction_count > 0 {
            return Err(ProductError::HasTransactions(transaction_count));
        }

        let consignment_count = consignments::Entity::find()
            .filter(consignments::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;
        if consignment_count > 0 {
            return Err(ProductError::HasConsignments(consignment_count));
        }

        products::Entity::delete_by_id(product.id)
            .exec(&self.db)
            .await?;

        tracing::info!(code = %product.code, "product deleted");
        Ok(())
    }
}

/// Atomically shifts a product's stock snapshot by `delta` and returns the
/// new value.
///
/// When `guard_non_negative` is set the update only applies if the resulting
/// stock stays at or above zero; `Ok(None)` means the guard rejected it or
/// the product does not exist.
pub(crate) async fn apply_stock_delta<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    delta: Decimal,
    guard_non_negative: bool,
) -> Result<Option<Decimal>, DbErr> {
    let sql = if guard_non_negative {
        "UPDATE products
            SET current_stock = current_stock + $1
          WHERE id = $2 AND current_stock + $1 >= 0
         RETURNING current_stock"
    } else {
        "UPDATE products
            SET current_stock = current_stock + $1
          WHERE id = $2
         RETURNING current_stock"
    };

    let stmt =
        Statement::from_sql_and_values(DbBackend::Postgres, sql, [delta.into(), product_id.into()]);

    let row = conn.query_one(stmt).await?;
    row.map(|r| r.try_get("", "current_stock")).transpose()
}
