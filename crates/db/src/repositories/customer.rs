//! Customer repository for database operations.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;

use sarraf_core::consignment::CurrencyCode;
use sarraf_shared::CodeKind;

use super::counter::{CounterError, CounterRepository};
use crate::entities::{consignments, customers, payments};

/// Error types for customer operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// Customer not found.
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    /// Cannot delete a customer with open consignments.
    #[error("Cannot delete customer: {0} active consignments reference them")]
    HasConsignments(u64),

    /// Cannot delete a customer with unsettled payments.
    #[error("Cannot delete customer: {0} unsettled payments reference them")]
    HasPayments(u64),

    /// Counter error while minting the customer code.
    #[error(transparent)]
    Counter(#[from] CounterError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerInput {
    /// Customer name.
    pub name: String,
    /// Mobile phone number.
    pub phone: String,
    /// Optional national identity number.
    pub national_id: Option<String>,
    /// Currency the balance is denominated in; None tracks gram-equivalents.
    pub balance_currency: Option<CurrencyCode>,
    /// Free-form note.
    pub note: Option<String>,
}

/// Input for updating a customer.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomerInput {
    /// Customer name.
    pub name: Option<String>,
    /// Mobile phone number.
    pub phone: Option<String>,
    /// Optional national identity number.
    pub national_id: Option<Option<String>>,
    /// Balance denomination.
    pub balance_currency: Option<Option<CurrencyCode>>,
    /// Free-form note.
    pub note: Option<Option<String>>,
}

/// Customer repository for CRUD and balance operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a customer, minting its code in the same database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_customer(
        &self,
        input: CreateCustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        let txn = self.db.begin().await?;

        let code = CounterRepository::next_code(&txn, CodeKind::Customer).await?;
        let now = chrono::Utc::now().into();

        let customer = customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(input.name),
            phone: Set(input.phone),
            national_id: Set(input.national_id),
            balance: Set(Decimal::ZERO),
            balance_currency: Set(input.balance_currency.map(Into::into)),
            is_favorite: Set(false),
            note: Set(input.note),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let customer = customer.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(code = %customer.code, "customer created");
        Ok(customer)
    }

    /// Fetches a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no customer exists with the given id.
    pub async fn get_customer(&self, id: Uuid) -> Result<customers::Model, CustomerError> {
        customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CustomerError::NotFound(id))
    }

    /// Lists customers, favorites first, optionally filtered by a name search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_customers(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<customers::Model>, CustomerError> {
        let mut query = customers::Entity::find()
            .order_by_desc(customers::Column::IsFavorite)
            .order_by_asc(customers::Column::Name);

        if let Some(term) = search {
            query = query.filter(customers::Column::Name.contains(term));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Updates a customer's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no customer exists with the given id.
    pub async fn update_customer(
        &self,
        id: Uuid,
        input: UpdateCustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        let customer = self.get_customer(id).await?;
        let mut active: customers::ActiveModel = customer.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(national_id) = input.national_id {
            active.national_id = Set(national_id);
        }
        if let Some(balance_currency) = input.balance_currency {
            active.balance_currency = Set(balance_currency.map(Into::into));
        }
        if let Some(note) = input.note {
            active.note = Set(note);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Sets or clears the favorite flag.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no customer exists with the given id.
    pub async fn set_favorite(
        &self,
        id: Uuid,
        is_favorite: bool,
    ) -> Result<customers::Model, CustomerError> {
        let customer = self.get_customer(id).await?;
        let mut active: customers::ActiveModel = customer.into();
        active.is_favorite = Set(is_favorite);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a customer with no open business: active consignments and
    /// unsettled payments block the deletion. Returned consignments are
    /// balance-neutral history and are removed with the customer; settled
    /// free-standing payments are removed; trade-linked payments stay with
    /// their trade and are detached instead.
    ///
    /// # Errors
    ///
    /// Returns `HasConsignments` or `HasPayments` if open records remain,
    /// `NotFound` if the customer does not exist.
    pub async fn delete_customer(&self, id: Uuid) -> Result<(), CustomerError> {
        use crate::entities::sea_orm_active_enums::{ConsignmentStatus, PaymentStatus};

        let customer = self.get_customer(id).await?;
        let txn = self.db.begin().await?;

        let active_count = consignments::Entity::find()
            .filter(consignments::Column::CustomerId.eq(id))
            .filter(consignments::Column::Status.eq(ConsignmentStatus::Active))
            .count(&txn)
            .await?;
        if active_count > 0 {
            return Err(CustomerError::HasConsignments(active_count));
        }

        let open_count = payments::Entity::find()
            .filter(payments::Column::CustomerId.eq(id))
            .filter(
                payments::Column::Status
                    .is_in([PaymentStatus::Pending, PaymentStatus::Partial]),
            )
            .count(&txn)
            .await?;
        if open_count > 0 {
            return Err(CustomerError::HasPayments(open_count));
        }

        consignments::Entity::delete_many()
            .filter(consignments::Column::CustomerId.eq(id))
            .exec(&txn)
            .await?;
        payments::Entity::delete_many()
            .filter(payments::Column::CustomerId.eq(id))
            .filter(payments::Column::ProductTransactionId.is_null())
            .exec(&txn)
            .await?;
        payments::Entity::update_many()
            .col_expr(payments::Column::CustomerId, Expr::value(Option::<Uuid>::None))
            .filter(payments::Column::CustomerId.eq(id))
            .exec(&txn)
            .await?;

        customers::Entity::delete_by_id(customer.id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(code = %customer.code, "customer deleted");
        Ok(())
    }
}

/// Atomically shifts a customer's balance by `delta` and returns the new
/// value. Never read-modify-write: concurrent consignments must both land.
pub(crate) async fn apply_balance_delta<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
    delta: Decimal,
) -> Result<Option<Decimal>, DbErr> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "UPDATE customers
            SET balance = balance + $1
          WHERE id = $2
         RETURNING balance",
        [delta.into(), customer_id.into()],
    );

    let row = conn.query_one(stmt).await?;
    row.map(|r| r.try_get("", "balance")).transpose()
}
