//! Payment repository for reconciliation operations.
//!
//! The payments table holds the aggregate (total, paid, remaining, status);
//! payment_details holds the immutable application history. Applying an
//! amount uses a guarded atomic increment on `paid_amount` so two cashiers
//! can never jointly overpay, then re-derives remaining and status from the
//! returned value.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use sarraf_core::payment::{
    PaymentError as CorePaymentError, PaymentKind, PaymentMethod, PaymentStatus, Reconciliation,
    SETTLEMENT_EPSILON,
};

use crate::entities::{payment_details, payments};

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentRepoError {
    /// Payment not found.
    #[error("Payment not found: {0}")]
    NotFound(Uuid),

    /// Trade-linked payments live and die with their trade.
    #[error("Payment {0} is linked to a transaction and cannot be deleted directly")]
    LinkedToTransaction(Uuid),

    /// A business rule rejected the application.
    #[error(transparent)]
    Payment(#[from] CorePaymentError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a standalone payment.
#[derive(Debug, Clone)]
pub struct CreatePaymentInput {
    /// Linked trade, if this payment tracks one.
    pub product_transaction_id: Option<Uuid>,
    /// Customer the payment belongs to, if any.
    pub customer_id: Option<Uuid>,
    /// PAYABLE or RECEIVABLE.
    pub kind: PaymentKind,
    /// Total amount owed.
    pub total_amount: Decimal,
    /// Free-form note.
    pub note: Option<String>,
}

/// Input for applying one amount against a payment.
#[derive(Debug, Clone)]
pub struct ApplyPaymentInput {
    /// Amount to apply.
    pub amount: Decimal,
    /// How the money moved.
    pub method: PaymentMethod,
    /// Bank name for bank transfers.
    pub bank_name: Option<String>,
    /// Account holder for bank transfers.
    pub account_holder: Option<String>,
    /// External reference, e.g. a transfer query number.
    pub reference: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
}

/// Filter options for listing payments.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentFilter {
    /// Restrict to one customer.
    pub customer_id: Option<Uuid>,
    /// Restrict to one status.
    pub status: Option<PaymentStatus>,
}

/// A payment aggregate with its application history.
#[derive(Debug, Clone)]
pub struct PaymentWithDetails {
    /// The aggregate row.
    pub payment: payments::Model,
    /// Applications in chronological order.
    pub details: Vec<payment_details::Model>,
}

/// Payment repository for reconciliation operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a payment aggregate with nothing paid.
    ///
    /// Trade-linked payments are opened by the transaction repository; this
    /// path covers free-standing debts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_payment(
        &self,
        input: CreatePaymentInput,
    ) -> Result<payments::Model, PaymentRepoError> {
        let reconciliation = Reconciliation::new(input.total_amount);
        let now = chrono::Utc::now().into();

        let payment = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_transaction_id: Set(input.product_transaction_id),
            customer_id: Set(input.customer_id),
            kind: Set(input.kind.into()),
            total_amount: Set(reconciliation.total),
            paid_amount: Set(reconciliation.paid),
            remaining_amount: Set(reconciliation.remaining()),
            status: Set(reconciliation.status().into()),
            note: Set(input.note),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(payment.insert(&self.db).await?)
    }

    /// Fetches a payment with its application history.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no payment exists with the given id.
    pub async fn get_payment(&self, id: Uuid) -> Result<PaymentWithDetails, PaymentRepoError> {
        let payment = payments::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PaymentRepoError::NotFound(id))?;

        let details = payment_details::Entity::find()
            .filter(payment_details::Column::PaymentId.eq(id))
            .order_by_asc(payment_details::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(PaymentWithDetails { payment, details })
    }

    /// Lists payment aggregates, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_payments(
        &self,
        filter: PaymentFilter,
    ) -> Result<Vec<payments::Model>, PaymentRepoError> {
        let mut query = payments::Entity::find().order_by_desc(payments::Column::CreatedAt);

        if let Some(customer_id) = filter.customer_id {
            query = query.filter(payments::Column::CustomerId.eq(customer_id));
        }
        if let Some(status) = filter.status {
            let status: crate::entities::sea_orm_active_enums::PaymentStatus = status.into();
            query = query.filter(payments::Column::Status.eq(status));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Applies one amount against a payment: appends an immutable detail row
    /// and advances the aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The payment does not exist
    /// - The amount is not positive
    /// - The amount would overpay beyond the settlement epsilon
    /// - A database operation fails
    pub async fn apply_payment(
        &self,
        payment_id: Uuid,
        input: ApplyPaymentInput,
    ) -> Result<PaymentWithDetails, PaymentRepoError> {
        if input.amount <= Decimal::ZERO {
            return Err(CorePaymentError::NonPositiveAmount(input.amount).into());
        }

        let txn = self.db.begin().await?;

        // Guarded atomic increment. No matching row means either an unknown
        // payment or an overpayment; disambiguate by re-reading.
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE payments
                SET paid_amount = paid_amount + $1
              WHERE id = $2 AND paid_amount + $1 <= total_amount + $3
             RETURNING total_amount, paid_amount",
            [
                input.amount.into(),
                payment_id.into(),
                SETTLEMENT_EPSILON.into(),
            ],
        );
        let Some(row) = txn.query_one(stmt).await? else {
            let payment = payments::Entity::find_by_id(payment_id)
                .one(&txn)
                .await?
                .ok_or(PaymentRepoError::NotFound(payment_id))?;
            return Err(CorePaymentError::Overpayment {
                paid: payment.paid_amount,
                amount: input.amount,
                total: payment.total_amount,
            }
            .into());
        };

        let reconciliation = Reconciliation {
            total: row.try_get("", "total_amount")?,
            paid: row.try_get("", "paid_amount")?,
        };

        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        let detail = payment_details::ActiveModel {
            id: Set(Uuid::new_v4()),
            payment_id: Set(payment_id),
            amount: Set(input.amount),
            method: Set(input.method.into()),
            bank_name: Set(input.bank_name),
            account_holder: Set(input.account_holder),
            reference: Set(input.reference),
            note: Set(input.note),
            created_at: Set(now),
        };
        detail.insert(&txn).await?;

        let aggregate = payments::ActiveModel {
            id: Set(payment_id),
            remaining_amount: Set(reconciliation.remaining()),
            status: Set(reconciliation.status().into()),
            updated_at: Set(now),
            ..Default::default()
        };
        payments::Entity::update(aggregate).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            %payment_id,
            amount = %input.amount,
            status = ?reconciliation.status(),
            "payment applied"
        );
        self.get_payment(payment_id).await
    }

    /// Deletes a free-standing payment and its history.
    ///
    /// Trade-linked payments are removed with their trade, never directly.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no payment exists with the given id,
    /// `LinkedToTransaction` if it belongs to a trade.
    pub async fn delete_payment(&self, id: Uuid) -> Result<(), PaymentRepoError> {
        let payment = payments::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PaymentRepoError::NotFound(id))?;

        if payment.product_transaction_id.is_some() {
            return Err(PaymentRepoError::LinkedToTransaction(id));
        }

        payments::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
