//! `SeaORM` Entity for the payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentKind, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Linked trade, if this payment tracks a product transaction.
    pub product_transaction_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    /// PAYABLE for purchases (we owe), RECEIVABLE for sales (owed to us).
    pub kind: PaymentKind,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
    pub status: PaymentStatus,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_transactions::Entity",
        from = "Column::ProductTransactionId",
        to = "super::product_transactions::Column::Id"
    )]
    ProductTransactions,
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(has_many = "super::payment_details::Entity")]
    PaymentDetails,
}

impl Related<super::product_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductTransactions.def()
    }
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::payment_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
