//! `SeaORM` Entity for the product_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TradeDirection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "product_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Generated code, e.g. `BUY-000001` or `SEL-000001`.
    pub code: String,
    pub product_id: Uuid,
    pub direction: TradeDirection,
    /// Quantity in the product's own unit (grams or pieces).
    pub quantity: Decimal,
    /// Purity captured from the product at transaction time.
    pub milyem: Decimal,
    pub gold_buy_price: Decimal,
    pub gold_sell_price: Decimal,
    pub adjustment: Decimal,
    /// Pure-gold grams moved by this transaction.
    pub total_grams: Decimal,
    pub total_amount: Decimal,
    /// Stock snapshot after this transaction was applied. Historical rows
    /// are not rewritten when later rows are edited or deleted.
    pub remaining_stock: Decimal,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
    #[sea_orm(has_one = "super::payments::Entity")]
    Payments,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
