//! `SeaORM` Entity for the consignments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{
    ConsignmentDirection, ConsignmentItemKind, ConsignmentStatus, CurrencyCode,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "consignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Generated code, e.g. `CSG-000001`.
    pub code: String,
    pub customer_id: Uuid,
    pub direction: ConsignmentDirection,
    pub item_kind: ConsignmentItemKind,
    /// Product custody fields; NULL for currency consignments.
    pub product_id: Option<Uuid>,
    pub quantity: Option<Decimal>,
    pub milyem: Option<Decimal>,
    /// Currency fields; NULL for product consignments.
    pub currency: Option<CurrencyCode>,
    pub amount: Option<Decimal>,
    pub currency_buy_price: Option<Decimal>,
    pub currency_sell_price: Option<Decimal>,
    /// Signed delta applied to the customer balance at creation. Stored so
    /// edits and deletes reverse exactly what was applied, even if the
    /// product's conversion factor changes later.
    pub balance_delta: Decimal,
    pub status: ConsignmentStatus,
    pub delivered_at: Option<DateTimeWithTimeZone>,
    pub returned_at: Option<DateTimeWithTimeZone>,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
