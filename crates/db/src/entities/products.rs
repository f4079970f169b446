//! `SeaORM` Entity for the products table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::UnitKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Generated code, e.g. `PRD-000001`.
    pub code: String,
    pub name: String,
    pub unit_kind: UnitKind,
    /// Conversion factor for piece-kind products; NULL for gram-kind.
    pub grams_per_piece: Option<Decimal>,
    pub buy_milyem: Decimal,
    pub sell_milyem: Decimal,
    /// Last reference gold price used when buying, if any.
    pub gold_buy_price: Option<Decimal>,
    /// Last reference gold price used when selling, if any.
    pub gold_sell_price: Option<Decimal>,
    /// Stock snapshot maintained by atomic increments on every trade.
    pub current_stock: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_transactions::Entity")]
    ProductTransactions,
    #[sea_orm(has_many = "super::consignments::Entity")]
    Consignments,
}

impl Related<super::product_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductTransactions.def()
    }
}

impl Related<super::consignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
