//! `SeaORM` Entity for the customers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CurrencyCode;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Generated code, e.g. `CST-000001`.
    pub code: String,
    pub name: String,
    pub phone: String,
    pub national_id: Option<String>,
    /// Running balance maintained by atomic increments from consignments.
    /// Positive means the customer holds our goods.
    pub balance: Decimal,
    /// Currency the balance is denominated in for currency consignments;
    /// NULL means the balance tracks gram-equivalents only.
    pub balance_currency: Option<CurrencyCode>,
    pub is_favorite: bool,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::consignments::Entity")]
    Consignments,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::consignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consignments.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
