//! `SeaORM` entity definitions.

pub mod consignments;
pub mod counters;
pub mod customers;
pub mod payment_details;
pub mod payments;
pub mod product_transactions;
pub mod products;
pub mod sea_orm_active_enums;
