//! Postgres enum mappings.
//!
//! Each enum mirrors a `CREATE TYPE ... AS ENUM` in the initial migration.
//! Conversions to and from the `sarraf-core` enums live here so repositories
//! never match on raw string values.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "unit_kind")]
pub enum UnitKind {
    #[sea_orm(string_value = "GRAM")]
    Gram,
    #[sea_orm(string_value = "PIECE")]
    Piece,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "trade_direction")]
pub enum TradeDirection {
    #[sea_orm(string_value = "BUY")]
    Buy,
    #[sea_orm(string_value = "SELL")]
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "consignment_direction")]
pub enum ConsignmentDirection {
    #[sea_orm(string_value = "GIVE")]
    Give,
    #[sea_orm(string_value = "RECEIVE")]
    Receive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "consignment_status")]
pub enum ConsignmentStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "RETURNED")]
    Returned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "consignment_item_kind")]
pub enum ConsignmentItemKind {
    #[sea_orm(string_value = "PRODUCT")]
    Product,
    #[sea_orm(string_value = "CURRENCY")]
    Currency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "currency_code")]
pub enum CurrencyCode {
    #[sea_orm(string_value = "TRY")]
    Try,
    #[sea_orm(string_value = "USD")]
    Usd,
    #[sea_orm(string_value = "EUR")]
    Eur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PARTIAL")]
    Partial,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_kind")]
pub enum PaymentKind {
    #[sea_orm(string_value = "PAYABLE")]
    Payable,
    #[sea_orm(string_value = "RECEIVABLE")]
    Receivable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "CASH")]
    Cash,
    #[sea_orm(string_value = "BANK_TRANSFER")]
    BankTransfer,
    #[sea_orm(string_value = "CREDIT_CARD")]
    CreditCard,
}

impl From<sarraf_core::trade::UnitKind> for UnitKind {
    fn from(value: sarraf_core::trade::UnitKind) -> Self {
        match value {
            sarraf_core::trade::UnitKind::Gram => Self::Gram,
            sarraf_core::trade::UnitKind::Piece => Self::Piece,
        }
    }
}

impl From<UnitKind> for sarraf_core::trade::UnitKind {
    fn from(value: UnitKind) -> Self {
        match value {
            UnitKind::Gram => Self::Gram,
            UnitKind::Piece => Self::Piece,
        }
    }
}

impl From<sarraf_core::trade::Direction> for TradeDirection {
    fn from(value: sarraf_core::trade::Direction) -> Self {
        match value {
            sarraf_core::trade::Direction::Buy => Self::Buy,
            sarraf_core::trade::Direction::Sell => Self::Sell,
        }
    }
}

impl From<TradeDirection> for sarraf_core::trade::Direction {
    fn from(value: TradeDirection) -> Self {
        match value {
            TradeDirection::Buy => Self::Buy,
            TradeDirection::Sell => Self::Sell,
        }
    }
}

impl From<sarraf_core::consignment::ConsignmentDirection> for ConsignmentDirection {
    fn from(value: sarraf_core::consignment::ConsignmentDirection) -> Self {
        match value {
            sarraf_core::consignment::ConsignmentDirection::Give => Self::Give,
            sarraf_core::consignment::ConsignmentDirection::Receive => Self::Receive,
        }
    }
}

impl From<ConsignmentDirection> for sarraf_core::consignment::ConsignmentDirection {
    fn from(value: ConsignmentDirection) -> Self {
        match value {
            ConsignmentDirection::Give => Self::Give,
            ConsignmentDirection::Receive => Self::Receive,
        }
    }
}

impl From<sarraf_core::consignment::ConsignmentStatus> for ConsignmentStatus {
    fn from(value: sarraf_core::consignment::ConsignmentStatus) -> Self {
        match value {
            sarraf_core::consignment::ConsignmentStatus::Active => Self::Active,
            sarraf_core::consignment::ConsignmentStatus::Returned => Self::Returned,
        }
    }
}

impl From<ConsignmentStatus> for sarraf_core::consignment::ConsignmentStatus {
    fn from(value: ConsignmentStatus) -> Self {
        match value {
            ConsignmentStatus::Active => Self::Active,
            ConsignmentStatus::Returned => Self::Returned,
        }
    }
}

impl From<sarraf_core::consignment::CurrencyCode> for CurrencyCode {
    fn from(value: sarraf_core::consignment::CurrencyCode) -> Self {
        match value {
            sarraf_core::consignment::CurrencyCode::Try => Self::Try,
            sarraf_core::consignment::CurrencyCode::Usd => Self::Usd,
            sarraf_core::consignment::CurrencyCode::Eur => Self::Eur,
        }
    }
}

impl From<CurrencyCode> for sarraf_core::consignment::CurrencyCode {
    fn from(value: CurrencyCode) -> Self {
        match value {
            CurrencyCode::Try => Self::Try,
            CurrencyCode::Usd => Self::Usd,
            CurrencyCode::Eur => Self::Eur,
        }
    }
}

impl From<sarraf_core::payment::PaymentStatus> for PaymentStatus {
    fn from(value: sarraf_core::payment::PaymentStatus) -> Self {
        match value {
            sarraf_core::payment::PaymentStatus::Pending => Self::Pending,
            sarraf_core::payment::PaymentStatus::Partial => Self::Partial,
            sarraf_core::payment::PaymentStatus::Completed => Self::Completed,
        }
    }
}

impl From<PaymentStatus> for sarraf_core::payment::PaymentStatus {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Pending => Self::Pending,
            PaymentStatus::Partial => Self::Partial,
            PaymentStatus::Completed => Self::Completed,
        }
    }
}

impl From<sarraf_core::payment::PaymentKind> for PaymentKind {
    fn from(value: sarraf_core::payment::PaymentKind) -> Self {
        match value {
            sarraf_core::payment::PaymentKind::Payable => Self::Payable,
            sarraf_core::payment::PaymentKind::Receivable => Self::Receivable,
        }
    }
}

impl From<PaymentKind> for sarraf_core::payment::PaymentKind {
    fn from(value: PaymentKind) -> Self {
        match value {
            PaymentKind::Payable => Self::Payable,
            PaymentKind::Receivable => Self::Receivable,
        }
    }
}

impl From<sarraf_core::payment::PaymentMethod> for PaymentMethod {
    fn from(value: sarraf_core::payment::PaymentMethod) -> Self {
        match value {
            sarraf_core::payment::PaymentMethod::Cash => Self::Cash,
            sarraf_core::payment::PaymentMethod::BankTransfer => Self::BankTransfer,
            sarraf_core::payment::PaymentMethod::CreditCard => Self::CreditCard,
        }
    }
}

impl From<PaymentMethod> for sarraf_core::payment::PaymentMethod {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::BankTransfer => Self::BankTransfer,
            PaymentMethod::CreditCard => Self::CreditCard,
        }
    }
}
