//! Buy/sell trade routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::routes::payments::PaymentResponse;
use crate::routes::products::{parse_decimal, validation_response, ProductResponse};
use sarraf_core::trade::{Direction, TradeError};
use sarraf_core::validation::validate_transaction;
use sarraf_db::repositories::{
    CreateTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
    TransactionWithPayment, UpdateTransactionInput,
};

/// Creates the trade routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
        .route("/transactions/{id}", get(get_transaction))
        .route("/transactions/{id}", patch(update_transaction))
        .route("/transactions/{id}", delete(delete_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing trades.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by product.
    pub product_id: Option<Uuid>,
    /// Filter by direction ("BUY" or "SELL").
    pub direction: Option<String>,
}

/// Request body for creating a trade.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Traded product.
    pub product_id: Uuid,
    /// "BUY" or "SELL".
    pub direction: String,
    /// Quantity in the product's own unit.
    pub quantity: String,
    /// Gold price per pure gram when buying.
    pub gold_buy_price: String,
    /// Gold price per pure gram when selling.
    pub gold_sell_price: String,
    /// Non-negative adjustment: added on BUY, subtracted on SELL.
    pub adjustment: Option<String>,
    /// Customer the linked payment belongs to.
    pub customer_id: Option<Uuid>,
    /// Free-form note.
    pub note: Option<String>,
}

/// Request body for updating a trade.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// Quantity in the product's own unit.
    pub quantity: Option<String>,
    /// Gold price per pure gram when buying.
    pub gold_buy_price: Option<String>,
    /// Gold price per pure gram when selling.
    pub gold_sell_price: Option<String>,
    /// Non-negative adjustment.
    pub adjustment: Option<String>,
    /// Free-form note.
    pub note: Option<Option<String>>,
}

/// Response for a trade.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Generated code.
    pub code: String,
    /// Traded product.
    pub product_id: Uuid,
    /// "BUY" or "SELL".
    pub direction: String,
    /// Quantity in the product's own unit.
    pub quantity: String,
    /// Purity captured at transaction time.
    pub milyem: String,
    /// Gold price per pure gram when buying.
    pub gold_buy_price: String,
    /// Gold price per pure gram when selling.
    pub gold_sell_price: String,
    /// Adjustment applied to the total.
    pub adjustment: String,
    /// Pure-gold grams moved.
    pub total_grams: String,
    /// Total amount.
    pub total_amount: String,
    /// Stock snapshot after this trade.
    pub remaining_stock: String,
    /// Free-form note.
    pub note: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
    /// Linked payment aggregate.
    pub payment: Option<PaymentResponse>,
    /// Traded product; populated on detail fetches only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductResponse>,
}

impl From<TransactionWithPayment> for TransactionResponse {
    fn from(value: TransactionWithPayment) -> Self {
        let t = value.transaction;
        Self {
            id: t.id,
            code: t.code,
            product_id: t.product_id,
            direction: direction_to_string(t.direction.into()).to_string(),
            quantity: t.quantity.to_string(),
            milyem: t.milyem.to_string(),
            gold_buy_price: t.gold_buy_price.to_string(),
            gold_sell_price: t.gold_sell_price.to_string(),
            adjustment: t.adjustment.to_string(),
            total_grams: t.total_grams.to_string(),
            total_amount: t.total_amount.to_string(),
            remaining_stock: t.remaining_stock.to_string(),
            note: t.note,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
            payment: value.payment.map(PaymentResponse::from),
            product: None,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub(crate) fn string_to_direction(s: &str) -> Option<Direction> {
    match s {
        "BUY" => Some(Direction::Buy),
        "SELL" => Some(Direction::Sell),
        _ => None,
    }
}

pub(crate) const fn direction_to_string(direction: Direction) -> &'static str {
    match direction {
        Direction::Buy => "BUY",
        Direction::Sell => "SELL",
    }
}

fn transaction_error_response(e: &TransactionError) -> Response {
    match e {
        TransactionError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "transaction_not_found",
                "message": "Transaction not found"
            })),
        )
            .into_response(),
        TransactionError::ProductNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "product_not_found",
                "message": "Product not found"
            })),
        )
            .into_response(),
        TransactionError::Trade(TradeError::InsufficientStock {
            requested,
            available,
        }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "insufficient_stock",
                "message": format!("Requested {requested} but only {available} in stock")
            })),
        )
            .into_response(),
        TransactionError::Trade(trade_error) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_trade",
                "message": trade_error.to_string()
            })),
        )
            .into_response(),
        TransactionError::Counter(_) | TransactionError::Database(_) => {
            error!(error = %e, "Transaction operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/transactions` - List trades, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let direction = match query.direction.as_deref() {
        Some(raw) => match string_to_direction(raw) {
            Some(d) => Some(d),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_direction",
                        "message": "direction must be BUY or SELL"
                    })),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    let filter = TransactionFilter {
        product_id: query.product_id,
        direction,
    };

    match repo.list_transactions(filter).await {
        Ok(transactions) => {
            let items: Vec<TransactionResponse> = transactions
                .into_iter()
                .map(|transaction| {
                    TransactionResponse::from(TransactionWithPayment {
                        transaction,
                        payment: None,
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({ "transactions": items }))).into_response()
        }
        Err(e) => transaction_error_response(&e),
    }
}

/// POST `/transactions` - Record a trade.
async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let Some(direction) = string_to_direction(&payload.direction) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_direction",
                "message": "direction must be BUY or SELL"
            })),
        )
            .into_response();
    };

    let quantity = match parse_decimal("quantity", &payload.quantity) {
        Ok(d) => d,
        Err(response) => return response,
    };
    let gold_buy_price = match parse_decimal("goldBuyPrice", &payload.gold_buy_price) {
        Ok(d) => d,
        Err(response) => return response,
    };
    let gold_sell_price = match parse_decimal("goldSellPrice", &payload.gold_sell_price) {
        Ok(d) => d,
        Err(response) => return response,
    };
    let adjustment = match payload.adjustment.as_deref() {
        Some(raw) => match parse_decimal("adjustment", raw) {
            Ok(d) => d,
            Err(response) => return response,
        },
        None => Decimal::ZERO,
    };

    if let Err(errors) =
        validate_transaction(quantity, gold_buy_price, gold_sell_price, adjustment)
    {
        return validation_response(&errors);
    }

    let repo = TransactionRepository::new((*state.db).clone());
    match repo
        .create_transaction(CreateTransactionInput {
            product_id: payload.product_id,
            direction,
            quantity,
            gold_buy_price,
            gold_sell_price,
            adjustment,
            customer_id: payload.customer_id,
            note: payload.note,
        })
        .await
    {
        Ok(created) => {
            (StatusCode::CREATED, Json(TransactionResponse::from(created))).into_response()
        }
        Err(e) => transaction_error_response(&e),
    }
}

/// GET `/transactions/{id}` - Fetch a trade with its product and payment.
async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    let found = match repo.get_transaction(id).await {
        Ok(found) => found,
        Err(e) => return transaction_error_response(&e),
    };

    let product_repo = sarraf_db::repositories::ProductRepository::new((*state.db).clone());
    let product = match product_repo.get_product(found.transaction.product_id).await {
        Ok(product) => Some(ProductResponse::from(product)),
        Err(e) => {
            error!(error = %e, "Transaction detail lookup failed");
            None
        }
    };

    let mut response = TransactionResponse::from(found);
    response.product = product;
    (StatusCode::OK, Json(response)).into_response()
}

/// PATCH `/transactions/{id}` - Edit a trade.
async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    let quantity = match payload.quantity.as_deref() {
        Some(raw) => match parse_decimal("quantity", raw) {
            Ok(d) => Some(d),
            Err(response) => return response,
        },
        None => None,
    };
    let gold_buy_price = match payload.gold_buy_price.as_deref() {
        Some(raw) => match parse_decimal("goldBuyPrice", raw) {
            Ok(d) => Some(d),
            Err(response) => return response,
        },
        None => None,
    };
    let gold_sell_price = match payload.gold_sell_price.as_deref() {
        Some(raw) => match parse_decimal("goldSellPrice", raw) {
            Ok(d) => Some(d),
            Err(response) => return response,
        },
        None => None,
    };
    let adjustment = match payload.adjustment.as_deref() {
        Some(raw) => match parse_decimal("adjustment", raw) {
            Ok(d) => Some(d),
            Err(response) => return response,
        },
        None => None,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    match repo
        .update_transaction(
            id,
            UpdateTransactionInput {
                quantity,
                gold_buy_price,
                gold_sell_price,
                adjustment,
                note: payload.note,
            },
        )
        .await
    {
        Ok(updated) => (StatusCode::OK, Json(TransactionResponse::from(updated))).into_response(),
        Err(e) => transaction_error_response(&e),
    }
}

/// DELETE `/transactions/{id}` - Delete a trade, reversing its effects.
async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.delete_transaction(id).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(e) => transaction_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_round_trip() {
        for raw in ["BUY", "SELL"] {
            let direction = string_to_direction(raw).unwrap();
            assert_eq!(direction_to_string(direction), raw);
        }
        assert!(string_to_direction("ALIS").is_none());
    }
}
