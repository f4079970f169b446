//! Consignment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::routes::products::parse_decimal;
use sarraf_core::consignment::{ConsignmentDirection, ConsignmentStatus, CurrencyCode};
use sarraf_db::repositories::{
    ConsignmentFilter, ConsignmentItemInput, ConsignmentRepoError, ConsignmentRepository,
    CreateConsignmentInput, UpdateConsignmentInput,
};

/// Creates the consignment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/consignments", get(list_consignments))
        .route("/consignments", post(create_consignment))
        .route("/consignments/{id}", get(get_consignment))
        .route("/consignments/{id}", patch(update_consignment))
        .route("/consignments/{id}", delete(delete_consignment))
        .route("/consignments/{id}/return", post(mark_returned))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing consignments.
#[derive(Debug, Deserialize)]
pub struct ListConsignmentsQuery {
    /// Filter by customer.
    pub customer_id: Option<Uuid>,
    /// Filter by status ("ACTIVE" or "RETURNED").
    pub status: Option<String>,
}

/// Request body for creating a consignment.
#[derive(Debug, Deserialize)]
pub struct CreateConsignmentRequest {
    /// Owning customer.
    pub customer_id: Uuid,
    /// "GIVE" or "RECEIVE".
    pub direction: String,
    /// "PRODUCT" or "CURRENCY".
    pub item_kind: String,
    /// The consigned product (PRODUCT kind).
    pub product_id: Option<Uuid>,
    /// Quantity in the product's own unit (PRODUCT kind).
    pub quantity: Option<String>,
    /// Purity of the consigned goods (PRODUCT kind).
    pub milyem: Option<String>,
    /// Currency of the consigned amount (CURRENCY kind).
    pub currency: Option<String>,
    /// Consigned amount (CURRENCY kind).
    pub amount: Option<String>,
    /// Reference buy price at consignment time.
    pub currency_buy_price: Option<String>,
    /// Reference sell price at consignment time.
    pub currency_sell_price: Option<String>,
    /// When the goods changed hands (RFC 3339).
    pub delivered_at: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
}

/// Request body for updating a consignment.
#[derive(Debug, Deserialize)]
pub struct UpdateConsignmentRequest {
    /// Quantity in the product's own unit.
    pub quantity: Option<String>,
    /// Purity of the consigned goods.
    pub milyem: Option<String>,
    /// Consigned currency amount.
    pub amount: Option<String>,
    /// Reference buy price.
    pub currency_buy_price: Option<Option<String>>,
    /// Reference sell price.
    pub currency_sell_price: Option<Option<String>>,
    /// When the goods changed hands (RFC 3339).
    pub delivered_at: Option<Option<String>>,
    /// Free-form note.
    pub note: Option<Option<String>>,
}

/// Response for a consignment.
#[derive(Debug, Serialize)]
pub struct ConsignmentResponse {
    /// Consignment ID.
    pub id: Uuid,
    /// Generated code.
    pub code: String,
    /// Owning customer.
    pub customer_id: Uuid,
    /// "GIVE" or "RECEIVE".
    pub direction: String,
    /// "PRODUCT" or "CURRENCY".
    pub item_kind: String,
    /// The consigned product.
    pub product_id: Option<Uuid>,
    /// Quantity in the product's own unit.
    pub quantity: Option<String>,
    /// Purity of the consigned goods.
    pub milyem: Option<String>,
    /// Currency of the consigned amount.
    pub currency: Option<String>,
    /// Consigned amount.
    pub amount: Option<String>,
    /// Signed delta currently applied to the customer balance.
    pub balance_delta: String,
    /// "ACTIVE" or "RETURNED".
    pub status: String,
    /// When the goods changed hands.
    pub delivered_at: Option<String>,
    /// When the consignment was closed.
    pub returned_at: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<sarraf_db::entities::consignments::Model> for ConsignmentResponse {
    fn from(c: sarraf_db::entities::consignments::Model) -> Self {
        use sarraf_db::entities::sea_orm_active_enums as dbenums;

        Self {
            id: c.id,
            code: c.code,
            customer_id: c.customer_id,
            direction: match c.direction {
                dbenums::ConsignmentDirection::Give => "GIVE".to_string(),
                dbenums::ConsignmentDirection::Receive => "RECEIVE".to_string(),
            },
            item_kind: match c.item_kind {
                dbenums::ConsignmentItemKind::Product => "PRODUCT".to_string(),
                dbenums::ConsignmentItemKind::Currency => "CURRENCY".to_string(),
            },
            product_id: c.product_id,
            quantity: c.quantity.map(|d| d.to_string()),
            milyem: c.milyem.map(|d| d.to_string()),
            currency: c.currency.map(|code| CurrencyCode::from(code).to_string()),
            amount: c.amount.map(|d| d.to_string()),
            balance_delta: c.balance_delta.to_string(),
            status: match c.status {
                dbenums::ConsignmentStatus::Active => "ACTIVE".to_string(),
                dbenums::ConsignmentStatus::Returned => "RETURNED".to_string(),
            },
            delivered_at: c.delivered_at.map(|t| t.to_rfc3339()),
            returned_at: c.returned_at.map(|t| t.to_rfc3339()),
            note: c.note,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn string_to_consignment_direction(s: &str) -> Option<ConsignmentDirection> {
    match s {
        "GIVE" => Some(ConsignmentDirection::Give),
        "RECEIVE" => Some(ConsignmentDirection::Receive),
        _ => None,
    }
}

fn parse_timestamp(
    field: &'static str,
    raw: &str,
) -> Result<chrono::DateTime<chrono::FixedOffset>, Response> {
    chrono::DateTime::parse_from_rfc3339(raw).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_timestamp",
                "errors": { field: "must be an RFC 3339 timestamp" }
            })),
        )
            .into_response()
    })
}

fn missing_field(field: &'static str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "validation_failed",
            "errors": { field: "is required for this item kind" }
        })),
    )
        .into_response()
}

fn consignment_error_response(e: &ConsignmentRepoError) -> Response {
    match e {
        ConsignmentRepoError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "consignment_not_found",
                "message": "Consignment not found"
            })),
        )
            .into_response(),
        ConsignmentRepoError::CustomerNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "customer_not_found",
                "message": "Customer not found"
            })),
        )
            .into_response(),
        ConsignmentRepoError::ProductNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "product_not_found",
                "message": "Product not found"
            })),
        )
            .into_response(),
        ConsignmentRepoError::AlreadyReturned(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "consignment_returned",
                "message": "Consignment has been returned and can no longer be edited"
            })),
        )
            .into_response(),
        ConsignmentRepoError::Consignment(inner) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_consignment",
                "message": inner.to_string()
            })),
        )
            .into_response(),
        ConsignmentRepoError::Counter(_) | ConsignmentRepoError::Database(_) => {
            error!(error = %e, "Consignment operation failed");
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

/// GET `/consignments` - List consignments, newest first.
async fn list_consignments(
    State(state): State<AppState>,
    Query(query): Query<ListConsignmentsQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        Some("ACTIVE") => Some(ConsignmentStatus::Active),
        Some("RETURNED") => Some(ConsignmentStatus::Returned),
        Some(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_status",
                    "message": "status must be ACTIVE or RETURNED"
                })),
            )
                .into_response();
        }
        None => None,
    };

    let repo = ConsignmentRepository::new((*state.db).clone());
    let filter = ConsignmentFilter {
        customer_id: query.customer_id,
        status,
    };

    match repo.list_consignments(filter).await {
        Ok(consignments) => {
            let items: Vec<ConsignmentResponse> = consignments
                .into_iter()
                .map(ConsignmentResponse::from)
                .collect();
            (StatusCode::OK, Json(json!({ "consignments": items }))).into_response()
        }
        Err(e) => consignment_error_response(&e),
    }
}

/// POST `/consignments` - Record a consignment.
async fn create_consignment(
    State(state): State<AppState>,
    Json(payload): Json<CreateConsignmentRequest>,
) -> impl IntoResponse {
    let Some(direction) = string_to_consignment_direction(&payload.direction) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_direction",
                "message": "direction must be GIVE or RECEIVE"
            })),
        )
            .into_response();
    };

    let item = match payload.item_kind.as_str() {
        "PRODUCT" => {
            let Some(product_id) = payload.product_id else {
                return missing_field("productId");
            };
            let Some(quantity_raw) = payload.quantity.as_deref() else {
                return missing_field("quantity");
            };
            let Some(milyem_raw) = payload.milyem.as_deref() else {
                return missing_field("milyem");
            };
            let quantity = match parse_decimal("quantity", quantity_raw) {
                Ok(d) => d,
                Err(response) => return response,
            };
            let milyem = match parse_decimal("milyem", milyem_raw) {
                Ok(d) => d,
                Err(response) => return response,
            };
            ConsignmentItemInput::Product {
                product_id,
                quantity,
                milyem,
            }
        }
        "CURRENCY" => {
            let Some(currency_raw) = payload.currency.as_deref() else {
                return missing_field("currency");
            };
            let Some(amount_raw) = payload.amount.as_deref() else {
                return missing_field("amount");
            };
            let Ok(currency) = CurrencyCode::from_str(currency_raw) else {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_currency",
                        "message": "currency must be TRY, USD, or EUR"
                    })),
                )
                    .into_response();
            };
            let amount = match parse_decimal("amount", amount_raw) {
                Ok(d) => d,
                Err(response) => return response,
            };
            let buy_price = match payload.currency_buy_price.as_deref() {
                Some(raw) => match parse_decimal("currencyBuyPrice", raw) {
                    Ok(d) => Some(d),
                    Err(response) => return response,
                },
                None => None,
            };
            let sell_price = match payload.currency_sell_price.as_deref() {
                Some(raw) => match parse_decimal("currencySellPrice", raw) {
                    Ok(d) => Some(d),
                    Err(response) => return response,
                },
                None => None,
            };
            ConsignmentItemInput::Currency {
                currency,
                amount,
                buy_price,
                sell_price,
            }
        }
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_item_kind",
                    "message": "item_kind must be PRODUCT or CURRENCY"
                })),
            )
                .into_response();
        }
    };

    let delivered_at = match payload.delivered_at.as_deref() {
        Some(raw) => match parse_timestamp("deliveredAt", raw) {
            Ok(t) => Some(t),
            Err(response) => return response,
        },
        None => None,
    };

    let repo = ConsignmentRepository::new((*state.db).clone());
    match repo
        .create_consignment(CreateConsignmentInput {
            customer_id: payload.customer_id,
            direction,
            item,
            delivered_at,
            note: payload.note,
        })
        .await
    {
        Ok(consignment) => {
            (StatusCode::CREATED, Json(ConsignmentResponse::from(consignment))).into_response()
        }
        Err(e) => consignment_error_response(&e),
    }
}

/// GET `/consignments/{id}` - Fetch a consignment.
async fn get_consignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ConsignmentRepository::new((*state.db).clone());

    match repo.get_consignment(id).await {
        Ok(consignment) => {
            (StatusCode::OK, Json(ConsignmentResponse::from(consignment))).into_response()
        }
        Err(e) => consignment_error_response(&e),
    }
}

/// PATCH `/consignments/{id}` - Edit an active consignment.
async fn update_consignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateConsignmentRequest>,
) -> impl IntoResponse {
    let quantity = match payload.quantity.as_deref() {
        Some(raw) => match parse_decimal("quantity", raw) {
            Ok(d) => Some(d),
            Err(response) => return response,
        },
        None => None,
    };
    let milyem = match payload.milyem.as_deref() {
        Some(raw) => match parse_decimal("milyem", raw) {
            Ok(d) => Some(d),
            Err(response) => return response,
        },
        None => None,
    };
    let amount = match payload.amount.as_deref() {
        Some(raw) => match parse_decimal("amount", raw) {
            Ok(d) => Some(d),
            Err(response) => return response,
        },
        None => None,
    };
    let currency_buy_price = match &payload.currency_buy_price {
        Some(Some(raw)) => match parse_decimal("currencyBuyPrice", raw) {
            Ok(d) => Some(Some(d)),
            Err(response) => return response,
        },
        Some(None) => Some(None),
        None => None,
    };
    let currency_sell_price = match &payload.currency_sell_price {
        Some(Some(raw)) => match parse_decimal("currencySellPrice", raw) {
            Ok(d) => Some(Some(d)),
            Err(response) => return response,
        },
        Some(None) => Some(None),
        None => None,
    };
    let delivered_at = match &payload.delivered_at {
        Some(Some(raw)) => match parse_timestamp("deliveredAt", raw) {
            Ok(t) => Some(Some(t)),
            Err(response) => return response,
        },
        Some(None) => Some(None),
        None => None,
    };

    let repo = ConsignmentRepository::new((*state.db).clone());
    match repo
        .update_consignment(
            id,
            UpdateConsignmentInput {
                quantity,
                milyem,
                amount,
                currency_buy_price,
                currency_sell_price,
                delivered_at,
                note: payload.note,
            },
        )
        .await
    {
        Ok(consignment) => {
            (StatusCode::OK, Json(ConsignmentResponse::from(consignment))).into_response()
        }
        Err(e) => consignment_error_response(&e),
    }
}

/// POST `/consignments/{id}/return` - Close a consignment and reverse its
/// balance delta.
async fn mark_returned(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ConsignmentRepository::new((*state.db).clone());

    match repo.mark_returned(id).await {
        Ok(consignment) => {
            (StatusCode::OK, Json(ConsignmentResponse::from(consignment))).into_response()
        }
        Err(e) => consignment_error_response(&e),
    }
}

/// DELETE `/consignments/{id}` - Delete a consignment, reversing whatever
/// balance delta it still has applied.
async fn delete_consignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ConsignmentRepository::new((*state.db).clone());

    match repo.delete_consignment(id).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(e) => consignment_error_response(&e),
    }
}
