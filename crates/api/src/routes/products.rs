//! Product catalog routes.

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
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use sarraf_core::trade::UnitKind;
use sarraf_core::validation::{validate_product, ValidationErrors};
use sarraf_db::repositories::{
    CreateProductInput, ProductError, ProductRepository, TransactionRepository,
    UpdateProductInput,
};

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products", post(create_product))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}", patch(update_product))
        .route("/products/{id}", delete(delete_product))
        .route("/products/{id}/recompute-stock", post(recompute_stock))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing products.
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    /// Name search term.
    pub search: Option<String>,
}

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Product name.
    pub name: String,
    /// "GRAM" or "PIECE".
    pub unit_kind: String,
    /// Grams per piece for piece-kind products.
    pub grams_per_piece: Option<String>,
    /// Purity applied when buying.
    pub buy_milyem: String,
    /// Purity applied when selling.
    pub sell_milyem: String,
}

/// Request body for updating a product.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    /// Product name.
    pub name: Option<String>,
    /// Grams per piece for piece-kind products.
    pub grams_per_piece: Option<Option<String>>,
    /// Purity applied when buying.
    pub buy_milyem: Option<String>,
    /// Purity applied when selling.
    pub sell_milyem: Option<String>,
}

/// Response for a product.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    /// Product ID.
    pub id: Uuid,
    /// Generated code.
    pub code: String,
    /// Product name.
    pub name: String,
    /// "GRAM" or "PIECE".
    pub unit_kind: String,
    /// Grams per piece for piece-kind products.
    pub grams_per_piece: Option<String>,
    /// Purity applied when buying.
    pub buy_milyem: String,
    /// Purity applied when selling.
    pub sell_milyem: String,
    /// Last reference gold buy price.
    pub gold_buy_price: Option<String>,
    /// Last reference gold sell price.
    pub gold_sell_price: Option<String>,
    /// Stock snapshot in the product's own unit.
    pub current_stock: String,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<sarraf_db::entities::products::Model> for ProductResponse {
    fn from(p: sarraf_db::entities::products::Model) -> Self {
        Self {
            id: p.id,
            code: p.code,
            name: p.name,
            unit_kind: unit_kind_to_string(p.unit_kind.into()).to_string(),
            grams_per_piece: p.grams_per_piece.map(|d| d.to_string()),
            buy_milyem: p.buy_milyem.to_string(),
            sell_milyem: p.sell_milyem.to_string(),
            gold_buy_price: p.gold_buy_price.map(|d| d.to_string()),
            gold_sell_price: p.gold_sell_price.map(|d| d.to_string()),
            current_stock: p.current_stock.to_string(),
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub(crate) fn string_to_unit_kind(s: &str) -> Option<UnitKind> {
    match s {
        "GRAM" => Some(UnitKind::Gram),
        "PIECE" => Some(UnitKind::Piece),
        _ => None,
    }
}

pub(crate) const fn unit_kind_to_string(kind: UnitKind) -> &'static str {
    match kind {
        UnitKind::Gram => "GRAM",
        UnitKind::Piece => "PIECE",
    }
}

/// Parses a decimal request field, reporting a field-keyed 400 on failure.
pub(crate) fn parse_decimal(field: &'static str, raw: &str) -> Result<Decimal, Response> {
    Decimal::from_str(raw).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "errors": { field: "must be a decimal number" }
            })),
        )
            .into_response()
    })
}

/// Converts aggregated validation failures into a 400 response.
pub(crate) fn validation_response(errors: &ValidationErrors) -> Response {
    let map: serde_json::Map<String, serde_json::Value> = errors
        .errors
        .iter()
        .map(|e| (e.field.to_string(), json!(e.message)))
        .collect();
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "validation_failed", "errors": map })),
    )
        .into_response()
}

fn product_error_response(e: &ProductError) -> Response {
    match e {
        ProductError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "product_not_found",
                "message": "Product not found"
            })),
        )
            .into_response(),
        ProductError::HasTransactions(_) | ProductError::HasConsignments(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "product_in_use",
                "message": e.to_string()
            })),
        )
            .into_response(),
        ProductError::Counter(_) | ProductError::Database(_) => {
            error!(error = %e, "Product operation failed");
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

/// GET `/products` - List products.
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.list_products(query.search.as_deref()).await {
        Ok(products) => {
            let items: Vec<ProductResponse> =
                products.into_iter().map(ProductResponse::from).collect();
            (StatusCode::OK, Json(json!({ "products": items }))).into_response()
        }
        Err(e) => product_error_response(&e),
    }
}

/// POST `/products` - Create a product.
async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> impl IntoResponse {
    let Some(unit_kind) = string_to_unit_kind(&payload.unit_kind) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_unit_kind",
                "message": "unit_kind must be GRAM or PIECE"
            })),
        )
            .into_response();
    };

    let buy_milyem = match parse_decimal("buyMilyem", &payload.buy_milyem) {
        Ok(d) => d,
        Err(response) => return response,
    };
    let sell_milyem = match parse_decimal("sellMilyem", &payload.sell_milyem) {
        Ok(d) => d,
        Err(response) => return response,
    };
    let grams_per_piece = match payload.grams_per_piece.as_deref() {
        Some(raw) => match parse_decimal("gramsPerPiece", raw) {
            Ok(d) => Some(d),
            Err(response) => return response,
        },
        None => None,
    };

    if let Err(errors) = validate_product(
        &payload.name,
        buy_milyem,
        sell_milyem,
        unit_kind,
        grams_per_piece,
    ) {
        return validation_response(&errors);
    }

    let repo = ProductRepository::new((*state.db).clone());
    match repo
        .create_product(CreateProductInput {
            name: payload.name.trim().to_string(),
            unit_kind,
            grams_per_piece,
            buy_milyem,
            sell_milyem,
        })
        .await
    {
        Ok(product) => {
            (StatusCode::CREATED, Json(ProductResponse::from(product))).into_response()
        }
        Err(e) => product_error_response(&e),
    }
}

/// GET `/products/{id}` - Fetch a product.
async fn get_product(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.get_product(id).await {
        Ok(product) => (StatusCode::OK, Json(ProductResponse::from(product))).into_response(),
        Err(e) => product_error_response(&e),
    }
}

/// PATCH `/products/{id}` - Update a product.
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    let current = match repo.get_product(id).await {
        Ok(p) => p,
        Err(e) => return product_error_response(&e),
    };

    let buy_milyem = match payload.buy_milyem.as_deref() {
        Some(raw) => match parse_decimal("buyMilyem", raw) {
            Ok(d) => Some(d),
            Err(response) => return response,
        },
        None => None,
    };
    let sell_milyem = match payload.sell_milyem.as_deref() {
        Some(raw) => match parse_decimal("sellMilyem", raw) {
            Ok(d) => Some(d),
            Err(response) => return response,
        },
        None => None,
    };
    let grams_per_piece = match &payload.grams_per_piece {
        Some(Some(raw)) => match parse_decimal("gramsPerPiece", raw) {
            Ok(d) => Some(Some(d)),
            Err(response) => return response,
        },
        Some(None) => Some(None),
        None => None,
    };

    // Validate the would-be state of the product.
    if let Err(errors) = validate_product(
        payload.name.as_deref().unwrap_or(&current.name),
        buy_milyem.unwrap_or(current.buy_milyem),
        sell_milyem.unwrap_or(current.sell_milyem),
        current.unit_kind.into(),
        grams_per_piece.unwrap_or(current.grams_per_piece),
    ) {
        return validation_response(&errors);
    }

    match repo
        .update_product(
            id,
            UpdateProductInput {
                name: payload.name.map(|n| n.trim().to_string()),
                grams_per_piece,
                buy_milyem,
                sell_milyem,
            },
        )
        .await
    {
        Ok(product) => (StatusCode::OK, Json(ProductResponse::from(product))).into_response(),
        Err(e) => product_error_response(&e),
    }
}

/// DELETE `/products/{id}` - Delete an unreferenced product.
async fn delete_product(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.delete_product(id).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(e) => product_error_response(&e),
    }
}

/// POST `/products/{id}/recompute-stock` - Replay the history and repair
/// stale stock snapshots.
async fn recompute_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.recompute_snapshots(id).await {
        Ok(corrected) => (StatusCode::OK, Json(json!({ "corrected": corrected }))).into_response(),
        Err(sarraf_db::repositories::TransactionError::ProductNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "product_not_found",
                "message": "Product not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Snapshot recompute failed");
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

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unit_kind_round_trip() {
        for raw in ["GRAM", "PIECE"] {
            let kind = string_to_unit_kind(raw).unwrap();
            assert_eq!(unit_kind_to_string(kind), raw);
        }
        assert!(string_to_unit_kind("ADET").is_none());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("quantity", "12.5").unwrap(), dec!(12.5));
        assert!(parse_decimal("quantity", "twelve").is_err());
    }
}
