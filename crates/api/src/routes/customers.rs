//! Customer routes.

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
use sarraf_core::consignment::CurrencyCode;
use sarraf_core::validation::validate_customer;
use sarraf_db::repositories::{
    ConsignmentFilter, ConsignmentRepository, CreateCustomerInput, CustomerError,
    CustomerRepository, PaymentFilter, PaymentRepository, UpdateCustomerInput,
};

use crate::routes::consignments::ConsignmentResponse;
use crate::routes::payments::PaymentResponse;
use crate::routes::products::validation_response;

/// How many recent consignments and payments a customer detail carries.
const RECENT_LIMIT: usize = 20;

/// Creates the customer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers))
        .route("/customers", post(create_customer))
        .route("/customers/{id}", get(get_customer))
        .route("/customers/{id}", patch(update_customer))
        .route("/customers/{id}", delete(delete_customer))
        .route("/customers/{id}/favorite", post(set_favorite))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing customers.
#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    /// Name search term.
    pub search: Option<String>,
}

/// Request body for creating a customer.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    /// Customer name.
    pub name: String,
    /// Mobile phone number.
    pub phone: String,
    /// Optional national identity number.
    pub national_id: Option<String>,
    /// Balance denomination ("TRY", "USD", "EUR"); absent for gram balances.
    pub balance_currency: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
}

/// Request body for updating a customer.
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    /// Customer name.
    pub name: Option<String>,
    /// Mobile phone number.
    pub phone: Option<String>,
    /// Optional national identity number.
    pub national_id: Option<Option<String>>,
    /// Balance denomination.
    pub balance_currency: Option<Option<String>>,
    /// Free-form note.
    pub note: Option<Option<String>>,
}

/// Request body for the favorite flag.
#[derive(Debug, Deserialize)]
pub struct SetFavoriteRequest {
    /// Desired flag value.
    pub is_favorite: bool,
}

/// Response for a customer.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    /// Customer ID.
    pub id: Uuid,
    /// Generated code.
    pub code: String,
    /// Customer name.
    pub name: String,
    /// Mobile phone number.
    pub phone: String,
    /// National identity number.
    pub national_id: Option<String>,
    /// Running balance.
    pub balance: String,
    /// Balance denomination; absent means gram-equivalents.
    pub balance_currency: Option<String>,
    /// Favorite flag.
    pub is_favorite: bool,
    /// Free-form note.
    pub note: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

/// Response for a customer with their recent activity.
#[derive(Debug, Serialize)]
pub struct CustomerDetailResponse {
    /// The customer.
    #[serde(flatten)]
    pub customer: CustomerResponse,
    /// Most recent consignments, newest first.
    pub consignments: Vec<ConsignmentResponse>,
    /// Most recent payments, newest first.
    pub payments: Vec<PaymentResponse>,
}

impl From<sarraf_db::entities::customers::Model> for CustomerResponse {
    fn from(c: sarraf_db::entities::customers::Model) -> Self {
        Self {
            id: c.id,
            code: c.code,
            name: c.name,
            phone: c.phone,
            national_id: c.national_id,
            balance: c.balance.to_string(),
            balance_currency: c
                .balance_currency
                .map(|code| CurrencyCode::from(code).to_string()),
            is_favorite: c.is_favorite,
            note: c.note,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_currency(raw: &str) -> Result<CurrencyCode, Response> {
    CurrencyCode::from_str(raw).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_currency",
                "message": "balance_currency must be TRY, USD, or EUR"
            })),
        )
            .into_response()
    })
}

fn customer_error_response(e: &CustomerError) -> Response {
    match e {
        CustomerError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "customer_not_found",
                "message": "Customer not found"
            })),
        )
            .into_response(),
        CustomerError::HasConsignments(_) | CustomerError::HasPayments(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "customer_in_use",
                "message": e.to_string()
            })),
        )
            .into_response(),
        CustomerError::Counter(_) | CustomerError::Database(_) => {
            error!(error = %e, "Customer operation failed");
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

/// GET `/customers` - List customers, favorites first.
async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListCustomersQuery>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    match repo.list_customers(query.search.as_deref()).await {
        Ok(customers) => {
            let items: Vec<CustomerResponse> =
                customers.into_iter().map(CustomerResponse::from).collect();
            (StatusCode::OK, Json(json!({ "customers": items }))).into_response()
        }
        Err(e) => customer_error_response(&e),
    }
}

/// POST `/customers` - Create a customer.
async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> impl IntoResponse {
    if let Err(errors) = validate_customer(
        &payload.name,
        &payload.phone,
        payload.national_id.as_deref(),
    ) {
        return validation_response(&errors);
    }

    let balance_currency = match payload.balance_currency.as_deref() {
        Some(raw) => match parse_currency(raw) {
            Ok(code) => Some(code),
            Err(response) => return response,
        },
        None => None,
    };

    let repo = CustomerRepository::new((*state.db).clone());
    match repo
        .create_customer(CreateCustomerInput {
            name: payload.name.trim().to_string(),
            phone: payload.phone,
            national_id: payload.national_id.filter(|id| !id.trim().is_empty()),
            balance_currency,
            note: payload.note,
        })
        .await
    {
        Ok(customer) => {
            (StatusCode::CREATED, Json(CustomerResponse::from(customer))).into_response()
        }
        Err(e) => customer_error_response(&e),
    }
}

/// GET `/customers/{id}` - Fetch a customer with their recent consignments
/// and payments.
async fn get_customer(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    let customer = match repo.get_customer(id).await {
        Ok(customer) => customer,
        Err(e) => return customer_error_response(&e),
    };

    let consignment_repo = ConsignmentRepository::new((*state.db).clone());
    let consignments = match consignment_repo
        .list_consignments(ConsignmentFilter {
            customer_id: Some(id),
            status: None,
        })
        .await
    {
        Ok(items) => items,
        Err(e) => {
            error!(error = %e, "Customer detail lookup failed");
            return internal_error_response();
        }
    };

    let payment_repo = PaymentRepository::new((*state.db).clone());
    let payments = match payment_repo
        .list_payments(PaymentFilter {
            customer_id: Some(id),
            status: None,
        })
        .await
    {
        Ok(items) => items,
        Err(e) => {
            error!(error = %e, "Customer detail lookup failed");
            return internal_error_response();
        }
    };

    let detail = CustomerDetailResponse {
        customer: CustomerResponse::from(customer),
        consignments: consignments
            .into_iter()
            .take(RECENT_LIMIT)
            .map(ConsignmentResponse::from)
            .collect(),
        payments: payments
            .into_iter()
            .take(RECENT_LIMIT)
            .map(PaymentResponse::from)
            .collect(),
    };
    (StatusCode::OK, Json(detail)).into_response()
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}

/// PATCH `/customers/{id}` - Update a customer.
async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    let current = match repo.get_customer(id).await {
        Ok(c) => c,
        Err(e) => return customer_error_response(&e),
    };

    // Validate the would-be state of the customer.
    let next_national_id = match &payload.national_id {
        Some(value) => value.clone(),
        None => current.national_id.clone(),
    };
    if let Err(errors) = validate_customer(
        payload.name.as_deref().unwrap_or(&current.name),
        payload.phone.as_deref().unwrap_or(&current.phone),
        next_national_id.as_deref(),
    ) {
        return validation_response(&errors);
    }

    let balance_currency = match &payload.balance_currency {
        Some(Some(raw)) => match parse_currency(raw) {
            Ok(code) => Some(Some(code)),
            Err(response) => return response,
        },
        Some(None) => Some(None),
        None => None,
    };

    match repo
        .update_customer(
            id,
            UpdateCustomerInput {
                name: payload.name.map(|n| n.trim().to_string()),
                phone: payload.phone,
                national_id: payload.national_id,
                balance_currency,
                note: payload.note,
            },
        )
        .await
    {
        Ok(customer) => (StatusCode::OK, Json(CustomerResponse::from(customer))).into_response(),
        Err(e) => customer_error_response(&e),
    }
}

/// POST `/customers/{id}/favorite` - Set or clear the favorite flag.
async fn set_favorite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetFavoriteRequest>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    match repo.set_favorite(id, payload.is_favorite).await {
        Ok(customer) => (StatusCode::OK, Json(CustomerResponse::from(customer))).into_response(),
        Err(e) => customer_error_response(&e),
    }
}

/// DELETE `/customers/{id}` - Delete an unreferenced customer.
async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    match repo.delete_customer(id).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(e) => customer_error_response(&e),
    }
}
