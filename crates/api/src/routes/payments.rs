//! Payment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::routes::products::{parse_decimal, validation_response};
use sarraf_core::payment::{PaymentError, PaymentKind, PaymentMethod, PaymentStatus};
use sarraf_core::validation::validate_payment;
use sarraf_db::repositories::{
    ApplyPaymentInput, CreatePaymentInput, PaymentFilter, PaymentRepoError, PaymentRepository,
    PaymentWithDetails,
};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments))
        .route("/payments", post(create_payment))
        .route("/payments/{id}", get(get_payment))
        .route("/payments/{id}", delete(delete_payment))
        .route("/payments/{id}/apply", post(apply_payment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing payments.
#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    /// Filter by customer.
    pub customer_id: Option<Uuid>,
    /// Filter by status ("PENDING", "PARTIAL", "COMPLETED").
    pub status: Option<String>,
}

/// Request body for creating a free-standing payment.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Customer the payment belongs to, if any.
    pub customer_id: Option<Uuid>,
    /// "PAYABLE" or "RECEIVABLE".
    pub kind: String,
    /// Total amount owed.
    pub total_amount: String,
    /// Free-form note.
    pub note: Option<String>,
}

/// Request body for applying an amount against a payment.
#[derive(Debug, Deserialize)]
pub struct ApplyPaymentRequest {
    /// Amount to apply.
    pub amount: String,
    /// "CASH", "BANK_TRANSFER", or "CREDIT_CARD".
    pub method: String,
    /// Bank name for bank transfers.
    pub bank_name: Option<String>,
    /// Account holder for bank transfers.
    pub account_holder: Option<String>,
    /// External reference, e.g. a transfer query number.
    pub reference: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
}

/// Response for a payment aggregate.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// Payment ID.
    pub id: Uuid,
    /// Linked trade, if this payment tracks one.
    pub product_transaction_id: Option<Uuid>,
    /// Customer the payment belongs to.
    pub customer_id: Option<Uuid>,
    /// "PAYABLE" or "RECEIVABLE".
    pub kind: String,
    /// Total amount owed.
    pub total_amount: String,
    /// Cumulative amount applied.
    pub paid_amount: String,
    /// Amount still outstanding.
    pub remaining_amount: String,
    /// "PENDING", "PARTIAL", or "COMPLETED".
    pub status: String,
    /// Free-form note.
    pub note: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<sarraf_db::entities::payments::Model> for PaymentResponse {
    fn from(p: sarraf_db::entities::payments::Model) -> Self {
        Self {
            id: p.id,
            product_transaction_id: p.product_transaction_id,
            customer_id: p.customer_id,
            kind: kind_to_string(p.kind.into()).to_string(),
            total_amount: p.total_amount.to_string(),
            paid_amount: p.paid_amount.to_string(),
            remaining_amount: p.remaining_amount.to_string(),
            status: status_to_string(p.status.into()).to_string(),
            note: p.note,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

/// Response for one payment application.
#[derive(Debug, Serialize)]
pub struct PaymentDetailResponse {
    /// Detail ID.
    pub id: Uuid,
    /// Applied amount.
    pub amount: String,
    /// "CASH", "BANK_TRANSFER", or "CREDIT_CARD".
    pub method: String,
    /// Bank name for bank transfers.
    pub bank_name: Option<String>,
    /// Account holder for bank transfers.
    pub account_holder: Option<String>,
    /// External reference.
    pub reference: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<sarraf_db::entities::payment_details::Model> for PaymentDetailResponse {
    fn from(d: sarraf_db::entities::payment_details::Model) -> Self {
        Self {
            id: d.id,
            amount: d.amount.to_string(),
            method: method_to_string(d.method.into()).to_string(),
            bank_name: d.bank_name,
            account_holder: d.account_holder,
            reference: d.reference,
            note: d.note,
            created_at: d.created_at.to_rfc3339(),
        }
    }
}

/// Response for a payment with its application history.
#[derive(Debug, Serialize)]
pub struct PaymentWithDetailsResponse {
    /// The aggregate.
    #[serde(flatten)]
    pub payment: PaymentResponse,
    /// Applications in chronological order.
    pub details: Vec<PaymentDetailResponse>,
}

impl From<PaymentWithDetails> for PaymentWithDetailsResponse {
    fn from(value: PaymentWithDetails) -> Self {
        Self {
            payment: PaymentResponse::from(value.payment),
            details: value
                .details
                .into_iter()
                .map(PaymentDetailResponse::from)
                .collect(),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub(crate) const fn kind_to_string(kind: PaymentKind) -> &'static str {
    match kind {
        PaymentKind::Payable => "PAYABLE",
        PaymentKind::Receivable => "RECEIVABLE",
    }
}

pub(crate) const fn status_to_string(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "PENDING",
        PaymentStatus::Partial => "PARTIAL",
        PaymentStatus::Completed => "COMPLETED",
    }
}

pub(crate) const fn method_to_string(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cash => "CASH",
        PaymentMethod::BankTransfer => "BANK_TRANSFER",
        PaymentMethod::CreditCard => "CREDIT_CARD",
    }
}

fn string_to_method(s: &str) -> Option<PaymentMethod> {
    match s {
        "CASH" => Some(PaymentMethod::Cash),
        "BANK_TRANSFER" => Some(PaymentMethod::BankTransfer),
        "CREDIT_CARD" => Some(PaymentMethod::CreditCard),
        _ => None,
    }
}

fn payment_error_response(e: &PaymentRepoError) -> Response {
    match e {
        PaymentRepoError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "payment_not_found",
                "message": "Payment not found"
            })),
        )
            .into_response(),
        PaymentRepoError::LinkedToTransaction(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "payment_linked",
                "message": "Payment is linked to a transaction; delete the transaction instead"
            })),
        )
            .into_response(),
        PaymentRepoError::Payment(inner @ PaymentError::Overpayment { .. }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "overpayment",
                "message": inner.to_string()
            })),
        )
            .into_response(),
        PaymentRepoError::Payment(inner) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_payment",
                "message": inner.to_string()
            })),
        )
            .into_response(),
        PaymentRepoError::Database(_) => {
            error!(error = %e, "Payment operation failed");
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

/// GET `/payments` - List payment aggregates, newest first.
async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        Some("PENDING") => Some(PaymentStatus::Pending),
        Some("PARTIAL") => Some(PaymentStatus::Partial),
        Some("COMPLETED") => Some(PaymentStatus::Completed),
        Some(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_status",
                    "message": "status must be PENDING, PARTIAL, or COMPLETED"
                })),
            )
                .into_response();
        }
        None => None,
    };

    let repo = PaymentRepository::new((*state.db).clone());
    let filter = PaymentFilter {
        customer_id: query.customer_id,
        status,
    };

    match repo.list_payments(filter).await {
        Ok(payments) => {
            let items: Vec<PaymentResponse> =
                payments.into_iter().map(PaymentResponse::from).collect();
            (StatusCode::OK, Json(json!({ "payments": items }))).into_response()
        }
        Err(e) => payment_error_response(&e),
    }
}

/// POST `/payments` - Open a free-standing payment.
async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    let kind = match payload.kind.as_str() {
        "PAYABLE" => PaymentKind::Payable,
        "RECEIVABLE" => PaymentKind::Receivable,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_kind",
                    "message": "kind must be PAYABLE or RECEIVABLE"
                })),
            )
                .into_response();
        }
    };

    let total_amount = match parse_decimal("totalAmount", &payload.total_amount) {
        Ok(d) => d,
        Err(response) => return response,
    };
    if total_amount < rust_decimal::Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_failed",
                "errors": { "totalAmount": "must not be negative" }
            })),
        )
            .into_response();
    }

    let repo = PaymentRepository::new((*state.db).clone());
    match repo
        .create_payment(CreatePaymentInput {
            product_transaction_id: None,
            customer_id: payload.customer_id,
            kind,
            total_amount,
            note: payload.note,
        })
        .await
    {
        Ok(payment) => (StatusCode::CREATED, Json(PaymentResponse::from(payment))).into_response(),
        Err(e) => payment_error_response(&e),
    }
}

/// GET `/payments/{id}` - Fetch a payment with its application history.
async fn get_payment(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());

    match repo.get_payment(id).await {
        Ok(found) => (
            StatusCode::OK,
            Json(PaymentWithDetailsResponse::from(found)),
        )
            .into_response(),
        Err(e) => payment_error_response(&e),
    }
}

/// POST `/payments/{id}/apply` - Apply one amount against a payment.
async fn apply_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplyPaymentRequest>,
) -> impl IntoResponse {
    let Some(method) = string_to_method(&payload.method) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_method",
                "message": "method must be CASH, BANK_TRANSFER, or CREDIT_CARD"
            })),
        )
            .into_response();
    };

    let amount = match parse_decimal("amount", &payload.amount) {
        Ok(d) => d,
        Err(response) => return response,
    };

    if let Err(errors) = validate_payment(
        amount,
        method,
        payload.bank_name.as_deref(),
        payload.account_holder.as_deref(),
    ) {
        return validation_response(&errors);
    }

    let repo = PaymentRepository::new((*state.db).clone());
    match repo
        .apply_payment(
            id,
            ApplyPaymentInput {
                amount,
                method,
                bank_name: payload.bank_name,
                account_holder: payload.account_holder,
                reference: payload.reference,
                note: payload.note,
            },
        )
        .await
    {
        Ok(updated) => (
            StatusCode::OK,
            Json(PaymentWithDetailsResponse::from(updated)),
        )
            .into_response(),
        Err(e) => payment_error_response(&e),
    }
}

/// DELETE `/payments/{id}` - Delete a free-standing payment.
async fn delete_payment(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());

    match repo.delete_payment(id).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(e) => payment_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_strings_round_trip() {
        for raw in ["CASH", "BANK_TRANSFER", "CREDIT_CARD"] {
            let method = string_to_method(raw).unwrap();
            assert_eq!(method_to_string(method), raw);
        }
        assert!(string_to_method("CHEQUE").is_none());
    }
}
