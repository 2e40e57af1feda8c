//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use domain_ledger::LedgerError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
            ),
            ApiError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                msg.clone(),
            ),
        }
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = self.parts();

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NoOutstandingBalance { .. } => ApiError::BadRequest(
                "You do not have an outstanding balance to settle.".to_string(),
            ),
            LedgerError::InvalidAmount(msg) | LedgerError::InvalidExpense(msg) => {
                ApiError::Validation(msg)
            }
            err @ LedgerError::CurrencyMismatch { .. } => ApiError::Validation(err.to_string()),
            LedgerError::NotInRoom(_) => ApiError::NotFound("You are not in a room.".to_string()),
            LedgerError::ExpenseNotFound(_) => ApiError::NotFound("Expense not found.".to_string()),
            LedgerError::Forbidden(msg) => ApiError::Forbidden(msg),
            LedgerError::AmountOverflow => ApiError::Validation(
                "Room totals are too large to reconcile.".to_string(),
            ),
            LedgerError::Port(port) => {
                error!(error = %port, "Ledger storage failed");
                ApiError::Internal("Server Error".to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{Currency, PortError};
    use rust_decimal_macros::dec;

    #[test]
    fn test_nothing_to_settle_is_bad_request() {
        let err: ApiError = LedgerError::NoOutstandingBalance { owed: dec!(0.004) }.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err
            .to_string()
            .contains("You do not have an outstanding balance to settle."));
    }

    #[test]
    fn test_ledger_error_statuses() {
        let cases: Vec<(LedgerError, StatusCode)> = vec![
            (LedgerError::NotInRoom("m".into()), StatusCode::NOT_FOUND),
            (LedgerError::ExpenseNotFound("e".into()), StatusCode::NOT_FOUND),
            (LedgerError::Forbidden("owner only".into()), StatusCode::FORBIDDEN),
            (
                LedgerError::InvalidExpense("blank".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                LedgerError::CurrencyMismatch {
                    expected: Currency::INR,
                    actual: Currency::USD,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (LedgerError::AmountOverflow, StatusCode::UNPROCESSABLE_ENTITY),
            (
                LedgerError::Port(PortError::connection("pool closed")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (ledger_err, status) in cases {
            assert_eq!(ApiError::from(ledger_err).status(), status);
        }
    }

    #[test]
    fn test_storage_details_are_not_leaked() {
        let err: ApiError = LedgerError::Port(PortError::internal("relation missing")).into();
        assert!(!err.to_string().contains("relation"));
    }
}
