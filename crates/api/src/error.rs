//! API error handling
//!
//! Every failure leaving a handler becomes `{status: "error", message}` with
//! the matching HTTP status, so callers always see the same body shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use paygate_bot::BotError;
use paygate_payments::PaymentError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl From<PaymentError> for ApiError {
    fn from(error: PaymentError) -> Self {
        match error {
            PaymentError::MissingSignature
            | PaymentError::InvalidSignature
            | PaymentError::InvalidPayload(_)
            | PaymentError::MissingReference => ApiError::BadRequest(error.to_string()),
            PaymentError::Database(_) => ApiError::Internal(error.to_string()),
        }
    }
}

impl From<BotError> for ApiError {
    fn from(error: BotError) -> Self {
        ApiError::Internal(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, message = %message, "Request failed");
        }

        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_errors_map_to_client_or_server_status() {
        let bad: ApiError = PaymentError::MissingSignature.into();
        assert!(matches!(bad, ApiError::BadRequest(_)));

        let internal: ApiError = PaymentError::Database("locked".to_string()).into();
        assert!(matches!(internal, ApiError::Internal(_)));
    }
}
