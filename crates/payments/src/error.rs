//! Payment ingestion error types

use thiserror::Error;

pub type PaymentResult<T> = Result<T, PaymentError>;

/// Errors surfaced by the payment webhook path.
///
/// The first four reject the request before anything is written; `Database`
/// is the only server-side failure.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Missing signature")]
    MissingSignature,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(String),

    #[error("No reference found")]
    MissingReference,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for PaymentError {
    fn from(error: sqlx::Error) -> Self {
        PaymentError::Database(error.to_string())
    }
}
