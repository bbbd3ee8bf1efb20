//! Paystack payment webhook endpoint

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use paygate_payments::WebhookOutcome;

use crate::error::ApiResult;
use crate::state::AppState;

/// `POST /payment_webhook`
///
/// The signature covers the body byte-for-byte, so it is taken as raw
/// `Bytes` rather than through a JSON extractor.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let signature = headers
        .get("x-paystack-signature")
        .and_then(|value| value.to_str().ok());

    let outcome = state.payment_webhook.process(&body, signature).await?;

    let response = match outcome {
        WebhookOutcome::Duplicate => {
            json!({ "status": "ignored", "message": "Duplicate reference" })
        }
        WebhookOutcome::Processed { .. } | WebhookOutcome::Ignored { .. } => {
            json!({ "status": "success" })
        }
    };
    Ok(Json(response))
}
