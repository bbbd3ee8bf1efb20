//! Telegram bot webhook endpoint

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use paygate_bot::Update;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `POST /webhook/{bot_token}`
///
/// Structural receipt of any JSON object is acknowledged with success;
/// only processing failures surface as a server error.
pub async fn bot_webhook(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<Value>> {
    tracing::debug!(update = %payload, "Received update");

    let update: Update = serde_json::from_value(payload)
        .map_err(|error| ApiError::Internal(error.to_string()))?;

    state.update_router.process_update(update).await?;

    Ok(Json(json!({ "status": "success" })))
}
