//! Telegram webhook subscription management
//!
//! Thin relays around the Bot API's webhook methods; the raw Telegram
//! response is echoed so operators can see exactly what the API said.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

fn telegram_ok(response: &Value) -> bool {
    response.get("ok").and_then(Value::as_bool).unwrap_or(false)
}

fn telegram_description(response: &Value) -> &str {
    response
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error")
}

/// `GET /set_webhook` - register this deployment's bot webhook URL.
pub async fn set_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("Missing Host header".to_string()))?;
    let webhook_url = format!("https://{host}{}", state.config.bot_webhook_path);

    let response = state.telegram.set_webhook(&webhook_url).await?;

    if telegram_ok(&response) {
        tracing::info!(url = %webhook_url, "Webhook registered");
        Ok(Json(json!({
            "status": "success",
            "message": format!("Webhook set to: {webhook_url}"),
            "telegram_response": response,
        }))
        .into_response())
    } else {
        let description = telegram_description(&response);
        Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": "error",
                "message": format!("Failed to set webhook: {description}"),
                "telegram_response": response,
            })),
        )
            .into_response())
    }
}

/// `GET /webhook_info` - current subscription state.
pub async fn webhook_info(State(state): State<AppState>) -> ApiResult<Response> {
    let response = state.telegram.webhook_info().await?;

    if telegram_ok(&response) {
        Ok(Json(json!({
            "status": "success",
            "webhook_info": response,
        }))
        .into_response())
    } else {
        Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "message": "Failed to get webhook info",
                "telegram_response": response,
            })),
        )
            .into_response())
    }
}

/// `GET /delete_webhook` - drop the subscription.
pub async fn delete_webhook(State(state): State<AppState>) -> ApiResult<Response> {
    let response = state.telegram.delete_webhook().await?;

    if telegram_ok(&response) {
        Ok(Json(json!({
            "status": "success",
            "message": "Webhook deleted successfully",
        }))
        .into_response())
    } else {
        Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "message": "Failed to delete webhook",
                "telegram_response": response,
            })),
        )
            .into_response())
    }
}
