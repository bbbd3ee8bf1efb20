//! HTTP routes

pub mod bot_webhook;
pub mod payment_webhook;
pub mod payments;
pub mod webhook_admin;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let bot_webhook_path = state.config.bot_webhook_path.clone();

    Router::new()
        .route("/payment_webhook", post(payment_webhook::payment_webhook))
        .route(&bot_webhook_path, post(bot_webhook::bot_webhook))
        .route("/all_payments", get(payments::all_payments))
        .route("/set_webhook", get(webhook_admin::set_webhook))
        .route("/webhook_info", get(webhook_admin::webhook_info))
        .route("/delete_webhook", get(webhook_admin::delete_webhook))
        .with_state(state)
}
