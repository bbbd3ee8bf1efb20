//! Payment listing endpoint

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::PrimitiveDateTime;

use paygate_payments::PaymentRecord;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PaymentsResponse {
    pub payments: Vec<PaymentRecord>,
}

/// `GET /all_payments?limit=&offset=` - newest first by insertion id.
pub async fn all_payments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<PaymentsResponse>> {
    let offset = query.offset.unwrap_or(0);
    let mut payments = state.store.list(query.limit, offset).await?;

    for payment in &mut payments {
        payment.paid_at = humanize_paid_at(&payment.paid_at);
    }

    Ok(Json(PaymentsResponse { payments }))
}

/// Reformat a provider `paid_at` timestamp for display.
///
/// Values that don't match the provider format pass through unchanged.
fn humanize_paid_at(raw: &str) -> String {
    let provider = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let display =
        format_description!("[month repr:short] [day], [year] [hour repr:12]:[minute] [period]");

    PrimitiveDateTime::parse(raw, &provider)
        .ok()
        .and_then(|parsed| parsed.format(&display).ok())
        .unwrap_or_else(|| raw.to_string())
}
