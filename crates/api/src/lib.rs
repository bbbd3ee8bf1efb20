// Test code patterns:
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Paygate API Library
//!
//! HTTP surface for the payment relay: the Paystack webhook, the Telegram
//! bot webhook, the payments listing and the webhook subscription admin
//! endpoints.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
