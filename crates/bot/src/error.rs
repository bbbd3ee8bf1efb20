//! Bot error types

use thiserror::Error;

pub type BotResult<T> = Result<T, BotError>;

/// Errors from talking to the Telegram Bot API
#[derive(Debug, Error)]
pub enum BotError {
    /// Transport-level failure (connection, timeout, bad response body)
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with `ok: false`
    #[error("Telegram API error: {0}")]
    Api(String),
}
