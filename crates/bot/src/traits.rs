//! Outbound messaging capabilities
//!
//! The webhook dispatcher and the update router reach Telegram only through
//! these traits. Production wiring hands them the live [`TelegramClient`];
//! tests substitute recording fakes.
//!
//! [`TelegramClient`]: crate::client::TelegramClient

use async_trait::async_trait;
use serde::Serialize;

use crate::error::BotResult;

/// A custom reply keyboard shown under the chat input field.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyKeyboard {
    pub keyboard: Vec<Vec<String>>,
    pub resize_keyboard: bool,
}

/// Sends messages to a chat.
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Send a text message, optionally with a reply keyboard.
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: Option<ReplyKeyboard>,
    ) -> BotResult<()>;

    /// Send a plain text message.
    async fn send_text(&self, chat_id: &str, text: &str) -> BotResult<()> {
        self.send_message(chat_id, text, None).await
    }
}

/// Acknowledges callback-button interactions.
#[async_trait]
pub trait CallbackResponder: Send + Sync {
    /// Answer a callback query, clearing the client-side loading indicator.
    async fn answer_callback(&self, callback_query_id: &str) -> BotResult<()>;
}

/// Mints join artifacts for the configured group.
#[async_trait]
pub trait InviteIssuer: Send + Sync {
    /// Request a fresh single-use invite link.
    async fn create_invite(&self) -> BotResult<String>;
}
