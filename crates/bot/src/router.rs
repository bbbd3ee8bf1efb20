//! Inbound update routing
//!
//! Parses Telegram updates into commands, plain text, media and
//! callback-button interactions, and answers each with the canned reply set.
//! All outbound traffic goes through the injected capabilities, never a
//! concrete client.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::commands;
use crate::error::BotResult;
use crate::traits::{CallbackResponder, ChatNotifier, ReplyKeyboard};

/// Incoming update envelope: exactly one of the keys is expected.
#[derive(Debug, Default, Deserialize)]
pub struct Update {
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Message {
    pub chat: Option<Chat>,
    pub from: Option<User>,
    pub text: Option<String>,
    pub photo: Option<Value>,
    pub document: Option<Value>,
    pub audio: Option<Value>,
    pub video: Option<Value>,
    pub voice: Option<Value>,
    pub sticker: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub data: Option<String>,
    pub from: Option<User>,
    pub message: Option<Message>,
}

/// Split `/command@botname args` into the bare command and its argument tail.
///
/// Returns `None` when the text is not a command. The command is lowercased;
/// an `@botname` suffix is stripped.
pub fn extract_command(text: &str) -> Option<(String, String)> {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let head = parts.next()?;
    let head = head.split('@').next().unwrap_or(head).to_lowercase();

    let command = head.strip_prefix('/')?.to_string();
    if command.is_empty() {
        return None;
    }

    let args = parts.next().unwrap_or("").trim().to_string();
    Some((command, args))
}

/// Name the media payload carried by a message, if any.
fn media_kind(message: &Message) -> Option<&'static str> {
    if message.photo.is_some() {
        Some("photo")
    } else if message.document.is_some() {
        Some("document")
    } else if message.audio.is_some() {
        Some("audio")
    } else if message.video.is_some() {
        Some("video")
    } else if message.voice.is_some() {
        Some("voice message")
    } else if message.sticker.is_some() {
        Some("sticker")
    } else {
        None
    }
}

/// Routes one chat update to its canned response.
pub struct UpdateRouter {
    sender: Arc<dyn ChatNotifier>,
    callbacks: Arc<dyn CallbackResponder>,
    admin_user_ids: Vec<i64>,
}

impl UpdateRouter {
    pub fn new(
        sender: Arc<dyn ChatNotifier>,
        callbacks: Arc<dyn CallbackResponder>,
        admin_user_ids: Vec<i64>,
    ) -> Self {
        Self {
            sender,
            callbacks,
            admin_user_ids,
        }
    }

    /// Route one update.
    ///
    /// Updates carrying neither a message nor a callback query are logged and
    /// dropped; downstream send failures surface to the caller.
    pub async fn process_update(&self, update: Update) -> BotResult<()> {
        if let Some(message) = update.message {
            self.process_message(message).await
        } else if let Some(callback) = update.callback_query {
            self.process_callback(callback).await
        } else {
            tracing::info!("Received unhandled update type");
            Ok(())
        }
    }

    async fn process_message(&self, message: Message) -> BotResult<()> {
        let Some(chat_id) = message.chat.as_ref().map(|chat| chat.id) else {
            tracing::error!("No chat id found in message");
            return Ok(());
        };
        let chat_id = chat_id.to_string();
        let user_id = message.from.as_ref().map(|user| user.id);

        if let Some(text) = message.text.clone().filter(|text| !text.is_empty()) {
            return match extract_command(&text) {
                Some((command, args)) => {
                    self.handle_command(&command, &args, &chat_id, user_id, &message)
                        .await
                }
                None => self.handle_text(&text, &chat_id, user_id).await,
            };
        }

        if let Some(kind) = media_kind(&message) {
            return self.handle_media(kind, &chat_id, user_id).await;
        }

        Ok(())
    }

    async fn handle_command(
        &self,
        command: &str,
        _args: &str,
        chat_id: &str,
        user_id: Option<i64>,
        message: &Message,
    ) -> BotResult<()> {
        if !commands::is_known(command) {
            return self
                .sender
                .send_text(
                    chat_id,
                    &format!(
                        "Sorry, I don't recognize the command /{command}. \
                         Type /help to see available commands."
                    ),
                )
                .await;
        }

        tracing::info!(command = %command, user_id = ?user_id, "Received command");

        if commands::is_admin_only(command)
            && !user_id.is_some_and(|id| self.admin_user_ids.contains(&id))
        {
            return self
                .sender
                .send_text(
                    chat_id,
                    "Sorry, this command is only available to administrators.",
                )
                .await;
        }

        match command {
            "start" => self.cmd_start(chat_id, message).await,
            "help" => self.sender.send_text(chat_id, &commands::help_text()).await,
            "status" => {
                self.sender
                    .send_text(
                        chat_id,
                        "✅ Bot Status: Operational\n\n\
                         The bot is running normally and ready to process your commands.",
                    )
                    .await
            }
            "info" => {
                self.sender
                    .send_text(
                        chat_id,
                        "📱 Paygate Bot\n\n\
                         This bot grants group access after a verified payment.\n\n\
                         Features:\n\
                         • Processes incoming messages\n\
                         • Handles commands\n\
                         • Delivers invite links for successful payments\n\n\
                         Use /help to see available commands.",
                    )
                    .await
            }
            _ => {
                self.sender
                    .send_text(
                        chat_id,
                        &format!("The command /{command} is recognized but not yet implemented."),
                    )
                    .await
            }
        }
    }

    async fn cmd_start(&self, chat_id: &str, message: &Message) -> BotResult<()> {
        let user_name = message
            .from
            .as_ref()
            .and_then(|user| user.first_name.as_deref())
            .unwrap_or("there");

        let text = format!(
            "Hello, {user_name}! 👋\n\n\
             Welcome to the Telegram Bot. I'm here to assist you.\n\n\
             Use /help to see available commands."
        );
        let keyboard = ReplyKeyboard {
            keyboard: vec![
                vec!["/help".to_string(), "/status".to_string()],
                vec!["/info".to_string()],
            ],
            resize_keyboard: true,
        };

        self.sender.send_message(chat_id, &text, Some(keyboard)).await
    }

    async fn handle_text(&self, text: &str, chat_id: &str, user_id: Option<i64>) -> BotResult<()> {
        tracing::info!(user_id = ?user_id, preview = %text.chars().take(20).collect::<String>(), "Received message");
        self.sender
            .send_text(
                chat_id,
                "I received your message. Use /help to see what I can do.",
            )
            .await
    }

    async fn handle_media(
        &self,
        kind: &str,
        chat_id: &str,
        user_id: Option<i64>,
    ) -> BotResult<()> {
        tracing::info!(media = %kind, user_id = ?user_id, "Received media message");
        self.sender
            .send_text(
                chat_id,
                &format!("I received your {kind}, but I'm not designed to process media files yet."),
            )
            .await
    }

    async fn process_callback(&self, callback: CallbackQuery) -> BotResult<()> {
        let chat_id = callback
            .message
            .as_ref()
            .and_then(|message| message.chat.as_ref())
            .map(|chat| chat.id);

        let (Some(data), Some(chat_id)) = (callback.data, chat_id) else {
            tracing::error!("Missing data or chat id in callback query");
            return Ok(());
        };

        tracing::info!(data = %data, user_id = ?callback.from.map(|user| user.id), "Received callback query");

        // Answer first so the client clears its loading indicator even if the
        // follow-up message fails.
        if let Err(error) = self.callbacks.answer_callback(&callback.id).await {
            tracing::warn!(error = %error, "Failed to answer callback query");
        }

        self.sender
            .send_text(&chat_id.to_string(), &format!("You selected: {data}"))
            .await
    }
}
