//! Telegram Bot API client
//!
//! Thin wrapper over the HTTP API. Every call goes through the standard
//! `{ok, result, description}` envelope; `ok: false` surfaces as
//! [`BotError::Api`] with the API's description.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{BotError, BotResult};
use crate::traits::{CallbackResponder, ChatNotifier, ReplyKeyboard};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Client for one bot token.
///
/// Cheap to clone; the underlying `reqwest::Client` is shared.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    token: String,
    base_url: String,
}

/// Bot API response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatInviteLink {
    invite_link: String,
}

impl TelegramClient {
    pub fn new(http: Client, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
            base_url: TELEGRAM_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API host (used by tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// POST a method call and unwrap the response envelope.
    async fn call<T: DeserializeOwned>(&self, method: &str, payload: &Value) -> BotResult<T> {
        let response = self
            .http
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await?;

        if envelope.ok {
            envelope
                .result
                .ok_or_else(|| BotError::Api("response envelope had no result".to_string()))
        } else {
            let description = envelope
                .description
                .unwrap_or_else(|| format!("request failed with status {status}"));
            tracing::error!(method = %method, description = %description, "Telegram API call failed");
            Err(BotError::Api(description))
        }
    }

    /// Issue a method call and return the raw response body, envelope and all.
    async fn call_raw(&self, method: &str, payload: Option<&Value>) -> BotResult<Value> {
        let request = match payload {
            Some(payload) => self.http.post(self.method_url(method)).json(payload),
            None => self.http.get(self.method_url(method)),
        };
        Ok(request.send().await?.json().await?)
    }

    /// Create a fresh invite link for a group.
    ///
    /// With `creates_join_request` set, each join must be approved by an
    /// administrator and the link carries no member limit (the API rejects
    /// `member_limit` alongside join requests).
    pub async fn create_chat_invite_link(
        &self,
        chat_id: &str,
        expire_date: Option<i64>,
        creates_join_request: bool,
    ) -> BotResult<String> {
        let mut payload = json!({
            "chat_id": chat_id,
            "creates_join_request": creates_join_request,
        });
        if let Some(expire_date) = expire_date {
            payload["expire_date"] = expire_date.into();
        }

        let link: ChatInviteLink = self.call("createChatInviteLink", &payload).await?;
        Ok(link.invite_link)
    }

    /// Register `url` as this bot's webhook. Returns the raw API response so
    /// callers can relay it.
    pub async fn set_webhook(&self, url: &str) -> BotResult<Value> {
        self.call_raw("setWebhook", Some(&json!({ "url": url }))).await
    }

    /// Fetch the current webhook subscription state.
    pub async fn webhook_info(&self) -> BotResult<Value> {
        self.call_raw("getWebhookInfo", None).await
    }

    /// Remove the webhook subscription.
    pub async fn delete_webhook(&self) -> BotResult<Value> {
        self.call_raw("deleteWebhook", None).await
    }
}

#[async_trait]
impl ChatNotifier for TelegramClient {
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: Option<ReplyKeyboard>,
    ) -> BotResult<()> {
        let mut payload = json!({ "chat_id": chat_id, "text": text });
        if let Some(keyboard) = keyboard {
            payload["reply_markup"] = json!(keyboard);
        }

        let _: Value = self.call("sendMessage", &payload).await?;
        tracing::debug!(chat_id = %chat_id, "Message sent");
        Ok(())
    }
}

#[async_trait]
impl CallbackResponder for TelegramClient {
    async fn answer_callback(&self, callback_query_id: &str) -> BotResult<()> {
        let payload = json!({ "callback_query_id": callback_query_id });
        let _: Value = self.call("answerCallbackQuery", &payload).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> TelegramClient {
        TelegramClient::new(Client::new(), "TEST_TOKEN").with_base_url(server.url())
    }

    #[tokio::test]
    async fn send_message_posts_chat_id_and_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/botTEST_TOKEN/sendMessage")
            .match_body(Matcher::PartialJson(json!({
                "chat_id": "42",
                "text": "hello",
            })))
            .with_body(r#"{"ok":true,"result":{"message_id":1}}"#)
            .create_async()
            .await;

        client(&server).send_text("42", "hello").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn send_message_attaches_reply_keyboard() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/botTEST_TOKEN/sendMessage")
            .match_body(Matcher::PartialJson(json!({
                "reply_markup": { "keyboard": [["/help"]], "resize_keyboard": true },
            })))
            .with_body(r#"{"ok":true,"result":{"message_id":2}}"#)
            .create_async()
            .await;

        let keyboard = ReplyKeyboard {
            keyboard: vec![vec!["/help".to_string()]],
            resize_keyboard: true,
        };
        client(&server)
            .send_message("42", "choose", Some(keyboard))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn api_failure_carries_description() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/botTEST_TOKEN/sendMessage")
            .with_body(r#"{"ok":false,"description":"Bad Request: chat not found"}"#)
            .create_async()
            .await;

        let err = client(&server).send_text("42", "hello").await.unwrap_err();
        match err {
            BotError::Api(description) => assert!(description.contains("chat not found")),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_invite_link_returns_link() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/botTEST_TOKEN/createChatInviteLink")
            .match_body(Matcher::PartialJson(json!({
                "chat_id": "-100123",
                "creates_join_request": true,
            })))
            .with_body(r#"{"ok":true,"result":{"invite_link":"https://t.me/+abc"}}"#)
            .create_async()
            .await;

        let link = client(&server)
            .create_chat_invite_link("-100123", Some(1_700_000_000), true)
            .await
            .unwrap();
        assert_eq!(link, "https://t.me/+abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn webhook_info_returns_raw_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/botTEST_TOKEN/getWebhookInfo")
            .with_body(r#"{"ok":true,"result":{"url":"https://example.com/webhook"}}"#)
            .create_async()
            .await;

        let info = client(&server).webhook_info().await.unwrap();
        assert_eq!(info["result"]["url"], "https://example.com/webhook");
    }
}
