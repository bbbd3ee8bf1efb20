//! Environment-driven configuration

use thiserror::Error;

/// Public invite link used when none is configured.
const DEFAULT_INVITE_LINK: &str = "https://t.me/+IqItzc6RRcVmNDdk";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No {0} found in environment variables")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub paystack_secret_key: String,
    pub telegram_group_id: String,
    pub telegram_invite_link: String,
    pub admin_user_ids: Vec<i64>,
    /// Reserved by the deployment environment; not consumed by this service.
    pub session_secret: Option<String>,
    pub database_url: String,
    pub bind_address: String,
    /// Bot webhook path, derived from the token so it is hard to guess.
    pub bot_webhook_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = required("TELEGRAM_BOT_TOKEN")?;
        let paystack_secret_key = required("PAYSTACK_SECRET_KEY")?;
        let telegram_group_id = required("TELEGRAM_GROUP_ID")?;

        let telegram_invite_link = std::env::var("TELEGRAM_INVITE_LINK")
            .unwrap_or_else(|_| DEFAULT_INVITE_LINK.to_string());
        let admin_user_ids =
            parse_admin_ids(&std::env::var("ADMIN_USER_IDS").unwrap_or_default());
        let session_secret = std::env::var("SESSION_SECRET").ok();
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:payments.db?mode=rwc".to_string());
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".to_string());

        let bot_webhook_path = format!("/webhook/{bot_token}");

        Ok(Self {
            bot_token,
            paystack_secret_key,
            telegram_group_id,
            telegram_invite_link,
            admin_user_ids,
            session_secret,
            database_url,
            bind_address,
            bot_webhook_path,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Parse a comma-separated id list, skipping entries that are not numeric.
fn parse_admin_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}
