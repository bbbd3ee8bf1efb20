//! Group invite issuance

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::client::TelegramClient;
use crate::error::BotResult;
use crate::traits::InviteIssuer;

/// Seconds a fresh invite link stays valid.
const INVITE_TTL_SECS: i64 = 5 * 60;

/// Mints single-use, admin-approved join links for one fixed group.
///
/// Each link expires after [`INVITE_TTL_SECS`] and funnels joiners through
/// admin approval, so a leaked link cannot be reused to admit others.
#[derive(Clone)]
pub struct GroupInviter {
    client: TelegramClient,
    group_id: String,
}

impl GroupInviter {
    pub fn new(client: TelegramClient, group_id: impl Into<String>) -> Self {
        Self {
            client,
            group_id: group_id.into(),
        }
    }
}

#[async_trait]
impl InviteIssuer for GroupInviter {
    async fn create_invite(&self) -> BotResult<String> {
        let expire_date = OffsetDateTime::now_utc().unix_timestamp() + INVITE_TTL_SECS;
        let link = self
            .client
            .create_chat_invite_link(&self.group_id, Some(expire_date), true)
            .await?;

        tracing::info!(group_id = %self.group_id, "Generated invite link");
        Ok(link)
    }
}
