//! Application state

use std::sync::Arc;

use reqwest::Client;
use sqlx::SqlitePool;

use paygate_bot::{GroupInviter, TelegramClient, UpdateRouter};
use paygate_payments::{PaymentStore, PaymentWebhookHandler};

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub store: PaymentStore,
    pub telegram: TelegramClient,
    pub payment_webhook: Arc<PaymentWebhookHandler>,
    pub update_router: Arc<UpdateRouter>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let http_client = Client::new();
        let telegram = TelegramClient::new(http_client, config.bot_token.clone());
        let store = PaymentStore::new(pool.clone());

        let notifier = Arc::new(telegram.clone());
        let inviter = Arc::new(GroupInviter::new(
            telegram.clone(),
            config.telegram_group_id.clone(),
        ));

        let payment_webhook = Arc::new(PaymentWebhookHandler::new(
            config.paystack_secret_key.clone(),
            store.clone(),
            notifier.clone(),
            inviter,
        ));

        let update_router = Arc::new(UpdateRouter::new(
            notifier,
            Arc::new(telegram.clone()),
            config.admin_user_ids.clone(),
        ));

        if config.admin_user_ids.is_empty() {
            tracing::warn!(
                "No admin user ids configured - admin commands will refuse everyone"
            );
        } else {
            tracing::info!(
                admin_count = config.admin_user_ids.len(),
                "Admin allow-list loaded"
            );
        }

        Self {
            pool,
            config,
            store,
            telegram,
            payment_webhook,
            update_router,
        }
    }
}
