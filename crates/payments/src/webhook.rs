//! Payment webhook dispatch
//!
//! Verifies, filters, dedups and persists Paystack charge events, issuing a
//! group invite at most once per reference. The dedup read runs before
//! issuance so provider retries never mint a second invite; the store's
//! uniqueness constraint backstops the race between concurrent deliveries of
//! the same reference.

use std::sync::Arc;

use paygate_bot::traits::{ChatNotifier, InviteIssuer};

use crate::error::{PaymentError, PaymentResult};
use crate::event::{ChargeEvent, CustomFields};
use crate::signature;
use crate::store::{NewPayment, PaymentStore};

/// Event type this system acts on.
const SUCCESSFUL_CHARGE: &str = "charge.success";

const REMINDER_TEXT: &str = "✅ We already received your payment. \
    If you need your invite link again, please contact support.";

const DEGRADED_TEXT: &str = "✅ Payment received! But we couldn't generate \
    your invite link. Please contact support.";

/// Outcome of one delivered payment event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// New successful charge; a record was persisted.
    Processed { invite_issued: bool },
    /// Reference seen before; nothing was written.
    Duplicate,
    /// Event type this system does not act on.
    Ignored { event: String },
}

/// Webhook handler for Paystack payment events.
pub struct PaymentWebhookHandler {
    secret: String,
    store: PaymentStore,
    notifier: Arc<dyn ChatNotifier>,
    inviter: Arc<dyn InviteIssuer>,
}

impl PaymentWebhookHandler {
    pub fn new(
        secret: impl Into<String>,
        store: PaymentStore,
        notifier: Arc<dyn ChatNotifier>,
        inviter: Arc<dyn InviteIssuer>,
    ) -> Self {
        Self {
            secret: secret.into(),
            store,
            notifier,
            inviter,
        }
    }

    /// Process one raw webhook delivery.
    ///
    /// The signature check runs on the exact body bytes before any parsing;
    /// nothing below it executes for an unauthenticated request.
    pub async fn process(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> PaymentResult<WebhookOutcome> {
        let signature = signature.ok_or(PaymentError::MissingSignature)?;
        if !signature::verify(&self.secret, body, signature) {
            tracing::warn!("Invalid Paystack webhook signature");
            return Err(PaymentError::InvalidSignature);
        }

        let payload: ChargeEvent = serde_json::from_slice(body)
            .map_err(|error| PaymentError::InvalidPayload(error.to_string()))?;

        if payload.event != SUCCESSFUL_CHARGE {
            tracing::debug!(event = %payload.event, "Ignoring event type");
            return Ok(WebhookOutcome::Ignored {
                event: payload.event,
            });
        }

        let data = payload.data;
        let reference = match data.reference.as_deref() {
            Some(reference) if !reference.is_empty() => reference.to_string(),
            _ => {
                tracing::warn!("No reference found in payment data");
                return Err(PaymentError::MissingReference);
            }
        };

        let fields = CustomFields::from_metadata(&data.metadata);
        let chat_id = fields.chat_id().map(str::to_owned);
        let full_name = fields.full_name().map(str::to_owned);

        if self.store.exists(&reference).await? {
            tracing::info!(reference = %reference, "Duplicate webhook ignored");
            if let Some(chat_id) = &chat_id {
                self.send_best_effort(chat_id, REMINDER_TEXT).await;
            }
            return Ok(WebhookOutcome::Duplicate);
        }

        let mut invite_link = None;
        match &chat_id {
            Some(chat_id) => match self.inviter.create_invite().await {
                Ok(link) => {
                    let text = format!(
                        "🎉 Thank you for your payment of {}!\n\
                         Here is your invite link (valid for 5 minutes, single use):\n{link}",
                        format_cedis(data.amount),
                    );
                    self.send_best_effort(chat_id, &text).await;
                    tracing::info!(chat_id = %chat_id, "Sent invite message");
                    invite_link = Some(link);
                }
                Err(error) => {
                    tracing::error!(
                        reference = %reference,
                        error = %error,
                        "Failed to generate invite link"
                    );
                    self.send_best_effort(chat_id, DEGRADED_TEXT).await;
                }
            },
            None => {
                tracing::warn!(reference = %reference, "No chat_id found in payment metadata");
            }
        }

        let invite_issued = invite_link.is_some();
        let inserted = self
            .store
            .insert(&NewPayment {
                reference: reference.clone(),
                status: data.status.unwrap_or_default(),
                amount: data.amount,
                email: data.customer.email.unwrap_or_default(),
                full_name,
                paid_at: data.paid_at.unwrap_or_default(),
                chat_id,
                invite_link,
            })
            .await?;

        if !inserted {
            tracing::warn!(
                reference = %reference,
                "Reference was saved by a concurrent delivery"
            );
        }

        Ok(WebhookOutcome::Processed { invite_issued })
    }

    /// Notification delivery never decides the fate of the request.
    async fn send_best_effort(&self, chat_id: &str, text: &str) {
        if let Err(error) = self.notifier.send_text(chat_id, text).await {
            tracing::warn!(chat_id = %chat_id, error = %error, "Failed to send message");
        }
    }
}

/// Minor-unit amount as a cedi display string, two decimals.
fn format_cedis(minor_units: i64) -> String {
    format!("₵{:.2}", minor_units as f64 / 100.0)
}
