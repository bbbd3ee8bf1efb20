// Test file - these are expected patterns in test code
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Edge case tests for the payment webhook pipeline
//!
//! Drives the dispatcher end to end over an in-memory store with recording
//! fakes for the outbound capabilities: signature gating, event filtering,
//! dedup/idempotency, invite degradation, and notification best-effort.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use paygate_bot::error::{BotError, BotResult};
use paygate_bot::traits::{ChatNotifier, InviteIssuer, ReplyKeyboard};
use sha2::Sha512;
use sqlx::sqlite::SqlitePoolOptions;

use crate::store::PaymentStore;
use crate::webhook::{PaymentWebhookHandler, WebhookOutcome};

const SECRET: &str = "sk_test_verysecret";

fn sign(body: &[u8]) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(SECRET.as_bytes()).unwrap();
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingNotifier {
    fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatNotifier for RecordingNotifier {
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        _keyboard: Option<ReplyKeyboard>,
    ) -> BotResult<()> {
        if self.fail {
            return Err(BotError::Api("simulated send failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((chat_id.to_string(), text.to_string()));
        Ok(())
    }
}

struct StubInviter {
    link: Option<String>,
    calls: AtomicUsize,
}

impl StubInviter {
    fn returning(link: &str) -> Self {
        Self {
            link: Some(link.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            link: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InviteIssuer for StubInviter {
    async fn create_invite(&self) -> BotResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.link
            .clone()
            .ok_or_else(|| BotError::Api("simulated issuance failure".to_string()))
    }
}

struct Harness {
    handler: PaymentWebhookHandler,
    store: PaymentStore,
    notifier: Arc<RecordingNotifier>,
    inviter: Arc<StubInviter>,
}

async fn harness(notifier: RecordingNotifier, inviter: StubInviter) -> Harness {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = PaymentStore::new(pool);
    store.ensure_schema().await.unwrap();

    let notifier = Arc::new(notifier);
    let inviter = Arc::new(inviter);
    let handler = PaymentWebhookHandler::new(
        SECRET,
        store.clone(),
        notifier.clone(),
        inviter.clone(),
    );

    Harness {
        handler,
        store,
        notifier,
        inviter,
    }
}

async fn default_harness() -> Harness {
    harness(
        RecordingNotifier::default(),
        StubInviter::returning("https://t.me/+abc"),
    )
    .await
}

fn charge_body(reference: &str, chat_id: Option<&str>) -> Vec<u8> {
    let custom_fields = match chat_id {
        Some(chat_id) => serde_json::json!([
            { "variable_name": "full_name", "value": "Ama Mensah" },
            { "variable_name": "chat_id", "value": chat_id },
        ]),
        None => serde_json::json!([]),
    };
    serde_json::json!({
        "event": "charge.success",
        "data": {
            "reference": reference,
            "status": "success",
            "amount": 5000,
            "customer": { "email": "a@b.com" },
            "paid_at": "2024-01-01 10:00:00",
            "metadata": { "custom_fields": custom_fields },
        }
    })
    .to_string()
    .into_bytes()
}

mod signature_gate {
    use super::*;
    use crate::error::PaymentError;

    #[tokio::test]
    async fn missing_signature_is_rejected_before_any_side_effect() {
        let h = default_harness().await;
        let body = charge_body("R1", Some("42"));

        let error = h.handler.process(&body, None).await.unwrap_err();
        assert!(matches!(error, PaymentError::MissingSignature));
        assert!(!h.store.exists("R1").await.unwrap());
        assert!(h.notifier.sent().is_empty());
        assert_eq!(h.inviter.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_signature_is_rejected_before_any_side_effect() {
        let h = default_harness().await;
        let body = charge_body("R1", Some("42"));
        let mut signature = sign(&body);
        signature.replace_range(0..1, if signature.starts_with('0') { "1" } else { "0" });

        let error = h.handler.process(&body, Some(&signature)).await.unwrap_err();
        assert!(matches!(error, PaymentError::InvalidSignature));
        assert!(!h.store.exists("R1").await.unwrap());
        assert!(h.notifier.sent().is_empty());
        assert_eq!(h.inviter.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_json_with_valid_signature_is_a_client_error() {
        let h = default_harness().await;
        let body = b"not json at all";

        let error = h
            .handler
            .process(body, Some(&sign(body)))
            .await
            .unwrap_err();
        assert!(matches!(error, PaymentError::InvalidPayload(_)));
    }
}

mod event_filtering {
    use super::*;
    use crate::error::PaymentError;

    #[tokio::test]
    async fn non_charge_events_are_acknowledged_without_side_effects() {
        let h = default_harness().await;
        let body = serde_json::json!({
            "event": "transfer.success",
            "data": { "reference": "T1" },
        })
        .to_string()
        .into_bytes();

        let outcome = h.handler.process(&body, Some(&sign(&body))).await.unwrap();
        assert_eq!(
            outcome,
            WebhookOutcome::Ignored {
                event: "transfer.success".to_string()
            }
        );
        assert!(!h.store.exists("T1").await.unwrap());
        assert_eq!(h.inviter.calls(), 0);
    }

    #[tokio::test]
    async fn missing_reference_is_a_client_error_and_writes_nothing() {
        let h = default_harness().await;
        let body = serde_json::json!({
            "event": "charge.success",
            "data": { "status": "success", "amount": 5000 },
        })
        .to_string()
        .into_bytes();

        let error = h
            .handler
            .process(&body, Some(&sign(&body)))
            .await
            .unwrap_err();
        assert!(matches!(error, PaymentError::MissingReference));
        assert!(h.store.list(None, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_reference_counts_as_missing() {
        let h = default_harness().await;
        let body = serde_json::json!({
            "event": "charge.success",
            "data": { "reference": "" },
        })
        .to_string()
        .into_bytes();

        let error = h
            .handler
            .process(&body, Some(&sign(&body)))
            .await
            .unwrap_err();
        assert!(matches!(error, PaymentError::MissingReference));
    }
}

mod idempotency {
    use super::*;

    #[tokio::test]
    async fn successful_charge_persists_record_and_sends_invite() {
        let h = default_harness().await;
        let body = charge_body("R1", Some("42"));

        let outcome = h.handler.process(&body, Some(&sign(&body))).await.unwrap();
        assert_eq!(
            outcome,
            WebhookOutcome::Processed {
                invite_issued: true
            }
        );

        let records = h.store.list(None, 0).await.unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.reference, "R1");
        assert_eq!(record.amount, 5000);
        assert_eq!(record.email, "a@b.com");
        assert_eq!(record.full_name.as_deref(), Some("Ama Mensah"));
        assert_eq!(record.chat_id.as_deref(), Some("42"));
        assert_eq!(record.invite_link.as_deref(), Some("https://t.me/+abc"));

        let sent = h.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "42");
        assert!(sent[0].1.contains("₵50.00"));
        assert!(sent[0].1.contains("https://t.me/+abc"));
    }

    #[tokio::test]
    async fn replayed_delivery_is_ignored_with_a_reminder() {
        let h = default_harness().await;
        let body = charge_body("R1", Some("42"));
        let signature = sign(&body);

        h.handler.process(&body, Some(&signature)).await.unwrap();
        let outcome = h.handler.process(&body, Some(&signature)).await.unwrap();

        assert_eq!(outcome, WebhookOutcome::Duplicate);
        assert_eq!(h.store.list(None, 0).await.unwrap().len(), 1);
        assert_eq!(h.inviter.calls(), 1);

        let sent = h.notifier.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].1.contains("already received your payment"));
    }

    #[tokio::test]
    async fn replay_without_chat_id_sends_no_reminder() {
        let h = default_harness().await;
        let body = charge_body("R2", None);
        let signature = sign(&body);

        h.handler.process(&body, Some(&signature)).await.unwrap();
        let outcome = h.handler.process(&body, Some(&signature)).await.unwrap();

        assert_eq!(outcome, WebhookOutcome::Duplicate);
        assert!(h.notifier.sent().is_empty());
    }
}

mod invite_degradation {
    use super::*;

    #[tokio::test]
    async fn issuance_failure_still_persists_record_without_link() {
        let h = harness(RecordingNotifier::default(), StubInviter::failing()).await;
        let body = charge_body("R1", Some("42"));

        let outcome = h.handler.process(&body, Some(&sign(&body))).await.unwrap();
        assert_eq!(
            outcome,
            WebhookOutcome::Processed {
                invite_issued: false
            }
        );

        let records = h.store.list(None, 0).await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].invite_link.is_none());

        let sent = h.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("couldn't generate"));
        assert_eq!(h.inviter.calls(), 1);
    }

    #[tokio::test]
    async fn missing_chat_id_skips_issuance_entirely() {
        let h = default_harness().await;
        let body = charge_body("R1", None);

        let outcome = h.handler.process(&body, Some(&sign(&body))).await.unwrap();
        assert_eq!(
            outcome,
            WebhookOutcome::Processed {
                invite_issued: false
            }
        );

        let records = h.store.list(None, 0).await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].chat_id.is_none());
        assert!(records[0].invite_link.is_none());
        assert_eq!(h.inviter.calls(), 0);
        assert!(h.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn send_failure_never_fails_the_request() {
        let h = harness(
            RecordingNotifier::failing(),
            StubInviter::returning("https://t.me/+abc"),
        )
        .await;
        let body = charge_body("R1", Some("42"));

        let outcome = h.handler.process(&body, Some(&sign(&body))).await.unwrap();
        assert_eq!(
            outcome,
            WebhookOutcome::Processed {
                invite_issued: true
            }
        );

        let records = h.store.list(None, 0).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].invite_link.as_deref(), Some("https://t.me/+abc"));
    }
}
