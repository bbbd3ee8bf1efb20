// Test code patterns (expected in test files):
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Paygate Telegram Module
//!
//! Outbound transport to the Telegram Bot API plus the inbound update router.
//!
//! ## Features
//!
//! - **Client**: send messages, answer callback queries, manage the webhook
//!   subscription
//! - **Invites**: mint single-use, admin-approved group invite links
//! - **Router**: parse chat updates into commands, text, media and callback
//!   interactions and answer with canned replies
//!
//! Outbound sending is abstracted behind the [`traits`] capabilities so
//! consumers (the payment webhook dispatcher, the router itself) can be
//! exercised against recording fakes instead of the live API.

pub mod client;
pub mod commands;
pub mod error;
pub mod invite;
pub mod router;
pub mod traits;

// Client
pub use client::TelegramClient;

// Error
pub use error::{BotError, BotResult};

// Invites
pub use invite::GroupInviter;

// Router
pub use router::{extract_command, Update, UpdateRouter};

// Capabilities
pub use traits::{CallbackResponder, ChatNotifier, InviteIssuer, ReplyKeyboard};
