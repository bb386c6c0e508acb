//! Telegram Bot API transport.

pub mod api;
pub mod client;
pub mod types;

pub use api::{BotApi, UpdateStream};
pub use client::BotClient;
pub use types::{Chat, Me, Message, Update};
