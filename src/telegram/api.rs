//! Bot API abstraction for message I/O.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ApiError;
use crate::telegram::types::Update;

/// Stream of updates from long-polling.
pub type UpdateStream = Pin<Box<dyn Stream<Item = Update> + Send>>;

/// The outbound Bot API calls the relay makes.
///
/// The production implementation is [`BotClient`](crate::telegram::BotClient);
/// tests swap in a recording fake.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Send a plain text message to a chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), ApiError>;

    /// Replace the text of an existing text message.
    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), ApiError>;

    /// Replace the caption of an existing media message.
    async fn edit_message_caption(
        &self,
        chat_id: i64,
        message_id: i64,
        caption: &str,
    ) -> Result<(), ApiError>;
}
