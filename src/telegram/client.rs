//! Telegram Bot API client — long-polls for updates, sends and edits
//! messages over HTTPS.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

use crate::config::BotConfig;
use crate::error::ApiError;
use crate::telegram::api::{BotApi, UpdateStream};
use crate::telegram::types::{ApiResponse, Me, Update};

/// Long-poll wait passed to `getUpdates`.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Back-off after a failed poll before trying again.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// HTTP client for the Bot API. Cheap to clone; clones share the
/// underlying connection pool.
#[derive(Clone)]
pub struct BotClient {
    base_url: String,
    client: reqwest::Client,
}

impl BotClient {
    pub fn new(config: &BotConfig) -> Self {
        Self {
            base_url: format!(
                "https://api.telegram.org/bot{}",
                config.token.expose_secret()
            ),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    /// Call one Bot API method and decode its `result`.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let resp = self
            .client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                method: method.into(),
                reason: e.to_string(),
            })?;

        let envelope: ApiResponse<T> =
            resp.json().await.map_err(|e| ApiError::InvalidResponse {
                method: method.into(),
                reason: e.to_string(),
            })?;

        if !envelope.ok {
            return Err(ApiError::Rejected {
                method: method.into(),
                code: envelope.error_code.unwrap_or(0),
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".into()),
            });
        }

        envelope.result.ok_or_else(|| ApiError::InvalidResponse {
            method: method.into(),
            reason: "ok response without a result".into(),
        })
    }

    /// Verify the token and fetch the bot's identity.
    pub async fn get_me(&self) -> Result<Me, ApiError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Start long-polling and return the resulting update stream.
    ///
    /// The poll loop runs on its own task. Transient failures are logged
    /// and retried after a short delay; the loop only ends when the
    /// stream side is dropped.
    pub fn updates(&self) -> UpdateStream {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let client = self.clone();

        tokio::spawn(async move {
            let mut offset: i64 = 0;

            tracing::info!("Listening for Telegram updates...");

            loop {
                let body = serde_json::json!({
                    "offset": offset,
                    "timeout": POLL_TIMEOUT_SECS,
                    "allowed_updates": ["message", "channel_post"]
                });

                let updates: Vec<Update> = match client.call("getUpdates", &body).await {
                    Ok(u) => u,
                    Err(e) => {
                        tracing::warn!("Telegram poll error: {e}");
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                        continue;
                    }
                };

                for update in updates {
                    offset = update.update_id + 1;
                    if tx.send(update).is_err() {
                        tracing::info!("Update stream closed, stopping poll loop");
                        return;
                    }
                }
            }
        });

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|update| (update, rx))
        });

        Box::pin(stream)
    }
}

#[async_trait]
impl BotApi for BotClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        self.call::<serde_json::Value>("sendMessage", &body)
            .await
            .map(|_| ())
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
        });
        self.call::<serde_json::Value>("editMessageText", &body)
            .await
            .map(|_| ())
    }

    async fn edit_message_caption(
        &self,
        chat_id: i64,
        message_id: i64,
        caption: &str,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "caption": caption,
        });
        self.call::<serde_json::Value>("editMessageCaption", &body)
            .await
            .map(|_| ())
    }
}
