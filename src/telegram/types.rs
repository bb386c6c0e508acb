//! Wire types for the Telegram Bot API — the subset this bot consumes.

use serde::Deserialize;

/// One entry from `getUpdates`.
///
/// Telegram puts each update kind in its own optional field; only the
/// kinds listed in `allowed_updates` at poll time ever arrive.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonically increasing update identifier, used as the poll offset.
    pub update_id: i64,
    /// A message sent to the bot (private chat or group).
    #[serde(default)]
    pub message: Option<Message>,
    /// A post published in a channel the bot administers.
    #[serde(default)]
    pub channel_post: Option<Message>,
}

/// A Telegram message or channel post.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Message identifier, unique within its chat.
    pub message_id: i64,
    /// The chat the message belongs to.
    pub chat: Chat,
    /// Text body, for plain text messages.
    #[serde(default)]
    pub text: Option<String>,
    /// Caption, for media messages (photos, videos, documents).
    #[serde(default)]
    pub caption: Option<String>,
}

impl Message {
    /// The editable text of this message: its text if present, else its
    /// caption. `None` means there is nothing to rewrite.
    pub fn body(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }
}

/// The chat a message was sent in.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Unique chat identifier.
    pub id: i64,
    /// Chat kind: "private", "group", "supergroup" or "channel".
    #[serde(rename = "type")]
    pub kind: String,
}

impl Chat {
    /// Whether this is a one-on-one chat with the bot.
    pub fn is_private(&self) -> bool {
        self.kind == "private"
    }
}

/// The bot's own identity, from `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct Me {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// Envelope every Bot API method responds with.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}
