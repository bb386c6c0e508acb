//! Relay — routes updates between the operator dialog and the channel
//! post rewriter.
//!
//! Updates are handled one at a time, in arrival order. That keeps
//! edits ordered and makes the post-edit cooldown an actual gap between
//! consecutive edits rather than a per-task timer.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, error, info};

use crate::config::BotConfig;
use crate::dialog::SessionRegistry;
use crate::rewrite::rewrite;
use crate::rules::RuleStore;
use crate::telegram::api::{BotApi, UpdateStream};
use crate::telegram::types::{Message, Update};

/// How often stalled dialog sessions are swept.
const PRUNE_INTERVAL: Duration = Duration::from_secs(600);

/// Update dispatcher wiring the dialog, the rule store and the rewriter
/// to the Bot API.
pub struct Relay {
    api: Arc<dyn BotApi>,
    rules: Arc<RuleStore>,
    sessions: Arc<SessionRegistry>,
    edit_cooldown: Duration,
    session_idle_timeout: Duration,
}

impl Relay {
    pub fn new(api: Arc<dyn BotApi>, rules: Arc<RuleStore>, config: &BotConfig) -> Self {
        Self {
            api,
            sessions: SessionRegistry::new(Arc::clone(&rules)),
            rules,
            edit_cooldown: config.edit_cooldown,
            session_idle_timeout: config.session_idle_timeout,
        }
    }

    /// Run the relay main loop until Ctrl+C or the update stream ends.
    pub async fn run(self, mut updates: UpdateStream) {
        // Spawn session pruning task
        let sessions = Arc::clone(&self.sessions);
        let session_idle_timeout = self.session_idle_timeout;
        let pruning_handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(PRUNE_INTERVAL);
            interval.tick().await; // Skip immediate first tick
            loop {
                interval.tick().await;
                sessions.prune_idle(session_idle_timeout).await;
            }
        });

        info!("Relay ready and listening");

        loop {
            let update = tokio::select! {
                biased;
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl+C received, shutting down...");
                    break;
                }
                update = updates.next() => {
                    match update {
                        Some(u) => u,
                        None => {
                            info!("Update stream ended, shutting down...");
                            break;
                        }
                    }
                }
            };

            self.handle_update(update).await;
        }

        pruning_handle.abort();
    }

    /// Dispatch one update to the right handler.
    pub async fn handle_update(&self, update: Update) {
        if let Some(post) = update.channel_post {
            self.handle_channel_post(post).await;
        } else if let Some(message) = update.message {
            self.handle_operator_message(message).await;
        } else {
            debug!(update_id = update.update_id, "Update carries nothing to handle");
        }
    }

    /// Feed a direct message into the configuration dialog.
    ///
    /// Only plain text in private chats reaches the dialog. Commands are
    /// routed separately and never count as dialog input, so an operator
    /// typing "/start" mid-dialog does not end up with a rule that
    /// replaces "/start".
    async fn handle_operator_message(&self, message: Message) {
        if !message.chat.is_private() {
            debug!(chat = message.chat.id, "Ignoring message outside a private chat");
            return;
        }
        let Some(text) = message.text.as_deref() else {
            debug!(chat = message.chat.id, "Ignoring non-text private message");
            return;
        };

        let reply = match parse_command(text) {
            Some("start") => self.sessions.start(message.chat.id).await,
            Some(other) => {
                debug!(command = other, "Ignoring unknown command");
                None
            }
            None => self.sessions.handle_text(message.chat.id, text).await,
        };

        if let Some(reply) = reply {
            if let Err(e) = self.api.send_message(message.chat.id, &reply).await {
                error!(chat = message.chat.id, "Failed to send dialog reply: {e}");
            }
        }
    }

    /// Rewrite a channel post in place if any rule changes it.
    async fn handle_channel_post(&self, post: Message) {
        let Some(body) = post.body() else {
            info!(
                chat = post.chat.id,
                message = post.message_id,
                "Channel post has no text or caption, skipping"
            );
            return;
        };

        let rules = self.rules.snapshot().await;
        let (rewritten, changed) = rewrite(body, &rules);
        if !changed {
            debug!(
                chat = post.chat.id,
                message = post.message_id,
                "No rule changed the post, leaving it untouched"
            );
            return;
        }

        let result = if post.text.is_some() {
            self.api
                .edit_message_text(post.chat.id, post.message_id, &rewritten)
                .await
        } else {
            self.api
                .edit_message_caption(post.chat.id, post.message_id, &rewritten)
                .await
        };

        match result {
            Ok(()) => info!(
                chat = post.chat.id,
                message = post.message_id,
                "Rewrote channel post"
            ),
            // Deleted posts, revoked edit rights and "message is not
            // modified" all land here; none of them is worth a retry.
            Err(e) => error!(
                chat = post.chat.id,
                message = post.message_id,
                "Failed to edit channel post: {e}"
            ),
        }

        tokio::time::sleep(self.edit_cooldown).await;
    }
}

/// Extract the command name from texts like "/start" or
/// "/start@recast_bot now". Returns `None` for plain text, including a
/// bare "/".
fn parse_command(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('/')?;
    let first = rest.split(char::is_whitespace).next()?;
    let name = first.split('@').next()?;
    if name.is_empty() { None } else { Some(name) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_command() {
        assert_eq!(parse_command("/start"), Some("start"));
    }

    #[test]
    fn strips_the_bot_mention() {
        assert_eq!(parse_command("/start@recast_bot"), Some("start"));
    }

    #[test]
    fn ignores_trailing_arguments() {
        assert_eq!(parse_command("/start now please"), Some("start"));
        assert_eq!(parse_command("/stop@recast_bot now"), Some("stop"));
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("yes"), None);
        assert_eq!(parse_command("a/b"), None);
    }

    #[test]
    fn bare_or_spaced_slash_is_not_a_command() {
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command("/ start"), None);
        assert_eq!(parse_command("/@recast_bot"), None);
    }
}
