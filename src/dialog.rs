//! Operator configuration dialog.
//!
//! A guided conversation that collects find/replace rules: `/start` opens
//! a session, then the bot alternates between asking for the text to find
//! and its replacement until the operator answers anything but "yes" to
//! the add-another question. Dialog state is an explicit enum value per
//! operator rather than suspended control flow, so it can be driven one
//! message at a time and tested with a plain list of inputs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::rules::RuleStore;

/// Prompt sent when a session opens.
pub const WELCOME_PROMPT: &str = "Welcome! Please enter the text you want to replace:";

/// Prompt sent when the operator asked for another rule.
pub const NEXT_FIND_PROMPT: &str = "Please enter the next text you want to replace:";

/// Reply sent when the dialog completes.
pub const DONE_REPLY: &str = "Replacement setup is complete! Your bot is now ready to replace text.";

/// Where an operator is in the rule-collection conversation.
///
/// The idle state is the absence of a session: a `DialogState` value only
/// exists between `/start` and the completion reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    /// Waiting for the text to replace.
    AwaitFind,
    /// Waiting for the replacement for `find`.
    AwaitReplace { find: String },
    /// Waiting for a yes/no answer to the add-another question.
    AwaitMore,
}

/// Everything one dialog step produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Follow-up state, or `None` when the session ended.
    pub next: Option<DialogState>,
    /// Reply to send back to the operator, if any.
    pub reply: Option<String>,
    /// Completed find/replace pair to upsert, if any.
    pub rule: Option<(String, String)>,
}

impl DialogState {
    /// Advance the machine with one plain text message from the operator.
    ///
    /// Pure: returns the follow-up state and effects, touches nothing.
    /// There is no failure path. Every text is acceptable input, and a
    /// non-"yes" answer to the add-another question simply means "no".
    pub fn advance(self, text: &str) -> Step {
        match self {
            DialogState::AwaitFind => {
                // An empty message must not become an empty rule: stay put.
                if text.is_empty() {
                    return Step {
                        next: Some(DialogState::AwaitFind),
                        reply: None,
                        rule: None,
                    };
                }
                Step {
                    reply: Some(format!(
                        "You want to replace: '{text}'. Now, enter the replacement text:"
                    )),
                    next: Some(DialogState::AwaitReplace {
                        find: text.to_owned(),
                    }),
                    rule: None,
                }
            }
            DialogState::AwaitReplace { find } => Step {
                reply: Some(format!(
                    "Replacement setup: '{find}' will be replaced with '{text}'.\n\
                     Do you want to add another replacement? (yes/no)"
                )),
                rule: Some((find, text.to_owned())),
                next: Some(DialogState::AwaitMore),
            },
            DialogState::AwaitMore => {
                if text.to_lowercase() == "yes" {
                    Step {
                        reply: Some(NEXT_FIND_PROMPT.to_owned()),
                        next: Some(DialogState::AwaitFind),
                        rule: None,
                    }
                } else {
                    Step {
                        reply: Some(DONE_REPLY.to_owned()),
                        next: None,
                        rule: None,
                    }
                }
            }
        }
    }
}

/// One operator's in-flight session.
#[derive(Debug)]
struct DialogSession {
    state: DialogState,
    last_activity: Instant,
}

/// Per-operator dialog sessions, keyed by the operator's private chat id.
///
/// Sessions are independent across operators, but every completed rule
/// pair lands in the one shared [`RuleStore`]. A session has no timeout of
/// its own; the relay periodically calls [`prune_idle`](Self::prune_idle)
/// so stalled sessions do not accumulate forever.
pub struct SessionRegistry {
    rules: Arc<RuleStore>,
    sessions: RwLock<HashMap<i64, DialogSession>>,
}

impl SessionRegistry {
    /// Create a registry feeding the given rule store.
    pub fn new(rules: Arc<RuleStore>) -> Arc<Self> {
        Arc::new(Self {
            rules,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Handle `/start`: open a session unless one is already active.
    ///
    /// Returns the welcome prompt, or `None` when the command is ignored
    /// because the operator is already mid-dialog.
    pub async fn start(&self, operator: i64) -> Option<String> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&operator) {
            debug!(operator, "/start ignored, session already active");
            return None;
        }

        info!(operator, "Dialog session opened");
        sessions.insert(
            operator,
            DialogSession {
                state: DialogState::AwaitFind,
                last_activity: Instant::now(),
            },
        );
        Some(WELCOME_PROMPT.to_owned())
    }

    /// Feed one plain text message into the operator's session.
    ///
    /// Returns the reply to send, or `None` when there is no active
    /// session (the text is simply ignored) or the step produced no
    /// reply. A rule pair completed by the step is upserted into the
    /// shared store before this returns.
    pub async fn handle_text(&self, operator: i64, text: &str) -> Option<String> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.remove(&operator)?;

        let step = session.state.advance(text);

        if let Some((find, replace)) = step.rule {
            self.rules.upsert(find, replace).await;
        }

        match step.next {
            Some(state) => {
                sessions.insert(
                    operator,
                    DialogSession {
                        state,
                        last_activity: Instant::now(),
                    },
                );
            }
            None => {
                info!(operator, "Dialog session completed");
            }
        }

        step.reply
    }

    /// Whether the operator currently has a session.
    pub async fn is_active(&self, operator: i64) -> bool {
        self.sessions.read().await.contains_key(&operator)
    }

    /// Number of active sessions.
    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions idle longer than `max_idle`.
    ///
    /// Returns how many were removed. Evicted operators get no
    /// notification; their next `/start` simply begins a fresh session.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_activity.elapsed() <= max_idle);
        let removed = before - sessions.len();
        if removed > 0 {
            info!(removed, "Evicted idle dialog sessions");
        }
        removed
    }
}
