//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Pause after every edit attempt, successful or not. Keeps the bot
/// under Telegram's per-chat rate limit when posts arrive in bursts.
pub const EDIT_COOLDOWN: Duration = Duration::from_secs(2);

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot API token from @BotFather.
    pub token: SecretString,
    /// Dialog session idle timeout (sessions are pruned after this duration).
    pub session_idle_timeout: Duration,
    /// Pause after each channel post edit attempt.
    pub edit_cooldown: Duration,
}

impl BotConfig {
    /// Config with defaults for everything but the token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            session_idle_timeout: Duration::from_secs(3600), // 1 hour
            edit_cooldown: EDIT_COOLDOWN,
        }
    }

    /// Read configuration from the environment.
    ///
    /// `TELEGRAM_BOT_TOKEN` is required. `RECAST_SESSION_IDLE_SECS`
    /// overrides the one-hour session timeout; unparseable values fall
    /// back to the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("TELEGRAM_BOT_TOKEN".into()))?;

        let idle_secs: u64 = std::env::var("RECAST_SESSION_IDLE_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        Ok(Self {
            session_idle_timeout: Duration::from_secs(idle_secs),
            ..Self::new(token)
        })
    }
}
