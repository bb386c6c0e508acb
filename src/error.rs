//! Error types for recast.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Telegram Bot API errors.
///
/// Every variant is terminal for the single call that produced it: the
/// relay logs and moves on, it never retries.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{method} request failed: {reason}")]
    Request { method: String, reason: String },

    #[error("{method} rejected by Telegram (code {code}): {description}")]
    Rejected {
        method: String,
        code: i64,
        description: String,
    },

    #[error("Invalid response from {method}: {reason}")]
    InvalidResponse { method: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_display_carries_method_and_description() {
        let err = ApiError::Rejected {
            method: "editMessageText".into(),
            code: 400,
            description: "message is not modified".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("editMessageText"));
        assert!(msg.contains("400"));
        assert!(msg.contains("message is not modified"));
    }

    #[test]
    fn missing_env_var_names_the_variable() {
        let err = ConfigError::MissingEnvVar("TELEGRAM_BOT_TOKEN".into());
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN"));
    }
}
