//! Error types for Morning Assist.

/// Top-level error type for the assistant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Channel-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Failed to send response on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} returned HTTP {status}: {message}")]
    Http {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Prompt blocked by {provider}: {reason}")]
    Blocked { provider: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Search provider errors.
///
/// These never reach the user directly: the search adapter folds them into
/// `SearchOutcome::Unavailable`.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Search request to {provider} failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Search provider {provider} returned HTTP {status}")]
    Http { provider: String, status: u16 },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Could not obtain a search token from {provider}")]
    MissingToken { provider: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_errors_render_with_prefix() {
        let err: Error = ConfigError::MissingEnvVar("GEMINI_API_KEY".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required environment variable: GEMINI_API_KEY"
        );

        let err: Error = LlmError::Blocked {
            provider: "gemini".into(),
            reason: "SAFETY".into(),
        }
        .into();
        assert_eq!(err.to_string(), "LLM error: Prompt blocked by gemini: SAFETY");
    }
}
