//! LLM integration for Morning Assist.
//!
//! Talks to Google Gemini's `generateContent` endpoint directly over
//! reqwest. The `CompletionAdapter` is what the dialogue controller calls;
//! it folds every provider failure into an apology string.

pub mod completion;
pub mod gemini;
pub mod provider;

pub use completion::{CompletionAdapter, apology, frame_prompt};
pub use gemini::GeminiProvider;
pub use provider::*;

use std::sync::Arc;

use crate::config::env_lookup;
use crate::error::{ConfigError, LlmError};

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default Gemini API base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: secrecy::SecretString,
    pub model: String,
    pub api_base: String,
}

impl LlmConfig {
    /// Read the provider configuration from the environment.
    ///
    /// `GEMINI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        Ok(Self {
            api_key: secrecy::SecretString::from(api_key),
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: lookup("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = GeminiProvider::new(
        config.api_key.clone(),
        config.model.clone(),
        config.api_base.clone(),
    )?;
    tracing::info!("Using Gemini (model: {})", config.model);
    Ok(Arc::new(provider))
}
