//! Gemini `generateContent` provider over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, LlmProvider,
};
use crate::safety::{SafetySetting, content_filter_policy};

const PROVIDER: &str = "gemini";

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    response_id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

// ── Provider ────────────────────────────────────────────────────────────

/// Client for the Gemini `generateContent` endpoint.
///
/// Every request carries the fixed content-filter policy from
/// [`crate::safety`]; there is no way to override it per call.
pub struct GeminiProvider {
    client: Client,
    api_key: SecretString,
    model: String,
    api_base: String,
}

impl GeminiProvider {
    pub fn new(
        api_key: SecretString,
        model: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }

    fn build_request(request: &CompletionRequest) -> GenerateContentRequest {
        let contents = request
            .messages
            .iter()
            .map(|message| Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(message.content.clone()),
                }],
            })
            .collect();

        GenerateContentRequest {
            contents,
            safety_settings: content_filter_policy().to_vec(),
        }
    }

    fn parse_response(body: GenerateContentResponse) -> Result<CompletionResponse, LlmError> {
        let usage = body.usage_metadata.unwrap_or_default();

        let Some(candidate) = body.candidates.into_iter().next() else {
            let reason = body
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|reason| LlmError::Blocked {
                    provider: PROVIDER.to_string(),
                    reason,
                })
                .unwrap_or_else(|| LlmError::InvalidResponse {
                    provider: PROVIDER.to_string(),
                    reason: "No candidates in response".to_string(),
                });
            return Err(reason);
        };

        let finish_reason = candidate
            .finish_reason
            .as_deref()
            .map(FinishReason::from_provider)
            .unwrap_or(FinishReason::Stop);

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(if finish_reason == FinishReason::Safety {
                LlmError::Blocked {
                    provider: PROVIDER.to_string(),
                    reason: "response withheld by safety filter".to_string(),
                }
            } else {
                LlmError::InvalidResponse {
                    provider: PROVIDER.to_string(),
                    reason: "Candidate contained no text".to_string(),
                }
            });
        }

        Ok(CompletionResponse {
            content: text,
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
            finish_reason,
            response_id: body.response_id,
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::build_request(&request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| LlmError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: format!("Failed to read response: {e}"),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) if !envelope.error.status.is_empty() => {
                    format!("{} ({})", envelope.error.message, envelope.error.status)
                }
                Ok(envelope) => envelope.error.message,
                Err(_) => text,
            };
            return Err(LlmError::Http {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)?;
        let completion = Self::parse_response(parsed)?;
        tracing::debug!(
            model = %self.model,
            input_tokens = completion.input_tokens,
            output_tokens = completion.output_tokens,
            "Gemini completion finished"
        );
        Ok(completion)
    }
}
