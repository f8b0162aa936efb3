//! Completion adapter: one prompt + context in, one displayable string out.

use std::sync::Arc;

use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// Prefix of every completion failure shown to the user.
pub const APOLOGY_PREFIX: &str = "I apologize, but I encountered an error: ";

/// Render an error as the user-facing apology.
pub fn apology(detail: impl std::fmt::Display) -> String {
    format!("{APOLOGY_PREFIX}{detail}")
}

/// Combine context and prompt under the `User:`/`Assistant:` framing.
pub fn frame_prompt(prompt: &str, context: &str) -> String {
    format!("{context}\n\nUser: {prompt}\nAssistant:")
}

/// Wraps an [`LlmProvider`] so that a completion never fails.
///
/// Failures of any kind (auth, quota, safety block, transport) come back as
/// an apology string carrying the error detail. Callers cannot tell a
/// failure from a reply.
#[derive(Clone)]
pub struct CompletionAdapter {
    llm: Arc<dyn LlmProvider>,
}

impl CompletionAdapter {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    pub async fn complete(&self, prompt: &str, context: &str) -> String {
        let request = CompletionRequest::new(vec![ChatMessage::user(frame_prompt(prompt, context))]);
        match self.llm.complete(request).await {
            Ok(response) => response.content,
            Err(e) => {
                tracing::warn!(model = %self.llm.model_name(), error = %e, "Completion failed");
                apology(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::LlmError;
    use crate::llm::{CompletionResponse, FinishReason};

    struct Recording {
        reply: Result<String, String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl LlmProvider for Recording {
        fn model_name(&self) -> &str {
            "recording"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.seen.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    content: text.clone(),
                    input_tokens: 0,
                    output_tokens: 0,
                    finish_reason: FinishReason::Stop,
                    response_id: None,
                }),
                Err(reason) => Err(LlmError::RequestFailed {
                    provider: "recording".into(),
                    reason: reason.clone(),
                }),
            }
        }
    }

    #[test]
    fn framing_matches_layout() {
        assert_eq!(
            frame_prompt("Ask about goals", "Habits: run"),
            "Habits: run\n\nUser: Ask about goals\nAssistant:"
        );
        assert_eq!(frame_prompt("hi", ""), "\n\nUser: hi\nAssistant:");
    }

    #[tokio::test]
    async fn sends_single_framed_user_message() {
        let llm = Arc::new(Recording {
            reply: Ok("What energizes you?".into()),
            seen: Mutex::new(Vec::new()),
        });
        let adapter = CompletionAdapter::new(llm.clone());

        let out = adapter.complete("Ask about energizing morning activities", "ctx").await;
        assert_eq!(out, "What energizes you?");

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].messages.len(), 1);
        assert_eq!(
            seen[0].messages[0].content,
            "ctx\n\nUser: Ask about energizing morning activities\nAssistant:"
        );
    }

    #[tokio::test]
    async fn failure_becomes_apology_with_detail() {
        let adapter = CompletionAdapter::new(Arc::new(Recording {
            reply: Err("quota exhausted".into()),
            seen: Mutex::new(Vec::new()),
        }));

        let out = adapter.complete("hello", "").await;
        assert!(out.starts_with(APOLOGY_PREFIX));
        assert!(out.contains("quota exhausted"));
    }
}
