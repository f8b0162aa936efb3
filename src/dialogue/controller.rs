//! Dialogue controller: one incoming message in, one or two replies out.

use async_trait::async_trait;

use crate::config::{DEFAULT_HISTORY_WINDOW, DEFAULT_MAX_RESULTS};
use crate::conversation::ConversationState;
use crate::error::{ChannelError, Error};
use crate::llm::CompletionAdapter;
use crate::search::{SearchAdapter, SearchOutcome};

use super::intent::{DEFAULT_VIDEO_QUERY, Intent, classify};
use super::prompts;
use super::render::{
    NO_VIDEOS_MESSAGE, NO_WEB_RESULTS_MESSAGE, VIDEO_FALLBACK_HEADER, VIDEO_HEADER,
    render_videos, render_web_results,
};

/// Where the controller sends replies, in order, as soon as each is ready.
#[async_trait]
pub trait ReplySink: Send {
    async fn send(&mut self, content: String) -> Result<(), ChannelError>;
}

#[async_trait]
impl ReplySink for Vec<String> {
    async fn send(&mut self, content: String) -> Result<(), ChannelError> {
        self.push(content);
        Ok(())
    }
}

/// Routes each message to search, intake, or the model.
///
/// Holds no conversation state of its own; the caller passes the session's
/// `ConversationState` into every turn.
#[derive(Clone)]
pub struct DialogueController {
    completion: CompletionAdapter,
    search: SearchAdapter,
    max_results: usize,
    history_window: usize,
}

impl DialogueController {
    pub fn new(completion: CompletionAdapter, search: SearchAdapter) -> Self {
        Self {
            completion,
            search,
            max_results: DEFAULT_MAX_RESULTS,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    /// Process one user message against `state`.
    ///
    /// The user message is logged before dispatch; each reply is logged
    /// right after the sink accepts it. Returns the intent that handled the
    /// turn.
    pub async fn handle_turn(
        &self,
        state: &mut ConversationState,
        content: &str,
        sink: &mut dyn ReplySink,
    ) -> Result<Intent, Error> {
        state.push_user(content);

        let intent = classify(content, state.intake_stage());
        tracing::debug!(
            intent = intent.name(),
            stage = %state.intake_stage(),
            "Dispatching turn"
        );

        match &intent {
            Intent::Video { query } => {
                let reply = self.video_reply(query).await;
                deliver(state, sink, reply).await?;
            }
            Intent::Search { query } => {
                let reply = self.web_reply(query).await;
                deliver(state, sink, reply).await?;
            }
            Intent::Kickoff => {
                let reply = self
                    .completion
                    .complete(prompts::KICKOFF_PROMPT, prompts::KICKOFF_CONTEXT)
                    .await;
                deliver(state, sink, reply).await?;
            }
            Intent::Habits => {
                state.record_answer(content);
                let reply = self
                    .completion
                    .complete(prompts::ACTIVITIES_PROMPT, &prompts::habits_context(state))
                    .await;
                deliver(state, sink, reply).await?;
            }
            Intent::Activities => {
                state.record_answer(content);
                let reply = self
                    .completion
                    .complete(
                        prompts::GOALS_PROMPT,
                        &prompts::habits_and_activities_context(state),
                    )
                    .await;
                deliver(state, sink, reply).await?;
            }
            Intent::Goals => {
                state.record_answer(content);
                tracing::info!("Intake complete, generating routine");

                let routine = self
                    .completion
                    .complete(prompts::ROUTINE_PROMPT, &prompts::routine_context(state))
                    .await;
                deliver(state, sink, routine).await?;

                let follow_up = self
                    .completion
                    .complete(prompts::FOLLOW_UP_PROMPT, prompts::FOLLOW_UP_CONTEXT)
                    .await;
                deliver(state, sink, follow_up).await?;
            }
            Intent::FreeForm => {
                let context = prompts::free_form_context(state, self.history_window);
                let reply = self.completion.complete(content, &context).await;
                deliver(state, sink, reply).await?;
            }
        }

        Ok(intent)
    }

    async fn video_reply(&self, query: &str) -> String {
        match self.search.search_video(query, self.max_results).await {
            SearchOutcome::Found(videos) => return render_videos(VIDEO_HEADER, &videos),
            SearchOutcome::NoMatches => {
                tracing::info!(query, "No videos found, retrying with default query");
            }
            SearchOutcome::Unavailable(reason) => {
                tracing::info!(query, %reason, "Video search unavailable, retrying with default query");
            }
        }

        match self
            .search
            .search_video(DEFAULT_VIDEO_QUERY, self.max_results)
            .await
        {
            SearchOutcome::Found(videos) => render_videos(VIDEO_FALLBACK_HEADER, &videos),
            SearchOutcome::NoMatches | SearchOutcome::Unavailable(_) => {
                NO_VIDEOS_MESSAGE.to_string()
            }
        }
    }

    async fn web_reply(&self, query: &str) -> String {
        match self.search.search_web(query, self.max_results).await {
            SearchOutcome::Found(results) => render_web_results(&results),
            SearchOutcome::NoMatches => NO_WEB_RESULTS_MESSAGE.to_string(),
            SearchOutcome::Unavailable(reason) => {
                tracing::info!(query, %reason, "Web search unavailable");
                NO_WEB_RESULTS_MESSAGE.to_string()
            }
        }
    }
}

async fn deliver(
    state: &mut ConversationState,
    sink: &mut dyn ReplySink,
    reply: String,
) -> Result<(), Error> {
    sink.send(reply.clone()).await?;
    state.push_assistant(reply);
    Ok(())
}
