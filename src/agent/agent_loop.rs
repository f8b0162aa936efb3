//! Main agent loop.
//!
//! Pulls messages from every channel, resolves the conversation session,
//! handles slash commands, and hands everything else to the dialogue
//! controller.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;

use crate::agent::submission::{HELP_TEXT, Submission, SubmissionParser};
use crate::channels::{ChannelManager, IncomingMessage, OutgoingResponse};
use crate::config::AssistantConfig;
use crate::conversation::{ConversationState, SessionStore};
use crate::dialogue::{DialogueController, ReplySink, Welcome, render_routine_summary};
use crate::dialogue::starters::starter;
use crate::error::{ChannelError, Error};
use crate::llm::apology;

/// Sent when a remote client asks the shared assistant to quit.
const REMOTE_QUIT_REPLY: &str =
    "/quit only works from the assistant's terminal. Close this chat to leave.";

/// Replies for one incoming message, routed back to the channel it came from.
struct ChannelSink<'a> {
    channels: &'a ChannelManager,
    message: &'a IncomingMessage,
}

#[async_trait]
impl ReplySink for ChannelSink<'_> {
    async fn send(&mut self, content: String) -> Result<(), ChannelError> {
        let response =
            OutgoingResponse::text(content).in_thread(self.message.thread_id.clone());
        self.channels.respond(self.message, response).await
    }
}

/// The main agent that coordinates all components.
pub struct Agent {
    pub(crate) config: AssistantConfig,
    pub(crate) controller: DialogueController,
    pub(crate) sessions: Arc<SessionStore>,
    pub(crate) channels: Arc<ChannelManager>,
    pub(crate) welcome: Welcome,
}

impl Agent {
    /// Create a new agent.
    ///
    /// `sessions` is shared with the REST routes so they can read the same
    /// conversations the loop writes.
    pub fn new(
        config: AssistantConfig,
        controller: DialogueController,
        channels: ChannelManager,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            config,
            controller,
            sessions,
            channels: Arc::new(channels),
            welcome: Welcome::default(),
        }
    }

    pub fn with_welcome(mut self, welcome: Welcome) -> Self {
        self.welcome = welcome;
        self
    }

    // ── Main loop ───────────────────────────────────────────────────

    /// Run the agent main loop.
    pub async fn run(self) -> Result<(), Error> {
        let mut message_stream = self.channels.start_all().await?;

        tracing::info!(
            channels = ?self.channels.names(),
            "Agent {} ready and listening",
            self.config.name
        );

        loop {
            let message = tokio::select! {
                biased;
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received, shutting down...");
                    break;
                }
                msg = message_stream.next() => {
                    match msg {
                        Some(m) => m,
                        None => {
                            tracing::info!("All channel streams ended, shutting down...");
                            break;
                        }
                    }
                }
            };

            match self.handle_message(&message).await {
                Ok(Some(response)) if !response.is_empty() => {
                    let reply = OutgoingResponse::text(response).in_thread(message.thread_id.clone());
                    if let Err(e) = self.channels.respond(&message, reply).await {
                        tracing::warn!(channel = %message.channel, error = %e, "Failed to send reply");
                    }
                }
                Ok(Some(_)) => {
                    // The controller already delivered its replies.
                }
                Ok(None) => {
                    tracing::info!("Shutdown command received, exiting...");
                    break;
                }
                Err(e) => {
                    tracing::error!(session = %message.session_key(), "Error handling message: {}", e);
                    let reply =
                        OutgoingResponse::text(apology(&e)).in_thread(message.thread_id.clone());
                    let _ = self.channels.respond(&message, reply).await;
                }
            }
        }

        tracing::info!("Agent shutting down...");
        self.channels.shutdown_all().await?;

        Ok(())
    }

    // ── Message dispatch ────────────────────────────────────────────

    /// Handle one message.
    ///
    /// `Some(text)` is a reply for the loop to send (empty when the
    /// controller already sent its own), `None` asks the loop to stop.
    async fn handle_message(&self, message: &IncomingMessage) -> Result<Option<String>, Error> {
        let submission = SubmissionParser::parse(&message.content);
        let session_key = message.session_key();

        tracing::debug!(
            id = %message.id,
            session = %session_key,
            chars = message.content.len(),
            "Received message from {} on {}",
            message.user_id,
            message.channel
        );

        match submission {
            Submission::UserInput { content } => {
                self.process_user_input(message, &session_key, &content).await
            }
            Submission::Starter { index } => match starter(index) {
                Some(s) => self.process_user_input(message, &session_key, s.message).await,
                None => Ok(Some(format!(
                    "There is no starter {index}.\n\n{}",
                    self.welcome.render_starters()
                ))),
            },
            Submission::ListStarters => Ok(Some(self.welcome.render_starters())),
            Submission::Summary => {
                let state = self
                    .sessions
                    .snapshot(&session_key)
                    .await
                    .unwrap_or_else(ConversationState::new);
                Ok(Some(render_routine_summary(&state)))
            }
            Submission::Help => Ok(Some(HELP_TEXT.to_string())),
            Submission::Quit if self.channels.accepts_shutdown(&message.channel) => Ok(None),
            Submission::Quit => {
                tracing::warn!(
                    session = %session_key,
                    channel = %message.channel,
                    "Ignoring /quit from a remote channel"
                );
                Ok(Some(REMOTE_QUIT_REPLY.to_string()))
            }
        }
    }

    // ── User input processing ───────────────────────────────────────

    async fn process_user_input(
        &self,
        message: &IncomingMessage,
        session_key: &str,
        content: &str,
    ) -> Result<Option<String>, Error> {
        let session = self.sessions.get_or_create(session_key).await;
        // Held for the whole turn so a session's turns never interleave.
        let mut state = session.lock().await;

        let mut sink = ChannelSink {
            channels: &self.channels,
            message,
        };
        let intent = self
            .controller
            .handle_turn(&mut state, content, &mut sink)
            .await?;

        tracing::info!(
            session = %session_key,
            intent = intent.name(),
            stage = %state.intake_stage(),
            history = state.history().len(),
            "Turn complete"
        );

        Ok(Some(String::new()))
    }
}
