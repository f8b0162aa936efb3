//! Channel trait and the message types that cross it.

use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::Stream;
use uuid::Uuid;

use crate::error::ChannelError;

/// A message received from a user on some channel.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Name of the channel that produced the message.
    pub channel: String,
    pub user_id: String,
    pub content: String,
    /// Channel-level conversation id (one per WebSocket connection).
    pub thread_id: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn new(
        channel: impl Into<String>,
        user_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.into(),
            user_id: user_id.into(),
            content: content.into(),
            thread_id: None,
            received_at: Utc::now(),
        }
    }

    pub fn with_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Key of the conversation session this message belongs to.
    ///
    /// The thread id identifies the session when present, otherwise the user.
    pub fn session_key(&self) -> String {
        match &self.thread_id {
            Some(thread) => format!("{}:{}", self.channel, thread),
            None => format!("{}:{}", self.channel, self.user_id),
        }
    }
}

/// A reply to send back on a channel.
#[derive(Debug, Clone)]
pub struct OutgoingResponse {
    pub content: String,
    pub thread_id: Option<String>,
}

impl OutgoingResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            thread_id: None,
        }
    }

    pub fn in_thread(mut self, thread_id: Option<String>) -> Self {
        self.thread_id = thread_id;
        self
    }
}

/// Stream of incoming messages from a channel.
pub type MessageStream = Pin<Box<dyn Stream<Item = IncomingMessage> + Send>>;

/// A source of user messages and a destination for replies.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// Whether `/quit` from this channel may stop the whole assistant.
    ///
    /// Only a channel owned by the operator should say yes; remote
    /// channels share the process with other users' sessions.
    fn accepts_shutdown(&self) -> bool {
        false
    }

    /// Start receiving. Session-start greetings are the channel's job.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Send a reply to the session that produced `msg`.
    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError>;

    async fn health_check(&self) -> Result<(), ChannelError>;

    async fn shutdown(&self) -> Result<(), ChannelError>;
}
