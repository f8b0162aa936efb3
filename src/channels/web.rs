//! Web chat channel: one WebSocket connection per conversation session.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use futures::stream;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse};
use crate::conversation::SessionStore;
use crate::dialogue::{Starter, Welcome, starters::starter};
use crate::error::ChannelError;

const CHANNEL_NAME: &str = "web";

// ── JSON Protocol ───────────────────────────────────────────────────────

/// Message from browser client → server.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    /// Free text typed by the user.
    Message { content: String },
    /// A starter shortcut, 1-based; pre-fills the starter's message.
    Starter { index: usize },
}

/// Message from server → browser client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    SessionStart {
        session_id: String,
        greeting: String,
        starters: Vec<Starter>,
    },
    Response {
        content: String,
        session_id: String,
    },
    Error {
        message: String,
    },
}

// ── Shared State ────────────────────────────────────────────────────────

/// Internal state shared between the channel and WS handlers.
struct WebChannelInner {
    /// Sender for incoming messages (WS handler → Channel::start stream).
    incoming_tx: mpsc::UnboundedSender<IncomingMessage>,
    /// Broadcast of replies; each socket keeps only its own session's.
    outgoing_tx: broadcast::Sender<ServerMessage>,
    welcome: Welcome,
    /// A connection's session is dropped from here when it closes.
    sessions: Arc<SessionStore>,
}

/// Axum handler state (cloneable).
#[derive(Clone)]
struct WsState {
    inner: Arc<WebChannelInner>,
}

// ── WebChannel ──────────────────────────────────────────────────────────

/// A WebSocket channel for browser chat.
///
/// - Every connection gets a fresh session id (sent in `session_start`) and
///   is tagged as the thread id of every message it produces, so each
///   connection has its own conversation state.
/// - `respond()` broadcasts; socket tasks drop replies for other sessions.
/// - Closing the connection ends its session.
pub struct WebChannel {
    inner: Arc<WebChannelInner>,
    /// Receiver side of the incoming channel, consumed once in `start()`.
    incoming_rx: Mutex<Option<mpsc::UnboundedReceiver<IncomingMessage>>>,
}

impl WebChannel {
    pub fn new(welcome: Welcome, sessions: Arc<SessionStore>) -> Self {
        let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();
        let (outgoing_tx, _) = broadcast::channel(256);

        let inner = Arc::new(WebChannelInner {
            incoming_tx,
            outgoing_tx,
            welcome,
            sessions,
        });

        Self {
            inner,
            incoming_rx: Mutex::new(Some(incoming_rx)),
        }
    }

    /// Build an Axum router with the `/ws/chat` endpoint.
    ///
    /// Call this once and merge with the main app router.
    pub fn router(&self) -> Router {
        let state = WsState {
            inner: Arc::clone(&self.inner),
        };

        Router::new()
            .route("/ws/chat", get(ws_chat_handler))
            .with_state(state)
    }
}

#[async_trait]
impl Channel for WebChannel {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let rx = self
            .incoming_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| ChannelError::StartupFailed {
                name: CHANNEL_NAME.to_string(),
                reason: "start() already called".to_string(),
            })?;

        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|msg| (msg, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        let session_id = response
            .thread_id
            .or_else(|| msg.thread_id.clone())
            .ok_or_else(|| ChannelError::SendFailed {
                name: CHANNEL_NAME.to_string(),
                reason: "reply has no session id".to_string(),
            })?;

        // No subscribers means the client already disconnected.
        let _ = self.inner.outgoing_tx.send(ServerMessage::Response {
            content: response.content,
            session_id,
        });
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}

// ── WebSocket Handler ───────────────────────────────────────────────────

async fn ws_chat_handler(ws: WebSocketUpgrade, State(state): State<WsState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_chat_socket(socket, state.inner))
}

async fn send_json(socket: &mut WebSocket, msg: &ServerMessage) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to serialize server message");
            true
        }
    }
}

/// Error frame for replies this connection missed by falling behind.
fn lag_notice(missed: u64) -> ServerMessage {
    ServerMessage::Error {
        message: format!(
            "{missed} replies were dropped because the connection fell behind. \
             Send /summary to see your routine so far."
        ),
    }
}

/// Turn a client frame into the text to hand to the assistant.
fn client_content(msg: ClientMessage) -> Result<String, String> {
    match msg {
        ClientMessage::Message { content } => Ok(content.trim().to_string()),
        ClientMessage::Starter { index } => starter(index)
            .map(|s| s.message.to_string())
            .ok_or_else(|| format!("No starter {index}")),
    }
}

async fn handle_chat_socket(mut socket: WebSocket, inner: Arc<WebChannelInner>) {
    let session_id = Uuid::new_v4().to_string();
    info!(session = %session_id, "Web chat client connected");

    // Subscribe before greeting so no reply can slip past.
    let mut outgoing_rx = inner.outgoing_tx.subscribe();

    let start = ServerMessage::SessionStart {
        session_id: session_id.clone(),
        greeting: inner.welcome.greeting.clone(),
        starters: inner.welcome.starters.clone(),
    };
    if !send_json(&mut socket, &start).await {
        return;
    }

    loop {
        tokio::select! {
            result = outgoing_rx.recv() => {
                match result {
                    Ok(msg) => {
                        let mine = matches!(
                            &msg,
                            ServerMessage::Response { session_id: target, .. } if *target == session_id
                        );
                        if mine && !send_json(&mut socket, &msg).await {
                            debug!("Web chat client disconnected during send");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // Some of the missed replies may have been for this session.
                        warn!(session = %session_id, missed = n, "Web chat client lagged behind broadcast");
                        if !send_json(&mut socket, &lag_notice(n)).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Web chat broadcast channel closed");
                        break;
                    }
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        let parsed = serde_json::from_str::<ClientMessage>(&text)
                            .map_err(|e| format!("Invalid message: {e}"))
                            .and_then(client_content);
                        match parsed {
                            Ok(content) if content.is_empty() => continue,
                            Ok(content) => {
                                let msg = IncomingMessage::new(CHANNEL_NAME, "web-user", content)
                                    .with_thread(session_id.clone());
                                if inner.incoming_tx.send(msg).is_err() {
                                    warn!("Web incoming channel closed");
                                    break;
                                }
                            }
                            Err(message) => {
                                debug!(error = %message, "Rejected web client frame");
                                if !send_json(&mut socket, &ServerMessage::Error { message }).await {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Web chat WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    // Same key the agent derives from the message's thread id.
    inner
        .sessions
        .remove(&format!("{CHANNEL_NAME}:{session_id}"))
        .await;
    info!(session = %session_id, "Web chat connection closed");
}
