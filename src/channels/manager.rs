//! ChannelManager: merges channel streams and routes replies by name.

use futures::stream;

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse};
use crate::error::ChannelError;

/// Owns every active channel.
#[derive(Default)]
pub struct ChannelManager {
    channels: Vec<Box<dyn Channel>>,
}

impl ChannelManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, channel: Box<dyn Channel>) {
        self.channels.push(channel);
    }

    pub fn names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Whether the named channel may shut the assistant down.
    pub fn accepts_shutdown(&self, name: &str) -> bool {
        self.channels
            .iter()
            .any(|c| c.name() == name && c.accepts_shutdown())
    }

    /// Start every channel and merge their streams.
    pub async fn start_all(&self) -> Result<MessageStream, ChannelError> {
        let mut streams = Vec::with_capacity(self.channels.len());
        for channel in &self.channels {
            let stream = channel.start().await?;
            tracing::info!(channel = channel.name(), "Channel started");
            streams.push(stream);
        }
        Ok(Box::pin(stream::select_all(streams)))
    }

    /// Send a reply on the channel the message arrived on.
    pub async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        let channel = self
            .channels
            .iter()
            .find(|c| c.name() == msg.channel)
            .ok_or_else(|| ChannelError::UnknownChannel(msg.channel.clone()))?;
        channel.respond(msg, response).await
    }

    pub async fn shutdown_all(&self) -> Result<(), ChannelError> {
        for channel in &self.channels {
            if let Err(e) = channel.shutdown().await {
                tracing::warn!(channel = channel.name(), error = %e, "Channel shutdown failed");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use futures::StreamExt;

    use super::*;

    struct Fixed {
        name: &'static str,
        inbox: Vec<&'static str>,
        sent: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Channel for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        async fn start(&self) -> Result<MessageStream, ChannelError> {
            let name = self.name;
            let msgs: Vec<IncomingMessage> = self
                .inbox
                .iter()
                .map(|c| IncomingMessage::new(name, "u", *c))
                .collect();
            Ok(Box::pin(stream::iter(msgs)))
        }

        async fn respond(
            &self,
            _msg: &IncomingMessage,
            response: OutgoingResponse,
        ) -> Result<(), ChannelError> {
            self.sent.lock().unwrap().push(response.content);
            Ok(())
        }

        async fn health_check(&self) -> Result<(), ChannelError> {
            Ok(())
        }

        async fn shutdown(&self) -> Result<(), ChannelError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn merges_streams_and_routes_by_channel() {
        let a_sent = Arc::new(Mutex::new(Vec::new()));
        let b_sent = Arc::new(Mutex::new(Vec::new()));

        let mut manager = ChannelManager::new();
        manager.add(Box::new(Fixed {
            name: "a",
            inbox: vec!["one", "two"],
            sent: a_sent.clone(),
        }));
        manager.add(Box::new(Fixed {
            name: "b",
            inbox: vec!["three"],
            sent: b_sent.clone(),
        }));
        assert_eq!(manager.names(), vec!["a", "b"]);

        let all: Vec<IncomingMessage> = manager.start_all().await.unwrap().collect().await;
        assert_eq!(all.len(), 3);

        let from_b = all.iter().find(|m| m.channel == "b").unwrap();
        manager
            .respond(from_b, OutgoingResponse::text("reply"))
            .await
            .unwrap();
        assert!(a_sent.lock().unwrap().is_empty());
        assert_eq!(b_sent.lock().unwrap().as_slice(), ["reply"]);
    }

    #[test]
    fn shutdown_is_opt_in_per_channel() {
        let mut manager = ChannelManager::new();
        manager.add(Box::new(Fixed {
            name: "remote",
            inbox: vec![],
            sent: Arc::new(Mutex::new(Vec::new())),
        }));
        manager.add(Box::new(crate::channels::CliChannel::new(
            crate::dialogue::Welcome::default(),
        )));

        assert!(!manager.accepts_shutdown("remote"));
        assert!(manager.accepts_shutdown("cli"));
        assert!(!manager.accepts_shutdown("ghost"));
    }

    #[tokio::test]
    async fn unknown_channel_is_an_error() {
        let manager = ChannelManager::new();
        let err = manager
            .respond(
                &IncomingMessage::new("ghost", "u", "hi"),
                OutgoingResponse::text("x"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ChannelError::UnknownChannel(_)));
    }
}
