//! CLI channel: the terminal is a single conversation session.

use async_trait::async_trait;
use futures::stream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse};
use crate::dialogue::Welcome;
use crate::error::ChannelError;

const CHANNEL_NAME: &str = "cli";
const PROMPT: &str = "> ";

/// Reads turns from stdin and prints replies to stdout.
///
/// Prompts go to stderr so piped output holds only the conversation.
pub struct CliChannel {
    welcome: Welcome,
    user_id: String,
}

impl CliChannel {
    pub fn new(welcome: Welcome) -> Self {
        Self {
            welcome,
            user_id: "local-user".to_string(),
        }
    }
}

/// Forward each non-blank line of `reader` as a message until EOF.
///
/// Lines are sent as typed; intake answers keep their case and spacing.
async fn forward_lines<R>(reader: R, user_id: String, tx: mpsc::UnboundedSender<IncomingMessage>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    eprint!("{PROMPT}");

    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => eprint!("{PROMPT}"),
            Ok(Some(line)) => {
                let msg = IncomingMessage::new(CHANNEL_NAME, user_id.as_str(), line);
                if tx.send(msg).is_err() {
                    break;
                }
            }
            Ok(None) => {
                tracing::debug!("stdin closed");
                break;
            }
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                break;
            }
        }
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    fn accepts_shutdown(&self) -> bool {
        true
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = mpsc::unbounded_channel();

        println!("\n{}", self.welcome.render_text());

        let user_id = self.user_id.clone();
        tokio::spawn(async move {
            forward_lines(BufReader::new(tokio::io::stdin()), user_id, tx).await;
        });

        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|msg| (msg, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn respond(
        &self,
        _msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        println!("\n{}\n", response.content.trim_end());
        eprint!("{PROMPT}");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_lines_are_skipped_and_text_kept_verbatim() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input: &[u8] = b"Coffee,  Reading\n\n   \n/quit\n";

        forward_lines(input, "me".to_string(), tx).await;

        let first = rx.recv().await.unwrap();
        assert_eq!(first.content, "Coffee,  Reading");
        assert_eq!(first.channel, "cli");
        assert_eq!(first.session_key(), "cli:me");
        assert_eq!(rx.recv().await.unwrap().content, "/quit");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn reader_stops_when_receiver_is_gone() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let input: &[u8] = b"one\ntwo\n";
        // Returns instead of looping forever.
        forward_lines(input, "me".to_string(), tx).await;
    }
}
