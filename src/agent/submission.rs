//! Submission types for the chat loop.
//!
//! A submission is either a slash command handled by the agent itself or
//! user input that goes through the dialogue controller.

use serde::{Deserialize, Serialize};

/// Parses user input into Submission types.
pub struct SubmissionParser;

impl SubmissionParser {
    /// Parse message content into a Submission.
    pub fn parse(content: &str) -> Submission {
        let trimmed = content.trim();
        let lower = trimmed.to_lowercase();

        match lower.as_str() {
            "/starters" => Submission::ListStarters,
            "/summary" | "/routine" => Submission::Summary,
            "/help" | "/?" => Submission::Help,
            "/quit" | "/exit" => Submission::Quit,
            _ => parse_starter(&lower).unwrap_or_else(|| Submission::UserInput {
                content: content.to_string(),
            }),
        }
    }
}

/// `/starter <n>`: submit the n-th starter prompt.
fn parse_starter(lower: &str) -> Option<Submission> {
    let rest = lower.strip_prefix("/starter ")?.trim();
    let index = rest.parse::<usize>().ok()?;
    Some(Submission::Starter { index })
}

/// A submission to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Submission {
    /// Text for the dialogue controller.
    UserInput {
        /// The user's message content.
        content: String,
    },

    /// Show the starter prompts.
    ListStarters,

    /// Submit a starter prompt as if the user typed it (1-based).
    Starter { index: usize },

    /// Render the routine template from the session's preferences.
    Summary,

    /// Show the command list.
    Help,

    /// Quit the agent.
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  /starters     list the starter prompts
  /starter N    send starter prompt N
  /summary      show your routine template so far
  /help         show this list
  /quit         exit (terminal only)

Anything else is sent to the assistant. Ask for a video or an article
search at any time, or say \"help me create a morning routine\".";
