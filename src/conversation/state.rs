//! Conversation state: the user's morning preferences plus the message log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Single-line rendering used when feeding history back to the model.
    pub fn render(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.timestamp.to_rfc3339(),
            self.role,
            self.content
        )
    }
}

/// Which intake question is still open.
///
/// Derived from which preference lists are empty; never stored.
/// Progresses linearly: Habits → Activities → Goals → Complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStage {
    Habits,
    Activities,
    Goals,
    Complete,
}

impl std::fmt::Display for IntakeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Habits => "habits",
            Self::Activities => "activities",
            Self::Goals => "goals",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

/// Split a user message into preference items on commas.
///
/// Items are trimmed; empty items are kept so the list is never empty.
pub fn split_preferences(raw: &str) -> Vec<String> {
    raw.split(',').map(|item| item.trim().to_string()).collect()
}

/// Per-session conversation state.
///
/// The three preference lists fill in order and are never overwritten.
/// History is append-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationState {
    current_habits: Vec<String>,
    energizing_activities: Vec<String>,
    goals: Vec<String>,
    history: Vec<Message>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_habits(&self) -> &[String] {
        &self.current_habits
    }

    pub fn energizing_activities(&self) -> &[String] {
        &self.energizing_activities
    }

    pub fn goals(&self) -> &[String] {
        &self.goals
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// The first open intake question, in fixed order.
    pub fn intake_stage(&self) -> IntakeStage {
        if self.current_habits.is_empty() {
            IntakeStage::Habits
        } else if self.energizing_activities.is_empty() {
            IntakeStage::Activities
        } else if self.goals.is_empty() {
            IntakeStage::Goals
        } else {
            IntakeStage::Complete
        }
    }

    /// Fill the list for the current intake stage from a raw message.
    ///
    /// Returns the stage that was answered, or `None` when intake is already
    /// complete (nothing is modified).
    pub fn record_answer(&mut self, raw: &str) -> Option<IntakeStage> {
        let stage = self.intake_stage();
        let slot = match stage {
            IntakeStage::Habits => &mut self.current_habits,
            IntakeStage::Activities => &mut self.energizing_activities,
            IntakeStage::Goals => &mut self.goals,
            IntakeStage::Complete => return None,
        };
        *slot = split_preferences(raw);
        Some(stage)
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.history.push(Message::new(MessageRole::User, content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(Message::new(MessageRole::Assistant, content));
    }

    /// The last `n` history entries, oldest first.
    pub fn recent_history(&self, n: usize) -> &[Message] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_trims_items() {
        assert_eq!(split_preferences("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(split_preferences("  journaling  "), vec!["journaling"]);
        assert_eq!(split_preferences("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn stages_fill_in_order() {
        let mut state = ConversationState::new();
        assert_eq!(state.intake_stage(), IntakeStage::Habits);

        assert_eq!(state.record_answer("coffee, email"), Some(IntakeStage::Habits));
        assert_eq!(state.intake_stage(), IntakeStage::Activities);
        assert!(state.energizing_activities().is_empty());

        assert_eq!(state.record_answer("run"), Some(IntakeStage::Activities));
        assert_eq!(state.record_answer("focus, calm"), Some(IntakeStage::Goals));
        assert_eq!(state.intake_stage(), IntakeStage::Complete);

        assert_eq!(state.current_habits(), ["coffee", "email"]);
        assert_eq!(state.energizing_activities(), ["run"]);
        assert_eq!(state.goals(), ["focus", "calm"]);
    }

    #[test]
    fn complete_intake_is_never_overwritten() {
        let mut state = ConversationState::new();
        state.record_answer("a");
        state.record_answer("b");
        state.record_answer("c");

        assert_eq!(state.record_answer("x, y"), None);
        assert_eq!(state.current_habits(), ["a"]);
        assert_eq!(state.energizing_activities(), ["b"]);
        assert_eq!(state.goals(), ["c"]);
    }

    #[test]
    fn recent_history_takes_tail() {
        let mut state = ConversationState::new();
        for i in 0..7 {
            state.push_user(format!("u{i}"));
        }
        let recent = state.recent_history(5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].content, "u2");
        assert_eq!(recent[4].content, "u6");
        assert_eq!(state.recent_history(50).len(), 7);
    }

    #[test]
    fn message_render_includes_role_and_timestamp() {
        let message = Message::new(MessageRole::Assistant, "Good morning");
        let rendered = message.render();
        assert!(rendered.ends_with("assistant: Good morning"));
        assert!(rendered.starts_with(&format!("[{}]", message.timestamp.to_rfc3339())));
    }

    #[test]
    fn stage_display_matches_serde() {
        for stage in [
            IntakeStage::Habits,
            IntakeStage::Activities,
            IntakeStage::Goals,
            IntakeStage::Complete,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(format!("\"{stage}\""), json);
        }
    }
}
