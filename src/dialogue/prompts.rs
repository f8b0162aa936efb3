//! Fixed prompts and context blocks sent to the completion adapter.

use crate::conversation::ConversationState;

pub const KICKOFF_PROMPT: &str =
    "Start a conversation about creating a morning routine. Ask about current habits.";
pub const KICKOFF_CONTEXT: &str =
    "You are a morning routine expert. Start by asking about the user's current morning habits.";

pub const ACTIVITIES_PROMPT: &str = "Ask about energizing morning activities";
pub const GOALS_PROMPT: &str = "Ask about morning goals";
pub const ROUTINE_PROMPT: &str = "Generate a morning routine";

pub const FOLLOW_UP_PROMPT: &str = "Ask if they want to make any adjustments or need explanations";
pub const FOLLOW_UP_CONTEXT: &str = "You've just provided a morning routine. Ask if they want to make adjustments or need explanations.";

/// Context after the habits answer.
pub fn habits_context(state: &ConversationState) -> String {
    format!("User's current habits: {}", state.current_habits().join(", "))
}

/// Context after the activities answer.
pub fn habits_and_activities_context(state: &ConversationState) -> String {
    format!(
        "User's current habits: {}\nEnergizing activities: {}",
        state.current_habits().join(", "),
        state.energizing_activities().join(", ")
    )
}

/// Context for generating the routine once all three answers are in.
pub fn routine_context(state: &ConversationState) -> String {
    format!(
        "User's current habits: {}\n\
         Energizing activities: {}\n\
         Goals: {}\n\n\
         Create a detailed, personalized morning routine that incorporates these elements.\n\
         Include specific timing suggestions and explain the benefits of each activity.",
        state.current_habits().join(", "),
        state.energizing_activities().join(", "),
        state.goals().join(", ")
    )
}

/// Context for free-form follow-ups: preferences plus the tail of history.
pub fn free_form_context(state: &ConversationState, history_window: usize) -> String {
    let history = state
        .recent_history(history_window)
        .iter()
        .map(|m| m.render())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "User's preferences:\n\
         - Current habits: {}\n\
         - Energizing activities: {}\n\
         - Goals: {}\n\n\
         Previous conversation:\n{}",
        state.current_habits().join(", "),
        state.energizing_activities().join(", "),
        state.goals().join(", "),
        history
    )
}
