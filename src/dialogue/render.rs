//! Text rendering for search results and the local routine template.

use crate::conversation::ConversationState;
use crate::search::{VideoResult, WebResult};

pub const VIDEO_HEADER: &str = "Here are some relevant videos:";
pub const VIDEO_FALLBACK_HEADER: &str = "Here are some motivational morning routine videos:";
pub const NO_VIDEOS_MESSAGE: &str = "I apologize, but I'm having trouble finding videos right now. Would you like to try a different type of search or continue with creating a morning routine?";

pub const WEB_HEADER: &str = "Here are some relevant resources:";
pub const NO_WEB_RESULTS_MESSAGE: &str =
    "I couldn't find any relevant results. Would you like to try a different search query?";

/// Snippets longer than this many characters are cut.
pub const SNIPPET_LIMIT: usize = 200;

pub fn render_videos(header: &str, videos: &[VideoResult]) -> String {
    let mut out = format!("{header}\n\n");
    for video in videos {
        out.push_str(&format!("📺 {}\n", video.title));
        out.push_str(&format!("🔗 {}\n", video.link));
        out.push_str(&format!("⏱️ Duration: {}\n", video.duration));
        out.push_str(&format!("👤 Channel: {}\n\n", video.channel));
    }
    out
}

pub fn render_web_results(results: &[WebResult]) -> String {
    let mut out = format!("{WEB_HEADER}\n\n");
    for result in results {
        out.push_str(&format!("📚 {}\n", result.title));
        out.push_str(&format!("🔗 {}\n", result.link));
        out.push_str(&format!("📝 {}...\n\n", truncate_chars(&result.snippet, SNIPPET_LIMIT)));
    }
    out
}

/// First `max` characters of `s`, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((offset, _)) => &s[..offset],
        None => s,
    }
}

/// Locally rendered routine built from the three preference lists.
///
/// Independent of the model-generated routine; activities come first, then
/// habits, then goals, then a fixed tips block. Sections with no items are
/// left out.
pub fn render_routine_summary(state: &ConversationState) -> String {
    let mut routine = String::from("🌅 Your Personalized Morning Routine:\n\n");

    if !state.energizing_activities().is_empty() {
        routine.push_str("1. Start with energizing activities:\n");
        for activity in state.energizing_activities() {
            routine.push_str(&format!("   - {}\n", activity.trim()));
        }
    }

    if !state.current_habits().is_empty() {
        routine.push_str("\n2. Maintain your current habits:\n");
        for habit in state.current_habits() {
            routine.push_str(&format!("   - {}\n", habit.trim()));
        }
    }

    if !state.goals().is_empty() {
        routine.push_str("\n3. Goal-focused activities:\n");
        for goal in state.goals() {
            routine.push_str(&format!("   - {}\n", goal.trim()));
        }
    }

    routine.push_str("\n💡 Tips:\n");
    routine.push_str("- Wake up at the same time every day\n");
    routine.push_str("- Start with a glass of water\n");
    routine.push_str("- Take small steps to build consistency\n");

    routine
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> ConversationState {
        let mut state = ConversationState::new();
        state.record_answer("meditate, stretch");
        state.record_answer("cold shower");
        state.record_answer("focus");
        state
    }

    #[test]
    fn summary_lists_activities_then_habits_then_goals() {
        let summary = render_routine_summary(&sample_state());

        for item in ["meditate", "stretch", "cold shower", "focus"] {
            assert!(summary.contains(&format!("   - {item}\n")), "missing {item}");
        }
        let activity = summary.find("   - cold shower").unwrap();
        let habit = summary.find("   - meditate").unwrap();
        let goal = summary.find("   - focus").unwrap();
        assert!(activity < habit && habit < goal);

        assert!(summary.ends_with(
            "\n💡 Tips:\n- Wake up at the same time every day\n- Start with a glass of water\n- Take small steps to build consistency\n"
        ));
    }

    #[test]
    fn summary_is_deterministic() {
        let state = sample_state();
        assert_eq!(render_routine_summary(&state), render_routine_summary(&state));
    }

    #[test]
    fn summary_skips_empty_sections() {
        let summary = render_routine_summary(&ConversationState::new());
        assert!(summary.starts_with("🌅 Your Personalized Morning Routine:\n\n"));
        assert!(!summary.contains("energizing activities"));
        assert!(!summary.contains("current habits"));
        assert!(summary.contains("💡 Tips:"));
    }

    #[test]
    fn web_snippets_truncated_by_chars() {
        let long = "é".repeat(250);
        let rendered = render_web_results(&[WebResult {
            title: "T".into(),
            link: "https://t".into(),
            snippet: long,
        }]);
        assert!(rendered.contains(&format!("📝 {}...\n", "é".repeat(200))));
        assert!(!rendered.contains(&"é".repeat(201)));
    }

    #[test]
    fn video_list_has_all_fields() {
        let rendered = render_videos(
            VIDEO_HEADER,
            &[VideoResult {
                title: "5am club".into(),
                link: "https://yt/5am".into(),
                duration: "10:00".into(),
                channel: "Coach".into(),
            }],
        );
        assert_eq!(
            rendered,
            "Here are some relevant videos:\n\n📺 5am club\n🔗 https://yt/5am\n⏱️ Duration: 10:00\n👤 Channel: Coach\n\n"
        );
    }

    #[test]
    fn truncate_short_string_untouched() {
        assert_eq!(truncate_chars("short", 200), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
    }
}
