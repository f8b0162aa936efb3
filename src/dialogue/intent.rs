//! Keyword intent classification.
//!
//! Matching is plain case-insensitive substring search, evaluated in a fixed
//! priority order: video, web search, routine kickoff, then the open intake
//! question, then free-form. "look for a video" matches both the video and
//! the search keywords; video wins because it is checked first.

use serde::Serialize;

use crate::conversation::IntakeStage;

/// Any of these routes the message to video search.
pub const VIDEO_KEYWORDS: [&str; 3] = ["youtube", "video", "watch"];

/// Removed from a video request to derive the query.
pub const VIDEO_STRIP_WORDS: [&str; 5] = ["youtube", "video", "watch", "find", "search"];

/// Any of these routes the message to web search (and is removed from the query).
pub const SEARCH_KEYWORDS: [&str; 3] = ["search", "find", "look for"];

/// Starts the routine conversation without touching state.
pub const KICKOFF_PHRASE: &str = "help me create a personalized morning routine";

pub const DEFAULT_VIDEO_QUERY: &str = "morning routine motivation";
pub const DEFAULT_WEB_QUERY: &str = "morning routine tips";

/// Filler left at the front of a query once the keyword is gone ("find me ...").
const LEADING_FILLERS: [&str; 1] = ["me"];

/// What a single incoming message asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Video { query: String },
    Search { query: String },
    Kickoff,
    Habits,
    Activities,
    Goals,
    FreeForm,
}

impl Intent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Video { .. } => "video",
            Self::Search { .. } => "search",
            Self::Kickoff => "kickoff",
            Self::Habits => "habits",
            Self::Activities => "activities",
            Self::Goals => "goals",
            Self::FreeForm => "free_form",
        }
    }
}

/// Classify a message given the current intake stage.
pub fn classify(message: &str, stage: IntakeStage) -> Intent {
    let lowered = message.to_lowercase();

    if VIDEO_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return Intent::Video {
            query: derive_query(&lowered, &VIDEO_STRIP_WORDS, DEFAULT_VIDEO_QUERY),
        };
    }

    if SEARCH_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return Intent::Search {
            query: derive_query(&lowered, &SEARCH_KEYWORDS, DEFAULT_WEB_QUERY),
        };
    }

    if lowered.contains(KICKOFF_PHRASE) {
        return Intent::Kickoff;
    }

    match stage {
        IntakeStage::Habits => Intent::Habits,
        IntakeStage::Activities => Intent::Activities,
        IntakeStage::Goals => Intent::Goals,
        IntakeStage::Complete => Intent::FreeForm,
    }
}

/// Remove every occurrence of each keyword, tidy whitespace, and fall back
/// to `default` when nothing is left.
pub fn derive_query(lowered: &str, strip: &[&str], default: &str) -> String {
    let mut query = lowered.to_string();
    for keyword in strip {
        query = query.replace(keyword, "").trim().to_string();
    }

    let mut words: Vec<&str> = query.split_whitespace().collect();
    while words
        .first()
        .is_some_and(|w| LEADING_FILLERS.contains(w))
    {
        words.remove(0);
    }

    if words.is_empty() {
        default.to_string()
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_beats_search() {
        let intent = classify("Look for a video about stretching", IntakeStage::Habits);
        assert!(matches!(intent, Intent::Video { .. }));

        let intent = classify("search youtube for yoga", IntakeStage::Complete);
        assert_eq!(
            intent,
            Intent::Video {
                query: "for yoga".to_string()
            }
        );
    }

    #[test]
    fn every_video_keyword_triggers_video() {
        for msg in ["YouTube please", "a short video", "what should I watch"] {
            assert!(
                matches!(classify(msg, IntakeStage::Goals), Intent::Video { .. }),
                "{msg} should be a video request"
            );
        }
    }

    #[test]
    fn search_query_strips_keyword_and_filler() {
        assert_eq!(
            classify("find me articles on sleep", IntakeStage::Habits),
            Intent::Search {
                query: "articles on sleep".to_string()
            }
        );
        assert_eq!(
            classify("Look for cold shower benefits", IntakeStage::Complete),
            Intent::Search {
                query: "cold shower benefits".to_string()
            }
        );
    }

    #[test]
    fn bare_keywords_fall_back_to_defaults() {
        assert_eq!(
            classify("YouTube", IntakeStage::Habits),
            Intent::Video {
                query: DEFAULT_VIDEO_QUERY.to_string()
            }
        );
        assert_eq!(
            classify("search", IntakeStage::Habits),
            Intent::Search {
                query: DEFAULT_WEB_QUERY.to_string()
            }
        );
        assert_eq!(
            classify("find me", IntakeStage::Habits),
            Intent::Search {
                query: DEFAULT_WEB_QUERY.to_string()
            }
        );
    }

    #[test]
    fn kickoff_phrase_is_case_insensitive() {
        let msg = "Can you Help me create a personalized morning routine?";
        assert_eq!(classify(msg, IntakeStage::Habits), Intent::Kickoff);
        assert_eq!(classify(msg, IntakeStage::Complete), Intent::Kickoff);
    }

    #[test]
    fn plain_messages_follow_intake_stage() {
        assert_eq!(classify("coffee, email", IntakeStage::Habits), Intent::Habits);
        assert_eq!(classify("run", IntakeStage::Activities), Intent::Activities);
        assert_eq!(classify("focus", IntakeStage::Goals), Intent::Goals);
        assert_eq!(classify("thanks!", IntakeStage::Complete), Intent::FreeForm);
    }

    #[test]
    fn substring_matching_is_literal() {
        // "stopwatch" contains "watch"
        assert!(matches!(
            classify("I use a stopwatch", IntakeStage::Habits),
            Intent::Video { .. }
        ));
    }

    #[test]
    fn filler_only_stripped_at_front() {
        assert_eq!(
            derive_query("find tips for me", &SEARCH_KEYWORDS, DEFAULT_WEB_QUERY),
            "tips for me"
        );
    }
}
