//! Content-safety policy sent with every completion request.
//!
//! The policy is fixed: four harm categories, each blocked at medium
//! severity and above. Nothing in the assistant can loosen it.

use serde::{Deserialize, Serialize};

/// Harm categories understood by the completion provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

/// Severity at which the provider starts blocking content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockMediumAndAbove,
}

/// One category/threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// The safety settings attached to every completion request.
pub fn content_filter_policy() -> [SafetySetting; 4] {
    [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ]
    .map(|category| SafetySetting {
        category,
        threshold: HarmBlockThreshold::BlockMediumAndAbove,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_covers_four_categories_at_medium() {
        let policy = content_filter_policy();
        assert_eq!(policy.len(), 4);
        assert!(
            policy
                .iter()
                .all(|s| s.threshold == HarmBlockThreshold::BlockMediumAndAbove)
        );
    }

    #[test]
    fn policy_serializes_to_provider_names() {
        let json = serde_json::to_value(content_filter_policy()).unwrap();
        assert_eq!(json[0]["category"], "HARM_CATEGORY_HARASSMENT");
        assert_eq!(json[1]["category"], "HARM_CATEGORY_HATE_SPEECH");
        assert_eq!(json[2]["category"], "HARM_CATEGORY_SEXUALLY_EXPLICIT");
        assert_eq!(json[3]["category"], "HARM_CATEGORY_DANGEROUS_CONTENT");
        assert_eq!(json[3]["threshold"], "BLOCK_MEDIUM_AND_ABOVE");
    }
}
