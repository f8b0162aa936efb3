//! Search adapter: web and video lookups that never fail the caller.
//!
//! A [`SearchProvider`] returns loosely-typed JSON records. The
//! [`SearchAdapter`] normalizes them into [`WebResult`] / [`VideoResult`],
//! skipping records it cannot use, and folds provider errors into
//! [`SearchOutcome::Unavailable`].

pub mod duckduckgo;

pub use duckduckgo::{DuckDuckGo, SearchConfig};

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::SearchError;

/// Fallback title for video records without one.
pub const NO_TITLE: &str = "No title";
/// Fallback link for video records without one.
pub const NO_LINK: &str = "No link";
/// Fallback for missing video duration or channel.
pub const NOT_AVAILABLE: &str = "N/A";

/// A normalized web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// A normalized video search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoResult {
    pub title: String,
    pub link: String,
    pub duration: String,
    pub channel: String,
}

/// Result of a search call.
///
/// `NoMatches` and `Unavailable` render identically to the user; they are
/// kept apart so logs can tell a dead provider from an empty result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<T> {
    Found(Vec<T>),
    NoMatches,
    Unavailable(String),
}

impl<T> SearchOutcome<T> {
    fn from_results(results: Vec<T>) -> Self {
        if results.is_empty() {
            Self::NoMatches
        } else {
            Self::Found(results)
        }
    }

    /// The hits, or an empty list for either failure mode.
    pub fn into_results(self) -> Vec<T> {
        match self {
            Self::Found(results) => results,
            Self::NoMatches | Self::Unavailable(_) => Vec::new(),
        }
    }
}

/// A web/video search backend returning raw provider records.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Text search. Records carry `title`, `href` or `link`, and `body`.
    async fn text(&self, query: &str, max_results: usize) -> Result<Vec<Value>, SearchError>;

    /// Video search. Records carry `title`, `content` or `link`, `duration`,
    /// and `uploader`/`publisher`/`channel`.
    async fn videos(&self, query: &str, max_results: usize) -> Result<Vec<Value>, SearchError>;
}

/// Normalizing, error-swallowing front for a [`SearchProvider`].
#[derive(Clone)]
pub struct SearchAdapter {
    provider: Arc<dyn SearchProvider>,
}

impl SearchAdapter {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    pub async fn search_web(&self, query: &str, max_results: usize) -> SearchOutcome<WebResult> {
        tracing::debug!(provider = self.provider.name(), query, "Web search");
        match self.provider.text(query, max_results).await {
            Ok(records) => SearchOutcome::from_results(
                records
                    .iter()
                    .filter_map(normalize_web)
                    .take(max_results)
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "Web search failed");
                SearchOutcome::Unavailable(e.to_string())
            }
        }
    }

    pub async fn search_video(
        &self,
        query: &str,
        max_results: usize,
    ) -> SearchOutcome<VideoResult> {
        tracing::debug!(provider = self.provider.name(), query, "Video search");
        match self.provider.videos(query, max_results).await {
            Ok(records) => {
                let results: Vec<VideoResult> = records
                    .iter()
                    .filter_map(|record| {
                        let video = normalize_video(record);
                        if video.is_none() {
                            tracing::debug!(%record, "Skipping malformed video record");
                        }
                        video
                    })
                    .take(max_results)
                    .collect();
                tracing::debug!(count = results.len(), "Video search returned");
                SearchOutcome::from_results(results)
            }
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "Video search failed");
                SearchOutcome::Unavailable(e.to_string())
            }
        }
    }
}

fn first_str<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Web records need a title and a link; the snippet may be absent.
fn normalize_web(record: &Value) -> Option<WebResult> {
    Some(WebResult {
        title: first_str(record, &["title"])?.to_string(),
        link: first_str(record, &["href", "link", "url"])?.to_string(),
        snippet: first_str(record, &["body", "snippet"])
            .unwrap_or_default()
            .to_string(),
    })
}

/// Video records only need to be objects; missing fields take fallbacks.
fn normalize_video(record: &Value) -> Option<VideoResult> {
    record.as_object()?;
    Some(VideoResult {
        title: first_str(record, &["title"]).unwrap_or(NO_TITLE).to_string(),
        link: first_str(record, &["content", "link", "url"])
            .unwrap_or(NO_LINK)
            .to_string(),
        duration: first_str(record, &["duration"])
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
        channel: first_str(record, &["uploader", "publisher", "channel"])
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Canned {
        text: Result<Vec<Value>, ()>,
        videos: Result<Vec<Value>, ()>,
    }

    fn down() -> SearchError {
        SearchError::RequestFailed {
            provider: "canned".into(),
            reason: "connection refused".into(),
        }
    }

    #[async_trait]
    impl SearchProvider for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn text(&self, _query: &str, _max: usize) -> Result<Vec<Value>, SearchError> {
            self.text.clone().map_err(|_| down())
        }

        async fn videos(&self, _query: &str, _max: usize) -> Result<Vec<Value>, SearchError> {
            self.videos.clone().map_err(|_| down())
        }
    }

    fn adapter(text: Result<Vec<Value>, ()>, videos: Result<Vec<Value>, ()>) -> SearchAdapter {
        SearchAdapter::new(Arc::new(Canned { text, videos }))
    }

    #[tokio::test]
    async fn web_records_are_normalized_and_capped() {
        let search = adapter(
            Ok(vec![
                json!({"title": "A", "href": "https://a", "body": "alpha"}),
                json!({"title": "B", "link": "https://b"}),
                json!({"title": "C", "href": "https://c", "body": "gamma"}),
                json!({"title": "D", "href": "https://d", "body": "delta"}),
            ]),
            Ok(vec![]),
        );

        let results = search.search_web("q", 3).await.into_results();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].snippet, "alpha");
        assert_eq!(results[1].link, "https://b");
        assert_eq!(results[1].snippet, "");
    }

    #[tokio::test]
    async fn malformed_web_records_are_skipped() {
        let search = adapter(
            Ok(vec![
                json!({"body": "no title or link"}),
                json!("not an object"),
                json!({"title": "Ok", "href": "https://ok"}),
            ]),
            Ok(vec![]),
        );

        let results = search.search_web("q", 3).await.into_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Ok");
    }

    #[tokio::test]
    async fn provider_failure_is_unavailable_not_no_matches() {
        let search = adapter(Err(()), Err(()));

        match search.search_web("q", 3).await {
            SearchOutcome::Unavailable(reason) => assert!(reason.contains("connection refused")),
            other => panic!("expected Unavailable, got {other:?}"),
        }
        assert!(matches!(
            search.search_video("q", 3).await,
            SearchOutcome::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn empty_provider_result_is_no_matches() {
        let search = adapter(Ok(vec![]), Ok(vec![]));
        assert_eq!(search.search_web("q", 3).await, SearchOutcome::NoMatches);
        assert_eq!(search.search_video("q", 3).await, SearchOutcome::NoMatches);
    }

    #[tokio::test]
    async fn video_records_take_fallbacks() {
        let search = adapter(
            Ok(vec![]),
            Ok(vec![
                json!({"title": "Wake up", "content": "https://yt/1", "duration": "5:01", "uploader": "Coach"}),
                json!({}),
                json!(42),
                json!({"title": "Stretch", "link": "https://yt/2", "publisher": "YouTube"}),
            ]),
        );

        let results = search.search_video("q", 3).await.into_results();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].channel, "Coach");
        assert_eq!(
            results[1],
            VideoResult {
                title: NO_TITLE.into(),
                link: NO_LINK.into(),
                duration: NOT_AVAILABLE.into(),
                channel: NOT_AVAILABLE.into(),
            }
        );
        assert_eq!(results[2].link, "https://yt/2");
        assert_eq!(results[2].duration, NOT_AVAILABLE);
    }
}
