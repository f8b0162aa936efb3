//! DuckDuckGo search provider.
//!
//!   text:   scrapes the HTML endpoint (no API key required)
//!   videos: fetches a `vqd` token from the main page, then calls `v.js`

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use serde_json::{Value, json};

use crate::config::env_lookup;
use crate::error::SearchError;
use crate::search::SearchProvider;

const PROVIDER: &str = "duckduckgo";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static VQD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"vqd=["']?([0-9-]+)["']?"#).expect("vqd pattern is valid")
});

/// Endpoints used by the DuckDuckGo provider.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base of the HTML results endpoint.
    pub html_base: String,
    /// Base of the main site (token page and `v.js`).
    pub api_base: String,
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            html_base: "https://html.duckduckgo.com".to_string(),
            api_base: "https://duckduckgo.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            html_base: env_lookup("DUCKDUCKGO_HTML_BASE").unwrap_or(defaults.html_base),
            api_base: env_lookup("DUCKDUCKGO_API_BASE").unwrap_or(defaults.api_base),
            ..defaults
        }
    }
}

/// DuckDuckGo-backed [`SearchProvider`].
pub struct DuckDuckGo {
    client: Client,
    html_base: String,
    api_base: String,
}

impl DuckDuckGo {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| request_failed(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            html_base: config.html_base.trim_end_matches('/').to_string(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, SearchError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("Referer", format!("{}/", self.api_base))
            .send()
            .await
            .map_err(|e| request_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| request_failed(format!("Failed to read response: {e}")))
    }

    async fn vqd_token(&self, query: &str) -> Result<String, SearchError> {
        let page = self
            .get_text(&format!("{}/", self.api_base), &[("q", query)])
            .await?;
        extract_vqd(&page).ok_or_else(|| SearchError::MissingToken {
            provider: PROVIDER.to_string(),
        })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGo {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn text(&self, query: &str, max_results: usize) -> Result<Vec<Value>, SearchError> {
        let html = self
            .get_text(&format!("{}/html/", self.html_base), &[("q", query)])
            .await?;
        Ok(parse_html_results(&html, max_results))
    }

    async fn videos(&self, query: &str, max_results: usize) -> Result<Vec<Value>, SearchError> {
        let vqd = self.vqd_token(query).await?;
        let body = self
            .get_text(
                &format!("{}/v.js", self.api_base),
                &[
                    ("l", "us-en"),
                    ("o", "json"),
                    ("q", query),
                    ("vqd", vqd.as_str()),
                    ("f", ",,,"),
                    ("p", "-1"),
                ],
            )
            .await?;

        let parsed: Value = serde_json::from_str(&body).map_err(|e| SearchError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: e.to_string(),
        })?;

        let results = parsed
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| SearchError::InvalidResponse {
                provider: PROVIDER.to_string(),
                reason: "missing results array".to_string(),
            })?;

        Ok(results.iter().take(max_results).cloned().collect())
    }
}

fn request_failed(reason: String) -> SearchError {
    SearchError::RequestFailed {
        provider: PROVIDER.to_string(),
        reason,
    }
}

fn extract_vqd(page: &str) -> Option<String> {
    VQD_PATTERN
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// DuckDuckGo wraps result links in a `/l/?uddg=<target>` redirect.
fn unwrap_redirect(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    url::Url::parse(&absolute)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, target)| target.into_owned())
        })
        .unwrap_or(absolute)
}

/// Parse the HTML results page into `{title, href, body}` records.
fn parse_html_results(html: &str, limit: usize) -> Vec<Value> {
    let document = Html::parse_document(html);
    let (Ok(result_sel), Ok(title_sel), Ok(snippet_sel)) = (
        Selector::parse(".result"),
        Selector::parse("a.result__a"),
        Selector::parse(".result__snippet"),
    ) else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for element in document.select(&result_sel) {
        if records.len() >= limit {
            break;
        }
        let Some(anchor) = element.select(&title_sel).next() else {
            continue;
        };
        let title = anchor.text().collect::<String>().trim().to_string();
        let href = anchor
            .value()
            .attr("href")
            .map(unwrap_redirect)
            .unwrap_or_default();
        let body = element
            .select(&snippet_sel)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        // Link-less hits are dropped later, so they must not use up the limit.
        if title.is_empty() || href.is_empty() {
            continue;
        }
        records.push(json!({ "title": title, "href": href, "body": body }));
    }
    records
}
