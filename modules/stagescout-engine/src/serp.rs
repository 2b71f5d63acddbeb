//! Web search via SerpAPI's Google endpoint.
//!
//! One trait seam (`WebSearcher`) so the pipeline can run against a mock,
//! and one production implementation. Results are normalized into
//! `Candidate`s; entries missing a title or link are provider noise and
//! get dropped here.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use stagescout_common::{Candidate, ScoutError};

const SERPAPI_URL: &str = "https://serpapi.com/search.json";

#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<Candidate>, ScoutError>;
}

// --- SerpAPI implementation ---

pub struct SerpApiSearcher {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, serde::Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SerpApiResult>,
}

#[derive(Debug, serde::Deserialize)]
struct SerpApiResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl SerpApiSearcher {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: SERPAPI_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

fn normalize(response: SerpApiResponse) -> Vec<Candidate> {
    response
        .organic_results
        .into_iter()
        .filter(|r| !r.title.is_empty() && !r.link.is_empty())
        .map(|r| Candidate {
            title: r.title,
            snippet: r.snippet,
            link: r.link,
        })
        .collect()
}

#[async_trait]
impl WebSearcher for SerpApiSearcher {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ScoutError> {
        info!(query, max_results, "SerpAPI search");

        let num = max_results.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("num", num.as_str()),
                ("api_key", self.api_key.as_str()),
                ("hl", "en"),
                ("gl", "us"),
                // Restrict to pages indexed within the last year. Older pages
                // are overwhelmingly past events.
                ("tbs", "qdr:y"),
            ])
            .send()
            .await
            .map_err(|e| ScoutError::SearchProvider {
                status: 0,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScoutError::SearchProvider {
                status: status.as_u16(),
                message,
            });
        }

        let data: SerpApiResponse =
            response
                .json()
                .await
                .map_err(|e| ScoutError::SearchProvider {
                    status: status.as_u16(),
                    message: format!("malformed response: {e}"),
                })?;

        let results = normalize(data);
        info!(query, count = results.len(), "SerpAPI search complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_incomplete_entries() {
        let raw = r#"{
            "organic_results": [
                {"title": "Health Summit 2026", "link": "https://a.org", "snippet": "CFP open"},
                {"title": "", "link": "https://b.org", "snippet": "no title"},
                {"title": "No Link Conf", "snippet": "missing link"}
            ]
        }"#;
        let response: SerpApiResponse = serde_json::from_str(raw).unwrap();
        let candidates = normalize(response);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Health Summit 2026");
        assert_eq!(candidates[0].link, "https://a.org");
    }

    #[test]
    fn test_normalize_tolerates_missing_snippet() {
        let raw = r#"{"organic_results": [{"title": "Conf", "link": "https://a.org"}]}"#;
        let response: SerpApiResponse = serde_json::from_str(raw).unwrap();
        let candidates = normalize(response);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].snippet, "");
    }

    #[test]
    fn test_normalize_empty_payload() {
        let response: SerpApiResponse = serde_json::from_str("{}").unwrap();
        assert!(normalize(response).is_empty());
    }
}
