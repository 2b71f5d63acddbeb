// Test mocks for the lead pipeline.
//
// Two mocks matching the two trait boundaries:
// - MockSearcher (WebSearcher): HashMap-based query to candidates
// - MockModel (ChatCompletion): canned reply, optional delay or failure
//
// Plus a small helper for building candidates.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use llm_client::{ChatCompletion, LlmError};
use stagescout_common::{Candidate, ScoutError};

use crate::serp::WebSearcher;

// ---------------------------------------------------------------------------
// MockSearcher
// ---------------------------------------------------------------------------

/// HashMap-based searcher. Returns `Err` for unregistered queries, so tests
/// state exactly which queries they expect to run. Registered result lists
/// are truncated to the requested count like the real provider.
pub struct MockSearcher {
    results: HashMap<String, Vec<Candidate>>,
    fail_status: Option<u16>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self {
            results: HashMap::new(),
            fail_status: None,
        }
    }

    /// Searcher that fails every call with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            results: HashMap::new(),
            fail_status: Some(status),
        }
    }

    pub fn on_query(mut self, query: &str, results: Vec<Candidate>) -> Self {
        self.results.insert(query.to_string(), results);
        self
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ScoutError> {
        if let Some(status) = self.fail_status {
            return Err(ScoutError::SearchProvider {
                status,
                message: "MockSearcher: forced failure".to_string(),
            });
        }
        let results = self.results.get(query).cloned().ok_or_else(|| {
            ScoutError::SearchProvider {
                status: 0,
                message: format!("MockSearcher: no results registered for {query}"),
            }
        })?;
        Ok(results.into_iter().take(max_results).collect())
    }
}

// ---------------------------------------------------------------------------
// MockModel
// ---------------------------------------------------------------------------

enum MockReply {
    Text(String),
    RateLimited,
    Failing,
}

/// Canned chat-completion client. `replying` hands back the same text for
/// every call; `with_delay` makes it slow enough to trip timeouts.
pub struct MockModel {
    reply: MockReply,
    delay: Option<Duration>,
}

impl MockModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: MockReply::Text(reply.to_string()),
            delay: None,
        }
    }

    /// Model that fails every call with a rate-limit error.
    pub fn rate_limited() -> Self {
        Self {
            reply: MockReply::RateLimited,
            delay: None,
        }
    }

    /// Model that fails every call with a server error.
    pub fn failing() -> Self {
        Self {
            reply: MockReply::Failing,
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ChatCompletion for MockModel {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(
        &self,
        _system: &str,
        _user: &str,
        _temperature: f32,
    ) -> Result<String, LlmError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::RateLimited => Err(LlmError::RateLimited(
                "MockModel: rate limited".to_string(),
            )),
            MockReply::Failing => Err(LlmError::Api {
                status: 500,
                message: "MockModel: forced failure".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Build a candidate from its three fields.
pub fn candidate(title: &str, link: &str, snippet: &str) -> Candidate {
    Candidate {
        title: title.to_string(),
        snippet: snippet.to_string(),
        link: link.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Mock self-tests
// ---------------------------------------------------------------------------
