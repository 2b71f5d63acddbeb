//! Minimal chat-completion client for OpenAI-compatible providers.
//!
//! Two providers are supported: OpenAI itself and OpenRouter, which proxies
//! many models behind the same wire protocol. Callers hand in a system and
//! a user message and get the raw completion text back.

mod error;
mod types;
mod util;

pub use error::{LlmError, Result};
pub use types::{ChatRequest, ChatResponse, WireMessage};
pub use util::strip_code_blocks;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1";

/// A model that can answer a system + user prompt pair with free text.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Provider label for logs ("openai", "openrouter").
    fn name(&self) -> &'static str;

    /// Model identifier the provider will run.
    fn model(&self) -> &str;

    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String>;
}

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    model: String,
    http: reqwest::Client,
    base_url: String,
}

impl OpenAi {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            http: reqwest::Client::new(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

#[async_trait]
impl ChatCompletion for OpenAi {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .message(WireMessage::system(system))
            .message(WireMessage::user(user))
            .temperature(temperature);
        post_chat(&self.http, &self.base_url, &self.api_key, &request).await
    }
}

#[derive(Clone)]
pub struct OpenRouter {
    api_key: String,
    model: String,
    http: reqwest::Client,
    base_url: String,
}

impl OpenRouter {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            http: reqwest::Client::new(),
            base_url: OPENROUTER_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

#[async_trait]
impl ChatCompletion for OpenRouter {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .message(WireMessage::system(system))
            .message(WireMessage::user(user))
            .temperature(temperature);
        post_chat(&self.http, &self.base_url, &self.api_key, &request).await
    }
}

fn headers(api_key: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| LlmError::Parse(e.to_string()))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

async fn post_chat(
    http: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    request: &ChatRequest,
) -> Result<String> {
    let url = format!("{}/chat/completions", base_url);

    debug!(model = %request.model, "chat completion request");

    let response = http
        .post(&url)
        .headers(headers(api_key)?)
        .json(request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let error_text = response.text().await.unwrap_or_default();
        return Err(error::status_error(status, error_text));
    }

    let chat_response: ChatResponse = response.json().await?;
    chat_response.text().ok_or(LlmError::EmptyCompletion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_defaults() {
        let client = OpenAi::new("sk-test", "gpt-4o-mini");
        assert_eq!(client.name(), "openai");
        assert_eq!(client.model(), "gpt-4o-mini");
        assert_eq!(client.base_url, OPENAI_API_URL);
    }

    #[test]
    fn test_openrouter_defaults() {
        let client = OpenRouter::new("sk-or-test", "deepseek/deepseek-r1:free");
        assert_eq!(client.name(), "openrouter");
        assert_eq!(client.model(), "deepseek/deepseek-r1:free");
        assert_eq!(client.base_url, OPENROUTER_API_URL);
    }

    #[test]
    fn test_with_base_url_override() {
        let client = OpenAi::new("sk-test", "gpt-4o-mini").with_base_url("http://localhost:9999");
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_headers_bearer_auth() {
        let map = headers("sk-test").unwrap();
        assert_eq!(map[AUTHORIZATION], "Bearer sk-test");
        assert_eq!(map[CONTENT_TYPE], "application/json");
    }
}
