//! Candidate enrichment: model-backed extraction with a deterministic fallback.
//!
//! Each search candidate is shown to a chat model that returns one strict JSON
//! object describing the event. Any failure on that path (timeout, provider
//! error, malformed or invalid JSON) downgrades the candidate to the keyword
//! heuristic instead of aborting the run.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use llm_client::{strip_code_blocks, ChatCompletion, LlmError, OpenAi, OpenRouter};
use stagescout_common::{Candidate, Config, PaysSpeakers};

use crate::heuristic::heuristic_extract;

const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
const OPENROUTER_DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";

const MODEL_TEMPERATURE: f32 = 0.2;

/// Per-request toggles that shape both the model prompt and the heuristic.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub prioritize_healthcare: bool,
    pub prioritize_texas: bool,
}

/// Fields recovered for one candidate, by whichever strategy ran.
///
/// Dates are ISO `YYYY-MM-DD` strings, already validated when they came from
/// a model. `score` is the strategy's own 0-100 estimate; regional
/// adjustments are applied later and may push it outside that band.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub event_name: Option<String>,
    pub organizer: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub cfp_deadline: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub contact_url: Option<String>,
    pub pays_speakers: PaysSpeakers,
    pub verticals: Vec<String>,
    pub score: f64,
    pub is_future: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Provider error: {0}")]
    Provider(#[from] LlmError),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("No JSON object in model output")]
    MalformedResponse,
    #[error("Response failed validation: {0}")]
    Validation(String),
}

impl ExtractError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ExtractError::Provider(LlmError::RateLimited(_)))
    }
}

/// One extraction strategy backed by a model.
#[async_trait]
pub trait ModelExtractor: Send + Sync {
    /// Short label for logs ("openai:gpt-4o-mini").
    fn label(&self) -> String;

    async fn try_extract(
        &self,
        candidate: &Candidate,
        opts: ExtractOptions,
    ) -> Result<ExtractedFields, ExtractError>;
}

/// What the model must return for each candidate.
#[derive(Debug, Deserialize, JsonSchema)]
struct ModelAnswer {
    /// Official event name, if the page names one
    event_name: Option<String>,
    /// Hosting organization or association
    organizer: Option<String>,
    /// Event start date, YYYY-MM-DD
    start_date: Option<String>,
    /// Event end date, YYYY-MM-DD
    end_date: Option<String>,
    /// Speaker/CFP submission deadline, YYYY-MM-DD
    cfp_deadline: Option<String>,
    city: Option<String>,
    /// State or province
    state: Option<String>,
    country: Option<String>,
    /// URL for speaker submissions or organizer contact
    contact_url: Option<String>,
    /// "yes", "no", or "unknown"
    pays_speakers: Option<PaysSpeakers>,
    /// Topic tracks such as "Healthcare" or "Leadership"
    #[serde(default)]
    verticals: Vec<String>,
    /// Lead quality, 0-100
    score: Option<f64>,
    /// Whether the event is still upcoming relative to TODAY
    is_future: Option<bool>,
}

/// Candidate payload sent as the user message, mirroring the request toggles.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskPayload<'a> {
    title: &'a str,
    snippet: &'a str,
    url: &'a str,
    prioritize_healthcare: bool,
    prioritize_texas: bool,
}

const SYSTEM_PROMPT: &str = r#"You are a precise event extractor working for a nonprofit keynote speaker focused on medical missions, healthcare, leadership, and corporate social responsibility (CSR).

You receive one web search result (title, snippet, url). Decide whether it points to a conference, call for speakers, or similar speaking opportunity, and fill in every field you can.

Rules:
- Return STRICT JSON only: a single object matching the schema below. No prose, no markdown fences.
- Output all dates as YYYY-MM-DD. Compute is_future by comparing the event dates to TODAY.
- If the page is a recap, highlights reel, or past edition, set is_future=false unless it clearly announces the next edition with future dates.
- score is 0-100 for how promising this lead is. Boost healthcare, medical associations, leadership, and CSR events; when the request prioritizes Texas, give an extra boost to Texas events (Dallas, DFW, Houston, Austin, San Antonio, Fort Worth)."#;

fn system_prompt(schema: &str, today: &str) -> String {
    format!("{SYSTEM_PROMPT}\n\nTODAY={today}\n\nSchema:\n{schema}")
}

/// Pull the outermost `{...}` block out of free text. Models sometimes wrap
/// the object in explanation even when told not to.
fn json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn parse_model_reply(reply: &str) -> Result<ModelAnswer, ExtractError> {
    let cleaned = strip_code_blocks(reply);
    let block = json_block(cleaned).ok_or(ExtractError::MalformedResponse)?;
    let value: serde_json::Value =
        serde_json::from_str(block).map_err(|_| ExtractError::MalformedResponse)?;
    serde_json::from_value(value).map_err(|e| ExtractError::Validation(e.to_string()))
}

fn valid_iso_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn validate(answer: ModelAnswer) -> Result<ExtractedFields, ExtractError> {
    let score = answer
        .score
        .ok_or_else(|| ExtractError::Validation("score is required".to_string()))?;
    if !(0.0..=100.0).contains(&score) {
        return Err(ExtractError::Validation(format!(
            "score {score} outside 0-100"
        )));
    }

    for (field, value) in [
        ("start_date", &answer.start_date),
        ("end_date", &answer.end_date),
        ("cfp_deadline", &answer.cfp_deadline),
    ] {
        if let Some(date) = value {
            if !valid_iso_date(date) {
                return Err(ExtractError::Validation(format!(
                    "{field} {date:?} is not YYYY-MM-DD"
                )));
            }
        }
    }

    Ok(ExtractedFields {
        event_name: answer.event_name,
        organizer: answer.organizer,
        start_date: answer.start_date,
        end_date: answer.end_date,
        cfp_deadline: answer.cfp_deadline,
        city: answer.city,
        state: answer.state,
        country: answer.country,
        contact_url: answer.contact_url,
        pays_speakers: answer.pays_speakers.unwrap_or_default(),
        verticals: answer.verticals,
        score,
        is_future: answer.is_future,
    })
}

/// [`ModelExtractor`] over any chat-completion client.
pub struct LlmExtractor<C> {
    client: C,
    timeout: Duration,
    schema: String,
}

impl<C: ChatCompletion> LlmExtractor<C> {
    pub fn new(client: C, timeout: Duration) -> Self {
        let schema = serde_json::to_string(&schema_for!(ModelAnswer)).expect("schema serializes");
        Self {
            client,
            timeout,
            schema,
        }
    }
}

#[async_trait]
impl<C: ChatCompletion> ModelExtractor for LlmExtractor<C> {
    fn label(&self) -> String {
        format!("{}:{}", self.client.name(), self.client.model())
    }

    async fn try_extract(
        &self,
        candidate: &Candidate,
        opts: ExtractOptions,
    ) -> Result<ExtractedFields, ExtractError> {
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let system = system_prompt(&self.schema, &today);
        let payload = TaskPayload {
            title: &candidate.title,
            snippet: &candidate.snippet,
            url: &candidate.link,
            prioritize_healthcare: opts.prioritize_healthcare,
            prioritize_texas: opts.prioritize_texas,
        };
        let user = serde_json::to_string(&payload).expect("payload serializes");

        debug!(
            model = self.client.model(),
            link = candidate.link.as_str(),
            "model extraction request"
        );

        let reply = tokio::time::timeout(
            self.timeout,
            self.client.complete(&system, &user, MODEL_TEMPERATURE),
        )
        .await
        .map_err(|_| ExtractError::Timeout(self.timeout))??;

        validate(parse_model_reply(&reply)?)
    }
}

/// Which strategy produced the fields for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPath {
    Model,
    Heuristic,
}

/// Ordered extraction strategies with the keyword heuristic as the floor.
///
/// Models are tried in order; the first clean answer wins. The heuristic is
/// not part of the list because it cannot fail.
pub struct Extractor {
    models: Vec<Arc<dyn ModelExtractor>>,
}

impl Extractor {
    pub fn new(models: Vec<Arc<dyn ModelExtractor>>) -> Self {
        Self { models }
    }

    /// No model strategies at all. Every candidate takes the heuristic path.
    pub fn heuristic_only() -> Self {
        Self { models: Vec::new() }
    }

    /// Resolve strategies from the environment-backed config.
    ///
    /// An explicit `LLM_PROVIDER` picks that provider (or disables models
    /// entirely with `heuristic`). Otherwise any present credential enrolls
    /// its provider, OpenAI ahead of OpenRouter.
    pub fn from_config(config: &Config) -> Self {
        let timeout = Duration::from_secs(config.llm_timeout_secs);
        let provider = config.llm_provider.as_deref().map(str::to_lowercase);
        let mut models: Vec<Arc<dyn ModelExtractor>> = Vec::new();

        match provider.as_deref() {
            Some("heuristic") => {}
            Some("openrouter") => match &config.openrouter_api_key {
                Some(key) => {
                    let model = config
                        .llm_model
                        .clone()
                        .unwrap_or_else(|| OPENROUTER_DEFAULT_MODEL.to_string());
                    models.push(Arc::new(LlmExtractor::new(OpenRouter::new(key, &model), timeout)));
                }
                None => {
                    warn!("LLM_PROVIDER=openrouter but OPENROUTER_API_KEY is not set, using heuristic extraction");
                }
            },
            Some("openai") => match &config.openai_api_key {
                Some(key) => {
                    let model = config
                        .llm_model
                        .clone()
                        .unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string());
                    models.push(Arc::new(LlmExtractor::new(OpenAi::new(key, &model), timeout)));
                }
                None => {
                    warn!("LLM_PROVIDER=openai but OPENAI_API_KEY is not set, using heuristic extraction");
                }
            },
            _ => {
                if let Some(key) = &config.openai_api_key {
                    let model = config
                        .llm_model
                        .clone()
                        .unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string());
                    models.push(Arc::new(LlmExtractor::new(OpenAi::new(key, &model), timeout)));
                }
                if let Some(key) = &config.openrouter_api_key {
                    models.push(Arc::new(LlmExtractor::new(
                        OpenRouter::new(key, OPENROUTER_DEFAULT_MODEL),
                        timeout,
                    )));
                }
            }
        }

        Self { models }
    }

    /// Strategy list for diagnostics ("openai:gpt-4o-mini" or "heuristic").
    pub fn describe(&self) -> String {
        if self.models.is_empty() {
            return "heuristic".to_string();
        }
        self.models
            .iter()
            .map(|m| m.label())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Enrich one candidate. Never fails: every model error is logged and
    /// the candidate falls through to the next strategy, then the heuristic.
    pub async fn extract(
        &self,
        candidate: &Candidate,
        opts: ExtractOptions,
    ) -> (ExtractedFields, ExtractionPath) {
        for model in &self.models {
            match model.try_extract(candidate, opts).await {
                Ok(fields) => return (fields, ExtractionPath::Model),
                Err(err) if err.is_rate_limit() => {
                    warn!(
                        extractor = model.label(),
                        link = candidate.link.as_str(),
                        "model rate limited, falling back"
                    );
                }
                Err(err) => {
                    warn!(
                        extractor = model.label(),
                        link = candidate.link.as_str(),
                        error = %err,
                        "model extraction failed, falling back"
                    );
                }
            }
        }
        (heuristic_extract(candidate, opts), ExtractionPath::Heuristic)
    }
}

// ============================================================
// Tests
// ============================================================
