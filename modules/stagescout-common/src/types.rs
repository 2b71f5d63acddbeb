use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Provenance label for records discovered through the search API.
pub const SOURCE_SERP: &str = "serp";

// --- Request Types ---

/// One search invocation as posted by clients. Field names are camelCase on
/// the wire; every field is optional with the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Topic phrases to cross with the query seeds. Empty means "use the
    /// built-in default topics".
    #[serde(default)]
    pub topics: Vec<String>,

    /// Weight healthcare-adjacent events (healthcare query seeds, domain
    /// and keyword boosts).
    #[serde(default = "default_true")]
    pub prioritize_healthcare: bool,

    /// Weight Texas events (Texas topic injection, regional score boost).
    /// When off, non-US events are penalized instead.
    #[serde(default = "default_true")]
    pub prioritize_texas: bool,

    /// Results requested per query from the search provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            topics: Vec::new(),
            prioritize_healthcare: true,
            prioritize_texas: true,
            max_results: None,
        }
    }
}

// --- Search Hits ---

/// A raw organic search hit. Ephemeral: candidates live only between the
/// search call and extraction. Identity for dedup purposes is `link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

// --- Output Records ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaysSpeakers {
    Yes,
    No,
    #[default]
    Unknown,
}

impl std::fmt::Display for PaysSpeakers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaysSpeakers::Yes => write!(f, "yes"),
            PaysSpeakers::No => write!(f, "no"),
            PaysSpeakers::Unknown => write!(f, "unknown"),
        }
    }
}

/// A ranked speaking-opportunity lead. Dates are `YYYY-MM-DD` strings when
/// present; absent optional fields are omitted from serialized output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfp_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_url: Option<String>,
    #[serde(default)]
    pub pays_speakers: PaysSpeakers,
    #[serde(default)]
    pub verticals: Vec<String>,
    pub source: String,
    /// Nominally 0-100 from extraction; regional adjustments may push it
    /// outside that range and it is not re-clamped.
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_defaults_from_empty_body() {
        let request: SearchRequest = serde_json::from_str("{}").unwrap();
        assert!(request.topics.is_empty());
        assert!(request.prioritize_healthcare);
        assert!(request.prioritize_texas);
        assert!(request.max_results.is_none());
    }

    #[test]
    fn test_search_request_camel_case_fields() {
        let raw = r#"{
            "topics": ["global health"],
            "prioritizeHealthcare": false,
            "prioritizeTexas": false,
            "maxResults": 5
        }"#;
        let request: SearchRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.topics, vec!["global health"]);
        assert!(!request.prioritize_healthcare);
        assert!(!request.prioritize_texas);
        assert_eq!(request.max_results, Some(5));
    }

    #[test]
    fn test_pays_speakers_wire_values() {
        assert_eq!(serde_json::to_string(&PaysSpeakers::Yes).unwrap(), "\"yes\"");
        let parsed: PaysSpeakers = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(parsed, PaysSpeakers::Unknown);
    }

    #[test]
    fn test_event_record_omits_absent_fields() {
        let record = EventRecord {
            event_name: "Global Health Summit".to_string(),
            organizer: None,
            url: "https://example.org/summit".to_string(),
            start_date: Some("2026-03-14".to_string()),
            end_date: None,
            cfp_deadline: None,
            city: None,
            state: None,
            country: None,
            contact_url: None,
            pays_speakers: PaysSpeakers::Unknown,
            verticals: vec!["Healthcare".to_string()],
            source: SOURCE_SERP.to_string(),
            score: 42.0,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["event_name"], "Global Health Summit");
        assert_eq!(value["start_date"], "2026-03-14");
        assert_eq!(value["pays_speakers"], "unknown");
        assert!(value.get("end_date").is_none());
        assert!(value.get("organizer").is_none());
    }
}
