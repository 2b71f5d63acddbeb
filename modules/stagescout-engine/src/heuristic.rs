//! Keyword-based fallback extraction.
//!
//! When no model is configured, or the model path fails for a candidate,
//! this scorer produces a usable record from nothing but the search result
//! text and URL. It is intentionally dumb: substring checks over the
//! lowercased title + snippet, plus a small host allow-list.

use regex::Regex;
use url::Url;

use stagescout_common::{Candidate, PaysSpeakers};

use crate::extract::{ExtractOptions, ExtractedFields};

// ------------------------------------------------------------
// Keyword tables
// ------------------------------------------------------------

/// Generic "this page is an event / wants speakers" markers. +12 each.
const EVENT_KEYWORDS: &[&str] = &[
    "call for speakers",
    "call for proposals",
    "submit a proposal",
    "become a speaker",
    "keynote",
    "conference",
    "annual meeting",
    "summit",
    "congress",
    "symposium",
];

/// Topic markers aligned with the speaker's verticals. +6 each. The short
/// association acronyms are matched as plain substrings, same as the rest.
const THEME_KEYWORDS: &[&str] = &[
    "leadership",
    "csr",
    "corporate social responsibility",
    "healthcare",
    "medical",
    "surgical",
    "nursing",
    "anesthesiology",
    "mgma",
    "himss",
    "aorn",
    "asca",
];

/// Hosts of healthcare associations the speaker targets. Matched as the
/// host itself or any subdomain of it.
const HEALTHCARE_HOSTS: &[&str] = &[
    "mgma.com",
    "himss.org",
    "ache.org",
    "aorn.org",
    "ascassociation.org",
    "hfma.org",
    "aha.org",
    "nursingworld.org",
];

/// Broad healthcare vocabulary for the text bonus.
const HEALTHCARE_MARKERS: &[&str] = &["healthcare", "medical", "hospital"];

/// Texas city names and region shorthand. The bare "tx" abbreviation is
/// handled separately with a word-boundary match.
const TEXAS_MARKERS: &[&str] = &[
    "texas",
    "dallas",
    "dfw",
    "houston",
    "austin",
    "san antonio",
    "fort worth",
];

/// Vertical labels with their trigger substrings, in output order. Each
/// label is emitted at most once.
const VERTICAL_FAMILIES: &[(&str, &[&str])] = &[
    (
        "Healthcare",
        &["health", "medical", "surg", "nursing", "hospital", "clinic"],
    ),
    ("Leadership", &["leadership", "executive", "management"]),
    (
        "CSR",
        &[
            "csr",
            "corporate social responsibility",
            "social impact",
            "philanthropy",
            "corporate volunteering",
        ],
    ),
    ("Sales", &["sales", "business development", "revenue"]),
];

// ------------------------------------------------------------
// Scoring
// ------------------------------------------------------------

/// Score and label one candidate without a model.
///
/// The score accumulates:
/// 1. +12 per event/CFP keyword in the title + snippet.
/// 2. +6 per theme keyword.
/// 3. With the healthcare toggle: +25 when the host is a known healthcare
///    association (or a subdomain of one), +12 when the text mentions
///    healthcare vocabulary.
/// 4. With the Texas toggle: +18 when the text names a Texas city or a
///    delimited "tx".
///
/// The sum is clamped to 0-100. Dates are never guessed; `is_future` is
/// optimistically true and the date filters downstream sort it out.
pub fn heuristic_extract(candidate: &Candidate, opts: ExtractOptions) -> ExtractedFields {
    let text = format!("{} {}", candidate.title, candidate.snippet).to_lowercase();
    let host = host_of(&candidate.link);

    let mut score = 0.0;
    score += 12.0 * count_hits(&text, EVENT_KEYWORDS) as f64;
    score += 6.0 * count_hits(&text, THEME_KEYWORDS) as f64;

    if opts.prioritize_healthcare {
        if in_allow_list(&host, HEALTHCARE_HOSTS) {
            score += 25.0;
        }
        if HEALTHCARE_MARKERS.iter().any(|m| text.contains(m)) {
            score += 12.0;
        }
    }

    if opts.prioritize_texas && mentions_texas(&text) {
        score += 18.0;
    }

    ExtractedFields {
        event_name: Some(candidate.title.clone()),
        organizer: organizer_from_host(&host),
        pays_speakers: PaysSpeakers::Unknown,
        verticals: verticals_for(&text),
        score: score.clamp(0.0, 100.0),
        is_future: Some(true),
        ..ExtractedFields::default()
    }
}

fn count_hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|&&k| text.contains(k)).count()
}

fn in_allow_list(host: &str, domains: &[&str]) -> bool {
    domains
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{d}")))
}

fn mentions_texas(text: &str) -> bool {
    if TEXAS_MARKERS.iter().any(|m| text.contains(m)) {
        return true;
    }
    Regex::new(r"\btx\b").expect("valid regex").is_match(text)
}

fn verticals_for(text: &str) -> Vec<String> {
    let mut verticals = Vec::new();
    for &(label, markers) in VERTICAL_FAMILIES {
        if markers.iter().any(|m| text.contains(m)) {
            verticals.push(label.to_string());
        }
    }
    verticals
}

/// Lowercased registrable-ish host of the link, `www.` stripped. Empty when
/// the link does not parse as an absolute URL.
fn host_of(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .map(|h| h.trim_start_matches("www.").to_string())
        .unwrap_or_default()
}

/// Second-to-last dot label of the host, uppercased: "events.mgma.com"
/// becomes "MGMA". None when the host has fewer than two labels.
fn organizer_from_host(host: &str) -> Option<String> {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() < 2 {
        return None;
    }
    Some(labels[labels.len() - 2].to_uppercase())
}

// ============================================================
// Tests
// ============================================================
