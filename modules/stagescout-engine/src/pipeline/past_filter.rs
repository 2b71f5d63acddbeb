//! Past-event filtering for search candidates and extracted records.
//!
//! Two independent gates. The pre-filter inspects raw search hit text
//! before any extraction is spent on the candidate; the post-filter
//! inspects extracted dates. Both are deliberately conservative: absence
//! of evidence keeps the candidate.

use chrono::{Datelike, NaiveDate};

use stagescout_common::{Candidate, EventRecord};

/// Vocabulary that marks a page as coverage of an event already held.
const RECAP_MARKERS: &[&str] = &[
    "recap",
    "highlights",
    "past event",
    "previous event",
    "what happened",
];

// ---------------------------------------------------------------------------
// Pre-filter: raw search hit text
// ---------------------------------------------------------------------------

/// Textual pre-filter over title + snippet + link.
///
/// Rejects when either:
/// 1. the combined lowercased text contains recap vocabulary, or
/// 2. it contains a delimited 4-digit year token earlier than `today`'s
///    year (covers both prose like "2022 Conference Recap" and URL path
///    segments like `/events/2022-summit`).
///
/// A current or future year never rejects, and text with no year at all
/// never rejects.
pub fn is_obviously_past(candidate: &Candidate, today: NaiveDate) -> bool {
    let text = format!(
        "{} {} {}",
        candidate.title, candidate.snippet, candidate.link
    )
    .to_lowercase();

    if RECAP_MARKERS.iter().any(|marker| text.contains(marker)) {
        return true;
    }

    let year_re = regex::Regex::new(r"\b(19|20)\d{2}\b").expect("valid regex");
    let current_year = today.year();
    for token in year_re.find_iter(&text) {
        if let Ok(year) = token.as_str().parse::<i32>() {
            if year < current_year {
                return true;
            }
        }
    }

    false
}

// ---------------------------------------------------------------------------
// Post-filter: extracted dates
// ---------------------------------------------------------------------------

/// Date gate over an extracted record.
///
/// 1. No dates extracted at all → keep (absence is never evidence of
///    pastness).
/// 2. Model asserted the event is upcoming (`is_future == Some(true)`) →
///    keep.
/// 3. Any extracted date on or after `today` → keep. Dates are fixed-width
///    `YYYY-MM-DD`, so the comparison is a plain string compare.
/// 4. Otherwise every extracted date is in the past → reject.
pub fn is_future_qualified(
    record: &EventRecord,
    is_future: Option<bool>,
    today: NaiveDate,
) -> bool {
    let dates = [
        record.start_date.as_deref(),
        record.end_date.as_deref(),
        record.cfp_deadline.as_deref(),
    ];

    if dates.iter().all(|d| d.is_none()) {
        return true;
    }

    if is_future == Some(true) {
        return true;
    }

    let today_iso = today.format("%Y-%m-%d").to_string();
    dates
        .iter()
        .flatten()
        .any(|date| *date >= today_iso.as_str())
}

// ===========================================================================
// Unit tests
// ===========================================================================
