//! Regional score adjustments applied after extraction.
//!
//! Whichever path produced a record, its score gets one location-based
//! adjustment before ranking. The adjusted value is deliberately left
//! unclamped, so a strong Texas lead can finish above 100.

use stagescout_common::EventRecord;

// ------------------------------------------------------------
// Place tables
// ------------------------------------------------------------

/// Texas place names and shorthand, matched as substrings of the combined
/// location text.
const TEXAS_PLACES: &[&str] = &[
    "texas",
    "tx",
    "dallas",
    "dfw",
    "houston",
    "austin",
    "san antonio",
    "fort worth",
];

/// Literal phrases that mark a location as inside the United States.
const US_MARKERS: &[&str] = &["united states", "usa", "u.s."];

/// Postal abbreviations for the 50 states plus DC, compared against
/// delimited tokens of the location text.
const US_STATE_ABBREVS: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

// ------------------------------------------------------------
// Adjustment
// ------------------------------------------------------------

/// Score delta for one record's location.
///
/// 1. Texas toggle on: +15 when the location mentions Texas, else 0.
/// 2. Texas toggle off: -20 unless the location looks US-based. A record
///    with no location at all takes the penalty.
///
/// Callers add the delta to the record's score without re-clamping.
pub fn regional_adjustment(record: &EventRecord, prioritize_texas: bool) -> f64 {
    let location = location_text(record);

    if prioritize_texas {
        if mentions_texas(&location) {
            15.0
        } else {
            0.0
        }
    } else if looks_us_based(&location) {
        0.0
    } else {
        -20.0
    }
}

/// Combined lowercased `city state country` text. Unset fields are skipped.
fn location_text(record: &EventRecord) -> String {
    [&record.city, &record.state, &record.country]
        .iter()
        .filter_map(|field| field.as_deref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn mentions_texas(location: &str) -> bool {
    TEXAS_PLACES.iter().any(|place| location.contains(place))
}

fn looks_us_based(location: &str) -> bool {
    if US_MARKERS.iter().any(|m| location.contains(m)) {
        return true;
    }
    location
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .any(|token| US_STATE_ABBREVS.contains(&token.to_uppercase().as_str()))
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn located(city: Option<&str>, state: Option<&str>, country: Option<&str>) -> EventRecord {
        EventRecord {
            event_name: "Event".to_string(),
            url: "https://example.com".to_string(),
            city: city.map(str::to_string),
            state: state.map(str::to_string),
            country: country.map(str::to_string),
            source: "serp".to_string(),
            score: 50.0,
            ..EventRecord::default()
        }
    }

    #[test]
    fn texas_record_gets_bonus_when_prioritized() {
        let record = located(Some("Dallas"), Some("TX"), Some("USA"));
        assert_eq!(regional_adjustment(&record, true), 15.0);
    }

    #[test]
    fn texas_city_alone_is_enough() {
        let record = located(Some("Fort Worth"), None, None);
        assert_eq!(regional_adjustment(&record, true), 15.0);
    }

    #[test]
    fn non_texas_record_is_untouched_when_prioritizing_texas() {
        let record = located(Some("Chicago"), Some("IL"), Some("USA"));
        assert_eq!(regional_adjustment(&record, true), 0.0);
    }

    #[test]
    fn missing_location_gets_no_bonus_when_prioritizing_texas() {
        let record = located(None, None, None);
        assert_eq!(regional_adjustment(&record, true), 0.0);
    }

    #[test]
    fn us_record_avoids_penalty_when_texas_off() {
        let by_country = located(Some("Denver"), None, Some("United States"));
        let by_abbrev = located(Some("Indianapolis"), Some("IN"), None);
        assert_eq!(regional_adjustment(&by_country, false), 0.0);
        assert_eq!(regional_adjustment(&by_abbrev, false), 0.0);
    }

    #[test]
    fn foreign_record_takes_penalty_when_texas_off() {
        let record = located(Some("Lima"), None, Some("Peru"));
        assert_eq!(regional_adjustment(&record, false), -20.0);
    }

    #[test]
    fn missing_location_takes_penalty_when_texas_off() {
        let record = located(None, None, None);
        assert_eq!(regional_adjustment(&record, false), -20.0);
    }

    #[test]
    fn state_abbreviation_must_be_a_delimited_token() {
        // "Cairo" contains no state token even though "ca" is a substring.
        let record = located(Some("Cairo"), None, Some("Egypt"));
        assert_eq!(regional_adjustment(&record, false), -20.0);
    }

    #[test]
    fn lowercase_location_still_matches() {
        let record = located(Some("dallas"), Some("tx"), None);
        assert_eq!(regional_adjustment(&record, true), 15.0);
        assert_eq!(regional_adjustment(&record, false), 0.0);
    }
}
