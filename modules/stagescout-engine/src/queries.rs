//! Search query formulation.
//!
//! Pure cross product of query seeds and topic phrases. Seeds capture the
//! "event looking for speakers" intent; topics narrow it to the subject
//! areas we care about. No I/O, fully deterministic.

/// Generic CFP and event-discovery seeds, always included.
const BASE_SEEDS: &[&str] = &[
    "call for speakers",
    "keynote speakers",
    "speaker proposals",
    "submit a proposal",
    "leadership conference",
    "medical missions conference",
    "nonprofit leadership event",
    "corporate social responsibility conference",
    "global health summit",
    "faith based medical missions",
];

/// Appended when healthcare is prioritized.
const HEALTHCARE_SEEDS: &[&str] = &[
    "medical conference",
    "healthcare leadership conference",
    "surgical society annual meeting",
    "MGMA conference",
    "HIMSS call for speakers",
    "ACHE congress call for proposals",
    "ambulatory surgery association meeting",
    "AORN chapter meeting",
];

/// Substituted when the caller supplies no topics.
const DEFAULT_TOPICS: &[&str] = &[
    "volunteer medical missions",
    "surgical missions Peru",
    "global health",
    "nonprofit leadership",
    "mission medicine",
    "Texas healthcare",
    "medical student service",
    "servant leadership",
    "CSR healthcare",
];

/// Injected when Texas is prioritized.
const TEXAS_TOPICS: &[&str] = &[
    "Texas",
    "Dallas",
    "DFW",
    "Houston",
    "Austin",
    "San Antonio",
    "Fort Worth",
    "Texas medical association",
];

/// Build the full query list: every seed crossed with every topic,
/// seed-major order. `topics` empty means use the default topic set;
/// prioritization flags extend the seed and topic lists respectively.
pub fn build_queries(
    topics: &[String],
    prioritize_healthcare: bool,
    prioritize_texas: bool,
) -> Vec<String> {
    let mut seeds: Vec<&str> = BASE_SEEDS.to_vec();
    if prioritize_healthcare {
        seeds.extend(HEALTHCARE_SEEDS);
    }

    let mut topic_list: Vec<String> = if topics.is_empty() {
        DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()
    } else {
        topics.to_vec()
    };
    if prioritize_texas {
        for texas in TEXAS_TOPICS {
            if !topic_list.iter().any(|t| t == texas) {
                topic_list.push(texas.to_string());
            }
        }
    }

    let mut queries = Vec::with_capacity(seeds.len() * topic_list.len());
    for seed in &seeds {
        for topic in &topic_list {
            queries.push(format!("{seed} {topic}"));
        }
    }
    queries
}
