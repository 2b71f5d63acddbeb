//! End-to-end lead pipeline: build queries, search, dedup, filter, extract,
//! boost, rank.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::info;

use stagescout_common::{Candidate, Config, EventRecord, ScoutError, SearchRequest, SOURCE_SERP};

use crate::extract::{ExtractOptions, ExtractedFields, ExtractionPath, Extractor};
use crate::pipeline::past_filter::{is_future_qualified, is_obviously_past};
use crate::pipeline::scoring::regional_adjustment;
use crate::pipeline::stats::RunStats;
use crate::queries::build_queries;
use crate::serp::WebSearcher;

/// Hard cap on records handed back to the caller, after ranking.
const MAX_OUTPUT_RECORDS: usize = 50;

/// Ranked records plus the counters accumulated while producing them.
#[derive(Debug)]
pub struct RunOutcome {
    pub records: Vec<EventRecord>,
    pub stats: RunStats,
}

/// Bundles the search and extraction dependencies for one deployment.
///
/// Construct once and share behind an `Arc`; `run` takes `&self` and each
/// call is independent, so concurrent requests do not observe each other.
pub struct SearchPipeline {
    searcher: Arc<dyn WebSearcher>,
    extractor: Extractor,
    config: Config,
}

impl SearchPipeline {
    pub fn new(searcher: Arc<dyn WebSearcher>, extractor: Extractor, config: Config) -> Self {
        Self {
            searcher,
            extractor,
            config,
        }
    }

    /// Run the whole pipeline for one request.
    ///
    /// A search-provider failure aborts the run with no partial output.
    /// Extraction failures never abort: the affected candidate takes the
    /// keyword heuristic and the run continues.
    pub async fn run(&self, request: &SearchRequest) -> Result<RunOutcome, ScoutError> {
        let mut stats = RunStats::default();
        let today = Utc::now().date_naive();
        let opts = ExtractOptions {
            prioritize_healthcare: request.prioritize_healthcare,
            prioritize_texas: request.prioritize_texas,
        };
        let per_query = request
            .max_results
            .filter(|n| *n > 0)
            .unwrap_or(self.config.max_candidates_per_query);

        let queries = build_queries(
            &request.topics,
            request.prioritize_healthcare,
            request.prioritize_texas,
        );

        let provider = self.extractor.describe();
        info!(
            provider = %provider,
            topics = request.topics.len(),
            planned_queries = queries.len(),
            query_cap = self.config.max_queries,
            per_query,
            "starting lead search"
        );

        // Sequential fan-out with first-seen-wins dedup on the link.
        let mut seen: HashSet<String> = HashSet::new();
        let mut unique: Vec<Candidate> = Vec::new();
        for query in queries.iter().take(self.config.max_queries) {
            let results = self.searcher.search(query, per_query).await?;
            stats.queries_run += 1;
            stats.raw_results += results.len() as u32;
            for candidate in results {
                if seen.insert(candidate.link.clone()) {
                    unique.push(candidate);
                } else {
                    stats.duplicates_skipped += 1;
                }
            }
        }

        // Cheap text screen before any model spend.
        let (kept, dropped): (Vec<_>, Vec<_>) = unique
            .into_iter()
            .partition(|candidate| !is_obviously_past(candidate, today));
        stats.pre_filtered = dropped.len() as u32;

        // Enrichment with bounded, order-preserving concurrency.
        let extractor = &self.extractor;
        let concurrency = self.config.max_concurrent_extractions.max(1);
        let enriched: Vec<(Candidate, ExtractedFields, ExtractionPath)> = stream::iter(kept)
            .map(|candidate| async move {
                let (fields, path) = extractor.extract(&candidate, opts).await;
                (candidate, fields, path)
            })
            .buffered(concurrency)
            .collect()
            .await;

        // Assemble records, then drop leads whose dates are all behind us.
        let mut records: Vec<EventRecord> = Vec::new();
        for (candidate, fields, path) in enriched {
            match path {
                ExtractionPath::Model => stats.model_extracted += 1,
                ExtractionPath::Heuristic => stats.heuristic_extracted += 1,
            }
            let is_future = fields.is_future;
            let record = assemble(candidate, fields);
            if is_future_qualified(&record, is_future, today) {
                records.push(record);
            } else {
                stats.post_filtered += 1;
            }
        }

        // One regional adjustment per record, no re-clamp.
        for record in &mut records {
            let delta = regional_adjustment(record, request.prioritize_texas);
            record.score += delta;
        }

        // Stable rank, best first, then cap the payload.
        records.sort_by(|a, b| b.score.total_cmp(&a.score));
        records.truncate(MAX_OUTPUT_RECORDS);
        stats.records_returned = records.len() as u32;

        info!(records = records.len(), "lead search complete");

        Ok(RunOutcome { records, stats })
    }
}

/// Merge a candidate and its extracted fields into the output shape. The
/// candidate title backstops a missing or blank event name, and the
/// candidate link is always the record URL.
fn assemble(candidate: Candidate, fields: ExtractedFields) -> EventRecord {
    let event_name = fields
        .event_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(candidate.title);
    EventRecord {
        event_name,
        organizer: fields.organizer,
        url: candidate.link,
        start_date: fields.start_date,
        end_date: fields.end_date,
        cfp_deadline: fields.cfp_deadline,
        city: fields.city,
        state: fields.state,
        country: fields.country,
        contact_url: fields.contact_url,
        pays_speakers: fields.pays_speakers,
        verticals: fields.verticals,
        source: SOURCE_SERP.to_string(),
        score: fields.score,
    }
}
