//! Boundary tests for the whole pipeline: mock the two provider seams,
//! call `SearchPipeline::run`, assert on the ranked output and counters.

use std::sync::Arc;
use std::time::Duration;

use stagescout_common::{Config, ScoutError, SearchRequest, SOURCE_SERP};

use crate::extract::{Extractor, LlmExtractor};
use crate::pipeline::run::SearchPipeline;
use crate::queries::build_queries;
use crate::testing::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn two_query_config() -> Config {
    Config {
        max_queries: 2,
        ..Config::default()
    }
}

fn one_query_config() -> Config {
    Config {
        max_queries: 1,
        ..Config::default()
    }
}

/// Extractor with a single model strategy and a generous timeout.
fn model_extractor(model: MockModel) -> Extractor {
    Extractor::new(vec![Arc::new(LlmExtractor::new(
        model,
        Duration::from_secs(5),
    ))])
}

// ---------------------------------------------------------------------------
// Search → dedup → heuristic → ranking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn heuristic_run_dedups_links_and_ranks_best_first() {
    let request = SearchRequest::default();
    let queries = build_queries(
        &request.topics,
        request.prioritize_healthcare,
        request.prioritize_texas,
    );

    let strong = candidate(
        "MGMA healthcare conference call for speakers",
        "https://mgma.com/annual",
        "Keynote proposals for the Dallas annual meeting",
    );
    let plain = candidate("Vendor expo", "https://expo.example.com", "");
    let duplicate = candidate("Vendor expo again", "https://expo.example.com", "");
    let other = candidate("Leadership summit", "https://lead.example.com", "");

    let searcher = MockSearcher::new()
        .on_query(&queries[0], vec![strong, plain])
        .on_query(&queries[1], vec![duplicate, other]);

    let pipeline = SearchPipeline::new(
        Arc::new(searcher),
        Extractor::heuristic_only(),
        two_query_config(),
    );

    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.records.len(), 3, "duplicate link should collapse");
    assert_eq!(outcome.stats.queries_run, 2);
    assert_eq!(outcome.stats.raw_results, 4);
    assert_eq!(outcome.stats.duplicates_skipped, 1);
    assert!(outcome.records.iter().all(|r| r.source == SOURCE_SERP));
    assert!(outcome
        .records
        .windows(2)
        .all(|pair| pair[0].score >= pair[1].score));
    assert_eq!(
        outcome.records[0].event_name,
        "MGMA healthcare conference call for speakers"
    );
}

#[tokio::test]
async fn first_seen_candidate_wins_for_a_duplicate_link() {
    let request = SearchRequest::default();
    let queries = build_queries(
        &request.topics,
        request.prioritize_healthcare,
        request.prioritize_texas,
    );

    let searcher = MockSearcher::new()
        .on_query(
            &queries[0],
            vec![candidate("First title", "https://example.com/e", "")],
        )
        .on_query(
            &queries[1],
            vec![candidate("Second title", "https://example.com/e", "")],
        );

    let pipeline = SearchPipeline::new(
        Arc::new(searcher),
        Extractor::heuristic_only(),
        two_query_config(),
    );

    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].event_name, "First title");
}

#[tokio::test]
async fn requested_max_results_caps_each_query() {
    let request = SearchRequest {
        max_results: Some(2),
        ..SearchRequest::default()
    };
    let queries = build_queries(
        &request.topics,
        request.prioritize_healthcare,
        request.prioritize_texas,
    );

    let searcher = MockSearcher::new().on_query(
        &queries[0],
        vec![
            candidate("A", "https://a.example.com", ""),
            candidate("B", "https://b.example.com", ""),
            candidate("C", "https://c.example.com", ""),
        ],
    );

    let pipeline = SearchPipeline::new(
        Arc::new(searcher),
        Extractor::heuristic_only(),
        one_query_config(),
    );

    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.stats.raw_results, 2);
    assert_eq!(outcome.records.len(), 2);
}

#[tokio::test]
async fn output_is_truncated_to_fifty_records() {
    let request = SearchRequest {
        max_results: Some(60),
        ..SearchRequest::default()
    };
    let queries = build_queries(
        &request.topics,
        request.prioritize_healthcare,
        request.prioritize_texas,
    );

    let many: Vec<_> = (0..60)
        .map(|i| {
            candidate(
                &format!("Conference {i}"),
                &format!("https://example.com/{i}"),
                "",
            )
        })
        .collect();
    let searcher = MockSearcher::new().on_query(&queries[0], many);

    let pipeline = SearchPipeline::new(
        Arc::new(searcher),
        Extractor::heuristic_only(),
        one_query_config(),
    );

    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.records.len(), 50);
    assert_eq!(outcome.stats.records_returned, 50);
    assert_eq!(outcome.stats.raw_results, 60);
}

// ---------------------------------------------------------------------------
// Failure policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_provider_failure_aborts_the_whole_run() {
    let pipeline = SearchPipeline::new(
        Arc::new(MockSearcher::failing(500)),
        Extractor::heuristic_only(),
        one_query_config(),
    );

    let err = pipeline.run(&SearchRequest::default()).await.unwrap_err();

    assert!(matches!(
        err,
        ScoutError::SearchProvider { status: 500, .. }
    ));
}

#[tokio::test]
async fn broken_model_degrades_to_heuristic_without_aborting() {
    let request = SearchRequest::default();
    let queries = build_queries(
        &request.topics,
        request.prioritize_healthcare,
        request.prioritize_texas,
    );

    let searcher = MockSearcher::new().on_query(
        &queries[0],
        vec![candidate(
            "Healthcare leadership conference",
            "https://example.com/conf",
            "call for speakers",
        )],
    );

    let pipeline = SearchPipeline::new(
        Arc::new(searcher),
        model_extractor(MockModel::failing()),
        one_query_config(),
    );

    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.stats.model_extracted, 0);
    assert_eq!(outcome.stats.heuristic_extracted, 1);
    assert!(outcome.records[0].score > 0.0);
}

// ---------------------------------------------------------------------------
// Date screens
// ---------------------------------------------------------------------------

#[tokio::test]
async fn obvious_recaps_are_screened_before_extraction() {
    let request = SearchRequest::default();
    let queries = build_queries(
        &request.topics,
        request.prioritize_healthcare,
        request.prioritize_texas,
    );

    let searcher = MockSearcher::new().on_query(
        &queries[0],
        vec![
            candidate(
                "2019 Healthcare Summit recap",
                "https://example.com/2019-recap",
                "",
            ),
            candidate("Healthcare Summit", "https://example.com/next", ""),
        ],
    );

    let pipeline = SearchPipeline::new(
        Arc::new(searcher),
        Extractor::heuristic_only(),
        one_query_config(),
    );

    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.stats.pre_filtered, 1);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].event_name, "Healthcare Summit");
}

#[tokio::test]
async fn model_dated_past_event_is_dropped_after_extraction() {
    let request = SearchRequest::default();
    let queries = build_queries(
        &request.topics,
        request.prioritize_healthcare,
        request.prioritize_texas,
    );

    // No year in the candidate text, so the cheap screen keeps it; only the
    // model knows the event already happened.
    let searcher = MockSearcher::new().on_query(
        &queries[0],
        vec![candidate(
            "Leaders Conference",
            "https://example.com/conf",
            "",
        )],
    );

    let reply = r#"{
        "event_name": "Leaders Conference",
        "start_date": "2020-01-10",
        "end_date": "2020-01-12",
        "score": 80,
        "is_future": false
    }"#;

    let pipeline = SearchPipeline::new(
        Arc::new(searcher),
        model_extractor(MockModel::replying(reply)),
        one_query_config(),
    );

    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.stats.model_extracted, 1);
    assert_eq!(outcome.stats.post_filtered, 1);
    assert!(outcome.records.is_empty());
}

// ---------------------------------------------------------------------------
// Regional adjustment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn texas_bonus_can_push_a_score_past_one_hundred() {
    let request = SearchRequest::default();
    let queries = build_queries(
        &request.topics,
        request.prioritize_healthcare,
        request.prioritize_texas,
    );

    let searcher = MockSearcher::new().on_query(
        &queries[0],
        vec![candidate("MGMA Annual", "https://mgma.com/annual", "")],
    );

    let reply = r#"{
        "event_name": "MGMA Annual Conference",
        "city": "Dallas",
        "state": "TX",
        "country": "USA",
        "score": 95,
        "is_future": true
    }"#;

    let pipeline = SearchPipeline::new(
        Arc::new(searcher),
        model_extractor(MockModel::replying(reply)),
        one_query_config(),
    );

    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].score, 110.0);
}

#[tokio::test]
async fn foreign_records_are_penalized_when_texas_is_off() {
    let request = SearchRequest {
        prioritize_texas: false,
        ..SearchRequest::default()
    };
    let queries = build_queries(
        &request.topics,
        request.prioritize_healthcare,
        request.prioritize_texas,
    );

    let searcher = MockSearcher::new().on_query(
        &queries[0],
        vec![candidate("Global Summit", "https://example.com/g", "")],
    );

    let reply = r#"{
        "event_name": "Global Summit",
        "city": "Lima",
        "country": "Peru",
        "score": 70,
        "is_future": true
    }"#;

    let pipeline = SearchPipeline::new(
        Arc::new(searcher),
        model_extractor(MockModel::replying(reply)),
        one_query_config(),
    );

    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].score, 50.0);
}
