use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{info, warn};

use stagescout_common::{EventRecord, ScoutError, SearchRequest};

use crate::AppState;

/// Run one search pass and return the ranked records.
///
/// The request body is optional; a bare POST runs with the default topics
/// and both regional priorities on.
pub async fn api_search_events(
    State(state): State<Arc<AppState>>,
    body: Option<Json<SearchRequest>>,
) -> impl IntoResponse {
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let key_status = if state.config.serpapi_api_key.is_some() {
        "SET"
    } else {
        "MISSING"
    };
    info!(
        extractor = %state.extractor_label,
        serpapi_key = key_status,
        topics = request.topics.len(),
        max_results = ?request.max_results,
        "Search request received"
    );

    let Some(pipeline) = &state.pipeline else {
        let err = ScoutError::Config("SERPAPI_API_KEY is not set".to_string());
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": err.to_string()})),
        )
            .into_response();
    };

    match pipeline.run(&request).await {
        Ok(outcome) => {
            info!("{}", outcome.stats);
            Json(search_response(&outcome.records)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Search run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

/// Shape the success payload: a count plus the ranked records.
fn search_response(records: &[EventRecord]) -> serde_json::Value {
    serde_json::json!({
        "count": records.len(),
        "results": records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use stagescout_common::{Config, EventRecord};
    use stagescout_engine::extract::Extractor;
    use stagescout_engine::pipeline::SearchPipeline;
    use stagescout_engine::queries::build_queries;
    use stagescout_engine::testing::{candidate, MockSearcher};

    fn state_with(pipeline: Option<SearchPipeline>) -> Arc<AppState> {
        Arc::new(AppState {
            config: Config::default(),
            extractor_label: "heuristic".to_string(),
            pipeline,
        })
    }

    // --- payload shaping tests ---

    #[test]
    fn response_count_matches_results() {
        let records = vec![EventRecord::default(), EventRecord::default()];
        let value = search_response(&records);
        assert_eq!(value["count"], 2);
        assert_eq!(value["results"].as_array().map(|r| r.len()), Some(2));
    }

    #[test]
    fn response_keeps_wire_field_names() {
        let record = EventRecord {
            event_name: "MGMA Leaders Conference".to_string(),
            score: 88.0,
            ..EventRecord::default()
        };
        let value = search_response(&[record]);
        assert_eq!(value["results"][0]["event_name"], "MGMA Leaders Conference");
        assert_eq!(value["results"][0]["score"], 88.0);
    }

    // --- handler tests ---

    #[tokio::test]
    async fn missing_search_key_reports_an_error() {
        let state = state_with(None);
        let response = api_search_events(State(state), None).await.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn stubbed_search_returns_ok() {
        let request = SearchRequest {
            topics: vec!["healthcare leadership".to_string()],
            ..SearchRequest::default()
        };
        let queries = build_queries(&request.topics, true, true);
        let searcher = MockSearcher::new().on_query(
            &queries[0],
            vec![candidate(
                "Call for Speakers: 2031 Texas Health Summit",
                "https://example.org/cfp",
                "Submit a proposal for the annual Dallas summit.",
            )],
        );
        let config = Config {
            max_queries: 1,
            ..Config::default()
        };
        let pipeline =
            SearchPipeline::new(Arc::new(searcher), Extractor::heuristic_only(), config);

        let state = state_with(Some(pipeline));
        let response = api_search_events(State(state), Some(Json(request)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
