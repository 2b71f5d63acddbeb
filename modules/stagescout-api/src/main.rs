use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stagescout_common::Config;
use stagescout_engine::extract::Extractor;
use stagescout_engine::pipeline::SearchPipeline;
use stagescout_engine::serp::SerpApiSearcher;

mod rest;

pub struct AppState {
    pub config: Config,
    pub extractor_label: String,
    pub pipeline: Option<SearchPipeline>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let extractor = Extractor::from_config(&config);
    let extractor_label = extractor.describe();

    // The server comes up without a SerpAPI key; the search endpoint
    // reports the missing credential per request instead.
    let pipeline = config.serpapi_api_key.as_deref().map(|key| {
        SearchPipeline::new(
            Arc::new(SerpApiSearcher::new(key)),
            extractor,
            config.clone(),
        )
    });

    let state = Arc::new(AppState {
        config: config.clone(),
        extractor_label,
        pipeline,
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // REST API
        .route("/api/search-events", post(rest::search::api_search_events))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path + status + latency only (no query params)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("StageScout API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
