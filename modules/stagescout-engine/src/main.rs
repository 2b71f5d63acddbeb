use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stagescout_common::{Config, EventRecord, PaysSpeakers, ScoutError, SearchRequest};
use stagescout_engine::extract::Extractor;
use stagescout_engine::pipeline::SearchPipeline;
use stagescout_engine::serp::SerpApiSearcher;

#[derive(Parser)]
#[command(name = "scout", about = "Search the web for speaking opportunities and rank the leads")]
struct Cli {
    /// Comma-separated topic phrases (defaults to the built-in topic list)
    #[arg(long, value_delimiter = ',')]
    topics: Vec<String>,

    /// Skip the healthcare query seeds and scoring boosts
    #[arg(long)]
    no_healthcare: bool,

    /// Skip the Texas topics and regional bonus (non-US leads get penalized)
    #[arg(long)]
    no_texas: bool,

    /// Results to request per query (defaults to MAX_CANDIDATES)
    #[arg(long)]
    max_results: Option<usize>,

    /// Queries to run this invocation (defaults to MAX_QUERIES, capped at 8)
    #[arg(long)]
    queries: Option<usize>,

    /// Print the ranked records as JSON instead of a listing
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("stagescout_engine=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    info!("StageScout starting...");

    // Load config
    let mut config = Config::from_env()?;
    if let Some(n) = cli.queries {
        config.max_queries = n.clamp(1, 8);
    }
    let api_key = config
        .serpapi_api_key
        .clone()
        .ok_or_else(|| ScoutError::Config("SERPAPI_API_KEY must be set".to_string()))?;

    let searcher = Arc::new(SerpApiSearcher::new(&api_key));
    let extractor = Extractor::from_config(&config);
    let pipeline = SearchPipeline::new(searcher, extractor, config);

    let topics: Vec<String> = cli
        .topics
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    let request = SearchRequest {
        topics,
        prioritize_healthcare: !cli.no_healthcare,
        prioritize_texas: !cli.no_texas,
        max_results: cli.max_results,
    };

    let outcome = pipeline.run(&request).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.records)?);
    } else {
        print_listing(&outcome.records);
    }

    info!("{}", outcome.stats);

    Ok(())
}

fn print_listing(records: &[EventRecord]) {
    if records.is_empty() {
        println!("No upcoming leads found.");
        return;
    }
    for (i, record) in records.iter().enumerate() {
        let mut line = format!("{:>2}. [{:>3.0}] {}", i + 1, record.score, record.event_name);
        if let Some(organizer) = &record.organizer {
            line.push_str(&format!(" ({organizer})"));
        }
        println!("{line}");

        let place: Vec<&str> = [
            record.city.as_deref(),
            record.state.as_deref(),
            record.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut details: Vec<String> = Vec::new();
        if !place.is_empty() {
            details.push(place.join(", "));
        }
        if let Some(start) = &record.start_date {
            details.push(format!("starts {start}"));
        }
        if let Some(deadline) = &record.cfp_deadline {
            details.push(format!("CFP due {deadline}"));
        }
        if record.pays_speakers == PaysSpeakers::Yes {
            details.push("pays speakers".to_string());
        }
        if !details.is_empty() {
            println!("      {}", details.join(" | "));
        }
        println!("      {}", record.url);
    }
}
