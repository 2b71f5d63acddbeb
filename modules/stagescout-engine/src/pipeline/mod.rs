pub mod past_filter;
pub mod run;
pub mod scoring;
pub mod stats;

#[cfg(test)]
mod boundary_tests;

pub use run::{RunOutcome, SearchPipeline};
pub use stats::RunStats;
