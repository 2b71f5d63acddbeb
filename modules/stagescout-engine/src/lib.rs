pub mod extract;
pub mod heuristic;
pub mod pipeline;
pub mod queries;
pub mod serp;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
