// Cleaning pipeline: ingestion, processing, reporting, and the orchestrator
// that runs them in order

pub mod ingestion;
pub mod orchestrator;
pub mod processing;
pub mod report;

pub use orchestrator::{Pipeline, PipelineResult};
