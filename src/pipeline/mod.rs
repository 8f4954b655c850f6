// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod progress;

pub use progress::{PipelineStats, ProgressTracker};
