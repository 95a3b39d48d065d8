//! Pipeline orchestration

pub mod orchestrator;
pub mod state;

pub use orchestrator::{PipelineFailure, ResearchPipeline};
pub use state::{PipelineState, StateTracker};
