mod stage_tracker;
mod transcription_pipeline;
mod transcription_service;

pub use stage_tracker::StageTracker;
pub use transcription_pipeline::{PipelineError, TranscriptionPipeline};
pub use transcription_service::{TranscribeError, TranscriptionService};
