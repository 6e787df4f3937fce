mod health;
mod transcribe;

pub use health::{HealthResponse, health_handler};
pub use transcribe::{
    ErrorResponse, SegmentResponse, TranscriptResponse, UPLOAD_FIELD, WordResponse,
    transcribe_handler,
};
