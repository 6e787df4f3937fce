use crate::domain::{AsrResult, SampleBuffer};

/// Speech recognition: samples in, provisional segments plus detected language out.
pub trait TranscriptionEngine: Send + Sync {
    fn transcribe(&self, samples: &SampleBuffer) -> Result<AsrResult, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}
