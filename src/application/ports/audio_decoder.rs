use std::path::Path;

use crate::domain::SampleBuffer;

/// Turns an audio file on disk into 16 kHz mono samples.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<SampleBuffer, AudioDecoderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioDecoderError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
