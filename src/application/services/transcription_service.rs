use std::path::Path;
use std::sync::Arc;

use crate::application::ports::ScratchStore;
use crate::domain::{AlignedTranscript, PipelineStage, UploadedAudio};

use super::stage_tracker::StageTracker;
use super::transcription_pipeline::{PipelineError, TranscriptionPipeline};

const REDACTED_PATH: &str = "[upload]";

/// Handles one upload end to end: scratch copy, pipeline run, scratch release.
pub struct TranscriptionService {
    scratch_store: Arc<dyn ScratchStore>,
    pipeline: TranscriptionPipeline,
}

impl TranscriptionService {
    pub fn new(scratch_store: Arc<dyn ScratchStore>, pipeline: TranscriptionPipeline) -> Self {
        Self {
            scratch_store,
            pipeline,
        }
    }

    /// Blocking. The scratch file is gone when this returns, whatever the outcome; if the
    /// pipeline panics the guard removes it while unwinding.
    pub fn transcribe(
        &self,
        upload: UploadedAudio,
        request_id: &str,
    ) -> Result<AlignedTranscript, TranscribeError> {
        let mut tracker = StageTracker::new();

        let scratch = match self.scratch_store.persist(&upload, request_id) {
            Ok(scratch) => scratch,
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist upload to scratch storage");
                tracker.fail();
                tracker.advance(PipelineStage::Cleanup);
                tracker.advance(PipelineStage::Terminal);
                return Err(TranscribeError::ScratchStorage(e.to_string()));
            }
        };
        drop(upload);
        tracker.advance(PipelineStage::FileReceived);

        let outcome = self.pipeline.run(scratch.path(), &mut tracker);
        let scratch_path = scratch.path().to_path_buf();

        tracker.advance(PipelineStage::Cleanup);
        if let Err(e) = scratch.release() {
            tracing::warn!(error = %e, "Failed to remove scratch file");
        }
        tracker.advance(PipelineStage::Terminal);

        outcome.map_err(|e| TranscribeError::from_pipeline(e, &scratch_path))
    }
}

/// Request-level failure kinds. Details never contain scratch paths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscribeError {
    #[error("no file uploaded")]
    MissingFile,
    #[error("uploaded file has an empty filename")]
    EmptyFilename,
    #[error("invalid upload: {0}")]
    InvalidUpload(String),
    #[error("upload too large: {0}")]
    UploadTooLarge(String),
    #[error("audio decode error: {0}")]
    AudioDecode(String),
    #[error("language detection failed")]
    LanguageDetectionFailed,
    #[error("unsupported language for alignment: {0}")]
    UnsupportedLanguageForAlignment(String),
    #[error("alignment error: {0}")]
    Alignment(String),
    #[error("internal engine error: {0}")]
    InternalEngine(String),
    #[error("scratch storage error: {0}")]
    ScratchStorage(String),
}

impl TranscribeError {
    /// Stable, human-readable message derived from the failure kind.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingFile => "No file uploaded",
            Self::EmptyFilename => "Empty filename",
            Self::InvalidUpload(_) => "Invalid multipart upload",
            Self::UploadTooLarge(_) => "Uploaded file is too large",
            Self::AudioDecode(_) => "Failed to decode audio",
            Self::LanguageDetectionFailed => "Language detection failed",
            Self::UnsupportedLanguageForAlignment(_) => "Language not supported for alignment",
            Self::Alignment(_) => "Alignment failed",
            Self::InternalEngine(_) => "Transcription engine error",
            Self::ScratchStorage(_) => "Failed to store upload",
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            Self::MissingFile | Self::EmptyFilename | Self::LanguageDetectionFailed => None,
            Self::InvalidUpload(d)
            | Self::UploadTooLarge(d)
            | Self::AudioDecode(d)
            | Self::UnsupportedLanguageForAlignment(d)
            | Self::Alignment(d)
            | Self::InternalEngine(d)
            | Self::ScratchStorage(d) => Some(d.as_str()),
        }
    }

    /// Whether the caller, rather than the pipeline, caused the failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFile
                | Self::EmptyFilename
                | Self::InvalidUpload(_)
                | Self::UploadTooLarge(_)
        )
    }

    fn from_pipeline(error: PipelineError, scratch_path: &Path) -> Self {
        let redact = |detail: String| redact_path(&detail, scratch_path);
        match error {
            PipelineError::AudioDecode(e) => Self::AudioDecode(redact(e.to_string())),
            PipelineError::Transcription(e) => Self::InternalEngine(redact(e.to_string())),
            PipelineError::LanguageNotDetected => Self::LanguageDetectionFailed,
            PipelineError::UnsupportedLanguage(lang) => Self::UnsupportedLanguageForAlignment(lang),
            PipelineError::AlignmentModel(e) => Self::InternalEngine(redact(e.to_string())),
            PipelineError::Alignment(e) => Self::Alignment(redact(e.to_string())),
            PipelineError::InvalidAlignment(detail) => Self::Alignment(redact(detail)),
        }
    }
}

fn redact_path(detail: &str, path: &Path) -> String {
    let mut redacted = detail.replace(&*path.to_string_lossy(), REDACTED_PATH);
    if let Some(name) = path.file_name().map(|n| n.to_string_lossy()) {
        if !name.is_empty() {
            redacted = redacted.replace(&*name, REDACTED_PATH);
        }
    }
    redacted
}
