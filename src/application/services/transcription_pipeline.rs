use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{
    AlignmentEngine, AlignmentError, AudioDecoder, AudioDecoderError, TranscriptionEngine,
    TranscriptionError,
};
use crate::domain::{AlignedTranscript, PipelineStage};

use super::stage_tracker::StageTracker;

/// Decode, recognize, resolve the language, select an alignment model and align.
///
/// Every stage is a blocking call; the first failure ends the run and no partial
/// transcript is produced.
pub struct TranscriptionPipeline {
    audio_decoder: Arc<dyn AudioDecoder>,
    transcription_engine: Arc<dyn TranscriptionEngine>,
    alignment_engine: Arc<dyn AlignmentEngine>,
}

impl TranscriptionPipeline {
    pub fn new(
        audio_decoder: Arc<dyn AudioDecoder>,
        transcription_engine: Arc<dyn TranscriptionEngine>,
        alignment_engine: Arc<dyn AlignmentEngine>,
    ) -> Self {
        Self {
            audio_decoder,
            transcription_engine,
            alignment_engine,
        }
    }

    /// Runs all stages against the file at `audio_path`. The tracker ends in
    /// `Completed` or `Failed`.
    pub fn run(
        &self,
        audio_path: &Path,
        tracker: &mut StageTracker,
    ) -> Result<AlignedTranscript, PipelineError> {
        let result = self.run_stages(audio_path, tracker);

        match &result {
            Ok(transcript) => {
                tracker.advance(PipelineStage::Completed);
                tracing::info!(
                    language = %transcript.language,
                    segments = transcript.segments.len(),
                    words = transcript.word_count(),
                    "Transcription pipeline completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    stage = %tracker.current(),
                    "Transcription pipeline failed"
                );
                tracker.fail();
            }
        }

        result
    }

    fn run_stages(
        &self,
        audio_path: &Path,
        tracker: &mut StageTracker,
    ) -> Result<AlignedTranscript, PipelineError> {
        let samples = self
            .audio_decoder
            .decode(audio_path)
            .map_err(PipelineError::AudioDecode)?;
        tracker.advance(PipelineStage::AudioDecoded);
        tracing::debug!(
            samples = samples.samples.len(),
            duration_secs = samples.duration_secs(),
            "Audio decoded"
        );

        let asr = self
            .transcription_engine
            .transcribe(&samples)
            .map_err(PipelineError::Transcription)?;
        tracker.advance(PipelineStage::Transcribed);
        tracing::debug!(
            segments = asr.segments.len(),
            language = ?asr.language.as_ref().map(|l| l.as_str()),
            "Speech recognized"
        );

        let language = asr.language.ok_or(PipelineError::LanguageNotDetected)?;
        tracker.advance(PipelineStage::LanguageResolved);

        let model = self
            .alignment_engine
            .load_model(&language)
            .map_err(|e| match e {
                AlignmentError::UnsupportedLanguage(lang) => {
                    PipelineError::UnsupportedLanguage(lang)
                }
                other => PipelineError::AlignmentModel(other),
            })?;

        let aligned = self
            .alignment_engine
            .align(&asr.segments, model.as_ref(), &samples)
            .map_err(PipelineError::Alignment)?;

        if aligned.len() != asr.segments.len() {
            return Err(PipelineError::InvalidAlignment(format!(
                "expected {} segments, aligner returned {}",
                asr.segments.len(),
                aligned.len()
            )));
        }

        let transcript = AlignedTranscript::new(language, aligned);
        transcript
            .validate()
            .map_err(|e| PipelineError::InvalidAlignment(e.to_string()))?;
        tracker.advance(PipelineStage::Aligned);

        Ok(transcript)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("audio decoding: {0}")]
    AudioDecode(AudioDecoderError),
    #[error("transcription: {0}")]
    Transcription(TranscriptionError),
    #[error("no language detected")]
    LanguageNotDetected,
    #[error("unsupported alignment language: {0}")]
    UnsupportedLanguage(String),
    #[error("alignment model: {0}")]
    AlignmentModel(AlignmentError),
    #[error("alignment: {0}")]
    Alignment(AlignmentError),
    #[error("alignment produced an invalid transcript: {0}")]
    InvalidAlignment(String),
}
