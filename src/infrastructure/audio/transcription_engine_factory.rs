use std::sync::Arc;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

use super::candle_whisper_engine::CandleWhisperEngine;
use super::openai_whisper_engine::OpenAiWhisperEngine;

/// Where speech recognition runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TranscriptionProvider {
    /// Whisper weights from the Hugging Face hub, run with candle.
    Local,
    /// The OpenAI-compatible `/audio/transcriptions` endpoint.
    OpenAi,
}

/// Builds the recognizer once at startup. Blank credentials count as absent.
pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        provider: TranscriptionProvider,
        model: &str,
        api_key: Option<&str>,
        base_url: Option<&str>,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        let model = model.trim();
        if model.is_empty() {
            return Err(TranscriptionError::ModelLoadFailed(
                "transcription model id is empty".to_string(),
            ));
        }

        let engine: Arc<dyn TranscriptionEngine> = match provider {
            TranscriptionProvider::Local => Arc::new(CandleWhisperEngine::new(model)?),
            TranscriptionProvider::OpenAi => {
                let api_key = non_blank(api_key).ok_or_else(|| {
                    TranscriptionError::ModelLoadFailed(
                        "transcription.api_key is required for the openai provider".to_string(),
                    )
                })?;
                Arc::new(OpenAiWhisperEngine::new(
                    api_key,
                    non_blank(base_url),
                    Some(model.to_string()),
                ))
            }
        };

        tracing::info!(provider = ?provider, model, "Transcription engine ready");
        Ok(engine)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
