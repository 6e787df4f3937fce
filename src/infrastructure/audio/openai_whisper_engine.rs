use reqwest::blocking::{Client, multipart};
use serde::Deserialize;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::{AsrResult, LanguageCode, SampleBuffer, Segment};

use super::whisper_languages::language_code_for;

/// Remote Whisper over the OpenAI-compatible `/audio/transcriptions` endpoint.
pub struct OpenAiWhisperEngine {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiWhisperEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
        }
    }
}

#[derive(Deserialize)]
struct VerboseTranscription {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    segments: Vec<VerboseSegment>,
}

#[derive(Deserialize)]
struct VerboseSegment {
    start: f64,
    end: f64,
    text: String,
}

impl TranscriptionEngine for OpenAiWhisperEngine {
    fn transcribe(&self, samples: &SampleBuffer) -> Result<AsrResult, TranscriptionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        let wav = encode_wav(samples);

        let file_part = multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment")
            .part("file", file_part);

        tracing::debug!(model = %self.model, "Sending audio to OpenAI Whisper API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let result: VerboseTranscription = response
            .json()
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("parse response: {}", e)))?;

        let language = result
            .language
            .as_deref()
            .and_then(language_code_for)
            .and_then(LanguageCode::parse);

        let segments: Vec<Segment> = result
            .segments
            .into_iter()
            .filter_map(|s| {
                let text = s.text.trim();
                (!text.is_empty()).then(|| Segment::new(s.start, s.end.max(s.start), text))
            })
            .collect();

        tracing::info!(
            segments = segments.len(),
            language = ?language.as_ref().map(|l| l.as_str()),
            "OpenAI Whisper transcription completed"
        );

        Ok(AsrResult::new(language, segments))
    }
}

/// 16-bit PCM mono WAV.
fn encode_wav(buffer: &SampleBuffer) -> Vec<u8> {
    let data_size = (buffer.samples.len() * 2) as u32;
    let byte_rate = buffer.sample_rate * 2;

    let mut wav = Vec::with_capacity(44 + data_size as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&buffer.sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for &s in &buffer.samples {
        let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        wav.extend_from_slice(&v.to_le_bytes());
    }
    wav
}
