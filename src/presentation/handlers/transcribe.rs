use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Extension, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::TranscribeError;
use crate::domain::{AlignedSegment, AlignedTranscript, UploadedAudio, Word};
use crate::infrastructure::observability::RequestId;
use crate::presentation::state::AppState;

/// Multipart field carrying the audio.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub segments: Vec<SegmentResponse>,
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct SegmentResponse {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub words: Vec<WordResponse>,
}

#[derive(Debug, Serialize)]
pub struct WordResponse {
    pub word: String,
    pub start: f64,
    pub end: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<AlignedTranscript> for TranscriptResponse {
    fn from(transcript: AlignedTranscript) -> Self {
        Self {
            language: transcript.language.as_str().to_string(),
            segments: transcript
                .segments
                .into_iter()
                .map(SegmentResponse::from)
                .collect(),
        }
    }
}

impl From<AlignedSegment> for SegmentResponse {
    fn from(segment: AlignedSegment) -> Self {
        Self {
            start: segment.start,
            end: segment.end,
            text: segment.text,
            words: segment.words.into_iter().map(WordResponse::from).collect(),
        }
    }
}

impl From<Word> for WordResponse {
    fn from(word: Word) -> Self {
        Self {
            word: word.word,
            start: word.start,
            end: word.end,
            score: word.score,
        }
    }
}

impl IntoResponse for TranscribeError {
    fn into_response(self) -> Response {
        let status = match &self {
            TranscribeError::UploadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.message().to_string(),
                details: self.details().map(str::to_string),
            }),
        )
            .into_response()
    }
}

#[tracing::instrument(skip_all)]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match transcribe(state, request_id, multipart).await {
        Ok(transcript) => {
            tracing::info!(
                language = %transcript.language,
                segments = transcript.segments.len(),
                words = transcript.word_count(),
                "Transcription completed"
            );
            (StatusCode::OK, Json(TranscriptResponse::from(transcript))).into_response()
        }
        Err(e) => {
            if e.is_client_error() {
                tracing::warn!(error = %e, "Transcription request rejected");
            } else {
                tracing::error!(error = %e, "Transcription failed");
            }
            e.into_response()
        }
    }
}

async fn transcribe(
    state: AppState,
    request_id: RequestId,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<AlignedTranscript, TranscribeError> {
    let mut multipart =
        multipart.map_err(|rejection| TranscribeError::InvalidUpload(rejection.body_text()))?;
    let upload = read_upload(&mut multipart).await?;

    tracing::debug!(
        filename = %upload.filename,
        bytes = upload.size_bytes(),
        "Upload received"
    );

    let permit = Arc::clone(&state.worker_permits)
        .acquire_owned()
        .await
        .map_err(|_| TranscribeError::InternalEngine("worker pool closed".to_string()))?;

    let service = Arc::clone(&state.transcription_service);
    let span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        let _permit = permit;
        span.in_scope(|| service.transcribe(upload, &request_id.0))
    })
    .await
    .map_err(|e| {
        let reason = if e.is_panic() {
            "transcription worker panicked"
        } else {
            "transcription worker cancelled"
        };
        TranscribeError::InternalEngine(reason.to_string())
    })?
}

/// Pulls the first `file` part out of the form; other parts are skipped.
async fn read_upload(multipart: &mut Multipart) -> Result<UploadedAudio, TranscribeError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().trim().to_string();
        if filename.is_empty() {
            return Err(TranscribeError::EmptyFilename);
        }

        let data = field.bytes().await.map_err(multipart_error)?;
        return Ok(UploadedAudio::new(filename, data.to_vec()));
    }

    Err(TranscribeError::MissingFile)
}

fn multipart_error(error: MultipartError) -> TranscribeError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        TranscribeError::UploadTooLarge(error.body_text())
    } else {
        TranscribeError::InvalidUpload(error.body_text())
    }
}
