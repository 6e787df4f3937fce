use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use wordstamp::application::ports::{ScratchStore, ScratchStoreError};
use wordstamp::application::services::{
    TranscribeError, TranscriptionPipeline, TranscriptionService,
};
use wordstamp::domain::{ScratchFile, UploadedAudio};
use wordstamp::infrastructure::audio::SymphoniaAudioDecoder;
use wordstamp::infrastructure::storage::LocalScratchStore;

use crate::helpers::audio_fixtures::tone_wav;
use crate::helpers::mock_ports::{EvenSplitAlignmentEngine, ScriptedTranscriptionEngine};

struct UnavailableScratchStore;

impl ScratchStore for UnavailableScratchStore {
    fn persist(
        &self,
        _upload: &UploadedAudio,
        _request_id: &str,
    ) -> Result<ScratchFile, ScratchStoreError> {
        Err(ScratchStoreError::DirectoryUnavailable(
            "/var/scratch is read-only".to_string(),
        ))
    }
}

fn service(store: Arc<dyn ScratchStore>, engine: ScriptedTranscriptionEngine) -> TranscriptionService {
    let pipeline = TranscriptionPipeline::new(
        Arc::new(SymphoniaAudioDecoder),
        Arc::new(engine),
        Arc::new(EvenSplitAlignmentEngine::supporting(&["en"])),
    );
    TranscriptionService::new(store, pipeline)
}

fn is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[test]
fn given_valid_wav_when_transcribing_then_returns_transcript_and_removes_scratch() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(LocalScratchStore::new(dir.path().to_path_buf()).unwrap());
    let service = service(store, ScriptedTranscriptionEngine::speaking("en", "good morning"));

    let transcript = service
        .transcribe(UploadedAudio::new("morning.wav", tone_wav(400, 220.0)), "req-1")
        .unwrap();

    assert_eq!(transcript.segments.len(), 1);
    assert!(is_empty(dir.path()));
}

#[test]
fn given_undecodable_bytes_when_transcribing_then_returns_audio_decode_and_removes_scratch() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(LocalScratchStore::new(dir.path().to_path_buf()).unwrap());
    let service = service(store, ScriptedTranscriptionEngine::speaking("en", "unused"));

    let result = service.transcribe(UploadedAudio::new("noise.mp3", vec![7u8; 256]), "req-2");

    assert!(matches!(result, Err(TranscribeError::AudioDecode(_))));
    assert!(is_empty(dir.path()));
}

#[test]
fn given_unavailable_scratch_store_when_transcribing_then_returns_storage_error() {
    let service = service(
        Arc::new(UnavailableScratchStore),
        ScriptedTranscriptionEngine::speaking("en", "unused"),
    );

    let result = service.transcribe(UploadedAudio::new("a.wav", tone_wav(100, 440.0)), "req-3");

    let error = result.unwrap_err();
    assert!(matches!(error, TranscribeError::ScratchStorage(_)));
    assert_eq!(error.message(), "Failed to store upload");
    assert!(!error.is_client_error());
}

#[test]
fn given_error_kinds_when_classifying_then_only_upload_errors_are_client_errors() {
    assert!(TranscribeError::MissingFile.is_client_error());
    assert!(TranscribeError::EmptyFilename.is_client_error());
    assert!(TranscribeError::InvalidUpload("boundary".to_string()).is_client_error());
    assert!(TranscribeError::UploadTooLarge("limit".to_string()).is_client_error());
    assert!(!TranscribeError::LanguageDetectionFailed.is_client_error());
    assert!(!TranscribeError::Alignment("x".to_string()).is_client_error());
}

#[test]
fn given_missing_file_and_empty_filename_when_describing_then_messages_differ() {
    assert_ne!(
        TranscribeError::MissingFile.message(),
        TranscribeError::EmptyFilename.message()
    );
    assert_eq!(TranscribeError::MissingFile.details(), None);
}
