use std::path::Path;
use std::sync::Arc;

use wordstamp::application::ports::{AudioDecoder, AudioDecoderError};
use wordstamp::application::services::{PipelineError, StageTracker, TranscriptionPipeline};
use wordstamp::domain::{PipelineStage, SampleBuffer};

use crate::helpers::mock_ports::{EvenSplitAlignmentEngine, ScriptedTranscriptionEngine};

struct SilenceDecoder {
    seconds: usize,
}

impl AudioDecoder for SilenceDecoder {
    fn decode(&self, _path: &Path) -> Result<SampleBuffer, AudioDecoderError> {
        Ok(SampleBuffer::new(vec![0.0; 16_000 * self.seconds], 16_000))
    }
}

struct BrokenDecoder;

impl AudioDecoder for BrokenDecoder {
    fn decode(&self, _path: &Path) -> Result<SampleBuffer, AudioDecoderError> {
        Err(AudioDecoderError::DecodingFailed("probe: unsupported".to_string()))
    }
}

fn pipeline(
    decoder: Arc<dyn AudioDecoder>,
    engine: ScriptedTranscriptionEngine,
    aligner: EvenSplitAlignmentEngine,
) -> TranscriptionPipeline {
    TranscriptionPipeline::new(decoder, Arc::new(engine), Arc::new(aligner))
}

#[test]
fn given_all_stages_succeed_when_running_then_tracker_reaches_completed() {
    let pipeline = pipeline(
        Arc::new(SilenceDecoder { seconds: 2 }),
        ScriptedTranscriptionEngine::speaking("en", "hello world"),
        EvenSplitAlignmentEngine::supporting(&["en"]),
    );
    let mut tracker = StageTracker::new();
    tracker.advance(PipelineStage::FileReceived);

    let transcript = pipeline.run(Path::new("unused.wav"), &mut tracker).unwrap();

    assert_eq!(transcript.language.as_str(), "en");
    assert_eq!(transcript.word_count(), 2);
    assert_eq!(transcript.segments[0].end, 2.0);
    assert_eq!(
        tracker.history(),
        &[
            PipelineStage::Idle,
            PipelineStage::FileReceived,
            PipelineStage::AudioDecoded,
            PipelineStage::Transcribed,
            PipelineStage::LanguageResolved,
            PipelineStage::Aligned,
            PipelineStage::Completed,
        ]
    );
}

#[test]
fn given_decoder_failure_when_running_then_stops_before_recognition() {
    let engine = ScriptedTranscriptionEngine::speaking("en", "hello");
    let pipeline = TranscriptionPipeline::new(
        Arc::new(BrokenDecoder),
        Arc::new(engine),
        Arc::new(EvenSplitAlignmentEngine::supporting(&["en"])),
    );
    let mut tracker = StageTracker::new();
    tracker.advance(PipelineStage::FileReceived);

    let result = pipeline.run(Path::new("unused.wav"), &mut tracker);

    assert!(matches!(result, Err(PipelineError::AudioDecode(_))));
    assert_eq!(tracker.current(), PipelineStage::Failed);
    assert!(!tracker.history().contains(&PipelineStage::Transcribed));
}

#[test]
fn given_missing_language_when_running_then_returns_language_not_detected() {
    let pipeline = pipeline(
        Arc::new(SilenceDecoder { seconds: 1 }),
        ScriptedTranscriptionEngine::without_language("hello"),
        EvenSplitAlignmentEngine::supporting(&["en"]),
    );
    let mut tracker = StageTracker::new();

    let result = pipeline.run(Path::new("unused.wav"), &mut tracker);

    assert!(matches!(result, Err(PipelineError::LanguageNotDetected)));
}

#[test]
fn given_unsupported_language_when_running_then_returns_language_in_error() {
    let pipeline = pipeline(
        Arc::new(SilenceDecoder { seconds: 1 }),
        ScriptedTranscriptionEngine::speaking("sw", "habari"),
        EvenSplitAlignmentEngine::supporting(&["en", "fr"]),
    );
    let mut tracker = StageTracker::new();

    let result = pipeline.run(Path::new("unused.wav"), &mut tracker);

    match result {
        Err(PipelineError::UnsupportedLanguage(lang)) => assert_eq!(lang, "sw"),
        other => panic!("expected unsupported language, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn given_out_of_order_words_when_running_then_returns_invalid_alignment() {
    let pipeline = pipeline(
        Arc::new(SilenceDecoder { seconds: 1 }),
        ScriptedTranscriptionEngine::speaking("en", "one two three"),
        EvenSplitAlignmentEngine::reversed_words(),
    );
    let mut tracker = StageTracker::new();

    let result = pipeline.run(Path::new("unused.wav"), &mut tracker);

    assert!(matches!(result, Err(PipelineError::InvalidAlignment(_))));
    assert!(!tracker.history().contains(&PipelineStage::Aligned));
}
