use std::sync::Arc;

use tempfile::TempDir;

use wordstamp::application::ports::{AlignmentEngine, AlignmentError};
use wordstamp::domain::{LanguageCode, SampleBuffer, Segment};
use wordstamp::infrastructure::alignment::CtcAlignmentEngine;

use super::scripted_model::ScriptedCtcModel;

fn lang(code: &str) -> LanguageCode {
    LanguageCode::parse(code).unwrap()
}

#[test]
fn given_language_without_model_dir_when_loading_then_returns_unsupported() {
    let dir = TempDir::new().unwrap();
    let engine = CtcAlignmentEngine::new(dir.path());

    let result = engine.load_model(&lang("fr"));

    assert!(matches!(result, Err(AlignmentError::UnsupportedLanguage(l)) if l == "fr"));
}

#[test]
fn given_path_like_language_when_loading_then_returns_unsupported() {
    let dir = TempDir::new().unwrap();
    let engine = CtcAlignmentEngine::new(dir.path().join("models"));

    let result = engine.load_model(&lang("../models"));

    assert!(matches!(result, Err(AlignmentError::UnsupportedLanguage(_))));
}

#[test]
fn given_model_dir_without_vocab_when_loading_then_returns_load_failure() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("de")).unwrap();
    std::fs::write(dir.path().join("de").join("model.onnx"), b"not a model").unwrap();
    let engine = CtcAlignmentEngine::new(dir.path());

    let result = engine.load_model(&lang("de"));

    assert!(matches!(result, Err(AlignmentError::ModelLoadFailed(_))));
}

#[test]
fn given_registered_model_when_loading_then_returns_cached_instance() {
    let dir = TempDir::new().unwrap();
    let engine = CtcAlignmentEngine::new(dir.path());
    engine.register(Arc::new(ScriptedCtcModel::hi_yo("en")));

    let first = engine.load_model(&lang("en")).unwrap();
    let second = engine.load_model(&lang("EN")).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.language().as_str(), "en");
}

#[test]
fn given_segments_when_aligning_then_returns_one_aligned_segment_per_input() {
    let dir = TempDir::new().unwrap();
    let engine = CtcAlignmentEngine::new(dir.path());
    let model = ScriptedCtcModel::hi_yo("en");
    let audio = SampleBuffer::new(vec![0.0; 32_000], 16_000);
    let segments = vec![
        Segment::new(0.0, 1.0, "hi yo"),
        Segment::new(1.0, 2.0, "yo hi"),
    ];

    let aligned = engine.align(&segments, &model, &audio).unwrap();

    assert_eq!(aligned.len(), 2);
    assert_eq!(aligned[0].text, "hi yo");
    assert_eq!(aligned[1].text, "yo hi");
    assert_eq!(aligned[0].words.len(), 2);
    assert!((aligned[0].words[1].start - 0.5).abs() < 1e-9);
    for segment in &aligned {
        for pair in segment.words.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
    }
}

#[test]
fn given_later_segment_when_aligning_then_words_are_offset_by_segment_start() {
    let dir = TempDir::new().unwrap();
    let engine = CtcAlignmentEngine::new(dir.path());
    let model = ScriptedCtcModel::hi_yo("en");
    let audio = SampleBuffer::new(vec![0.0; 48_000], 16_000);

    let aligned = engine
        .align(&[Segment::new(2.0, 3.0, "hi yo")], &model, &audio)
        .unwrap();

    let words = &aligned[0].words;
    assert!((words[0].start - 2.0).abs() < 1e-9);
    assert!((words[1].end - 2.8).abs() < 1e-9);
}

#[test]
fn given_preload_list_with_missing_models_when_preloading_then_does_not_panic() {
    let dir = TempDir::new().unwrap();
    let engine = CtcAlignmentEngine::new(dir.path());

    engine.preload(&["en".to_string(), " ".to_string()]);

    assert!(engine.load_model(&lang("en")).is_err());
}
