use std::collections::HashMap;
use std::path::Path;

use ndarray::{Array2, Axis, Ix3};
use ort::session::Session;
use ort::value::Tensor;

use crate::application::ports::{AlignmentError, AlignmentModel};
use crate::domain::{CtcVocabulary, Emissions, LanguageCode, TARGET_SAMPLE_RATE};
use crate::infrastructure::ModelLock;

pub const MODEL_FILE: &str = "model.onnx";
pub const VOCAB_FILE: &str = "vocab.json";

/// wav2vec2 CTC head exported to ONNX. Input `[1, samples]`, output logits `[1, frames, vocab]`.
pub struct Wav2Vec2OnnxModel {
    session: ModelLock<Session>,
    vocabulary: CtcVocabulary,
    language: LanguageCode,
}

impl Wav2Vec2OnnxModel {
    /// Loads `model.onnx` and `vocab.json` from `dir`.
    pub fn load(dir: &Path, language: LanguageCode) -> Result<Self, AlignmentError> {
        let vocab_raw = std::fs::read_to_string(dir.join(VOCAB_FILE))
            .map_err(|e| AlignmentError::ModelLoadFailed(format!("read {}: {}", VOCAB_FILE, e)))?;
        let token_map: HashMap<String, usize> = serde_json::from_str(&vocab_raw)
            .map_err(|e| AlignmentError::ModelLoadFailed(format!("parse {}: {}", VOCAB_FILE, e)))?;
        let vocabulary = CtcVocabulary::from_token_map(&token_map).ok_or_else(|| {
            AlignmentError::ModelLoadFailed(format!(
                "{} lacks a blank (<pad>) or word separator (|) token",
                VOCAB_FILE
            ))
        })?;

        let session = Session::builder()
            .and_then(|b| b.commit_from_file(dir.join(MODEL_FILE)))
            .map_err(|e| AlignmentError::ModelLoadFailed(format!("{}: {}", MODEL_FILE, e)))?;

        tracing::info!(
            language = %language,
            vocab = vocabulary.len(),
            "wav2vec2 alignment model loaded"
        );

        Ok(Self {
            session: ModelLock::new(session),
            vocabulary,
            language,
        })
    }
}

impl AlignmentModel for Wav2Vec2OnnxModel {
    fn language(&self) -> &LanguageCode {
        &self.language
    }

    fn vocabulary(&self) -> &CtcVocabulary {
        &self.vocabulary
    }

    fn emissions(&self, samples: &[f32]) -> Result<Emissions, AlignmentError> {
        if samples.is_empty() {
            return Ok(Emissions::new(Vec::new(), 0.0));
        }

        let normalized = normalize_audio(samples);
        let input = Array2::from_shape_vec((1, normalized.len()), normalized)
            .map_err(|e| AlignmentError::AlignmentFailed(format!("input shape: {}", e)))?;
        let input = Tensor::from_array(input).map_err(runtime_err)?;

        let log_probs = self.session.with(|session| {
            let outputs = session.run(ort::inputs![input]).map_err(runtime_err)?;

            let logits = outputs[0]
                .try_extract_array::<f32>()
                .map_err(runtime_err)?
                .into_dimensionality::<Ix3>()
                .map_err(|e| AlignmentError::AlignmentFailed(format!("logits shape: {}", e)))?;

            let frames = logits.index_axis(Axis(0), 0);
            Ok::<_, AlignmentError>(
                frames
                    .rows()
                    .into_iter()
                    .map(|row| log_softmax(row.iter().copied()))
                    .collect::<Vec<Vec<f32>>>(),
            )
        })?;

        if log_probs.is_empty() {
            return Ok(Emissions::new(log_probs, 0.0));
        }

        let frame_secs = samples.len() as f64 / TARGET_SAMPLE_RATE as f64 / log_probs.len() as f64;
        Ok(Emissions::new(log_probs, frame_secs))
    }
}

fn normalize_audio(samples: &[f32]) -> Vec<f32> {
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&x| x as f64).sum::<f64>() / n;
    let var = samples
        .iter()
        .map(|&x| {
            let d = x as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    let std = var.sqrt().max(1e-7);
    samples
        .iter()
        .map(|&x| ((x as f64 - mean) / std) as f32)
        .collect()
}

fn log_softmax(logits: impl Iterator<Item = f32> + Clone) -> Vec<f32> {
    let max = logits.clone().fold(f32::NEG_INFINITY, f32::max);
    let log_sum = logits.clone().map(|x| (x - max).exp()).sum::<f32>().ln() + max;
    logits.map(|x| x - log_sum).collect()
}

fn runtime_err(e: ort::Error) -> AlignmentError {
    AlignmentError::AlignmentFailed(e.to_string())
}
