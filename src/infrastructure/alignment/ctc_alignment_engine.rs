use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::application::ports::{AlignmentEngine, AlignmentError, AlignmentModel};
use crate::domain::{AlignedSegment, LanguageCode, SampleBuffer, Segment};

use super::forced_aligner::align_words;
use super::wav2vec2_onnx_model::{MODEL_FILE, Wav2Vec2OnnxModel};

/// Per-language CTC aligner. Models live under `<models_dir>/<language>/` and are
/// loaded once, then shared by every request.
pub struct CtcAlignmentEngine {
    models_dir: PathBuf,
    models: RwLock<HashMap<LanguageCode, Arc<dyn AlignmentModel>>>,
}

impl CtcAlignmentEngine {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            models: RwLock::new(HashMap::new()),
        }
    }

    /// Makes an already constructed model available under its own language.
    pub fn register(&self, model: Arc<dyn AlignmentModel>) {
        let language = model.language().clone();
        if let Ok(mut models) = self.models.write() {
            models.insert(language, model);
        }
    }

    /// Eagerly loads the given languages. Failures are logged and skipped.
    pub fn preload(&self, languages: &[String]) {
        for raw in languages {
            let Some(language) = LanguageCode::parse(raw) else {
                continue;
            };
            match self.load_model(&language) {
                Ok(_) => tracing::info!(language = %language, "Alignment model preloaded"),
                Err(e) => {
                    tracing::warn!(language = %language, error = %e, "Alignment model preload failed")
                }
            }
        }
    }

    fn cached(&self, language: &LanguageCode) -> Option<Arc<dyn AlignmentModel>> {
        self.models
            .read()
            .ok()
            .and_then(|models| models.get(language).cloned())
    }
}

fn is_plain_code(language: &LanguageCode) -> bool {
    let code = language.as_str();
    !code.is_empty()
        && code.len() <= 16
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl AlignmentEngine for CtcAlignmentEngine {
    fn load_model(
        &self,
        language: &LanguageCode,
    ) -> Result<Arc<dyn AlignmentModel>, AlignmentError> {
        if let Some(model) = self.cached(language) {
            return Ok(model);
        }

        if !is_plain_code(language) {
            return Err(AlignmentError::UnsupportedLanguage(
                language.as_str().to_string(),
            ));
        }

        let dir = self.models_dir.join(language.as_str());
        if !dir.join(MODEL_FILE).is_file() {
            return Err(AlignmentError::UnsupportedLanguage(
                language.as_str().to_string(),
            ));
        }

        let model: Arc<dyn AlignmentModel> =
            Arc::new(Wav2Vec2OnnxModel::load(&dir, language.clone())?);

        let mut models = self
            .models
            .write()
            .map_err(|_| AlignmentError::ModelLoadFailed("model cache poisoned".to_string()))?;
        let model = models.entry(language.clone()).or_insert(model).clone();
        Ok(model)
    }

    fn align(
        &self,
        segments: &[Segment],
        model: &dyn AlignmentModel,
        samples: &SampleBuffer,
    ) -> Result<Vec<AlignedSegment>, AlignmentError> {
        let mut aligned = Vec::with_capacity(segments.len());

        for (index, segment) in segments.iter().enumerate() {
            let window = samples.slice_secs(segment.start, segment.end);
            let emissions = model.emissions(window)?;
            let words = align_words(
                &segment.text,
                &emissions,
                model.vocabulary(),
                segment.start,
            )
            .map_err(|e| match e {
                AlignmentError::AlignmentFailed(msg) => {
                    AlignmentError::AlignmentFailed(format!("segment {}: {}", index, msg))
                }
                other => other,
            })?;

            tracing::debug!(
                segment = index,
                words = words.len(),
                frames = emissions.num_frames(),
                "Segment aligned"
            );

            aligned.push(AlignedSegment {
                start: segment.start,
                end: segment.end,
                text: segment.text.clone(),
                words,
            });
        }

        Ok(aligned)
    }
}
