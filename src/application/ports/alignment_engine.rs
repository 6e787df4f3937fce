use std::sync::Arc;

use crate::domain::{AlignedSegment, CtcVocabulary, Emissions, LanguageCode, SampleBuffer, Segment};

/// Language-specific acoustic model used to place words in time.
pub trait AlignmentModel: Send + Sync {
    fn language(&self) -> &LanguageCode;

    fn vocabulary(&self) -> &CtcVocabulary;

    fn emissions(&self, samples: &[f32]) -> Result<Emissions, AlignmentError>;
}

pub trait AlignmentEngine: Send + Sync {
    /// Selects the model for a language.
    /// Unknown languages yield [`AlignmentError::UnsupportedLanguage`].
    fn load_model(
        &self,
        language: &LanguageCode,
    ) -> Result<Arc<dyn AlignmentModel>, AlignmentError>;

    /// Word-level alignment. Returns one aligned segment per input segment, in input order.
    fn align(
        &self,
        segments: &[Segment],
        model: &dyn AlignmentModel,
        samples: &SampleBuffer,
    ) -> Result<Vec<AlignedSegment>, AlignmentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AlignmentError {
    #[error("no alignment model for language: {0}")]
    UnsupportedLanguage(String),
    #[error("alignment model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("alignment failed: {0}")]
    AlignmentFailed(String),
}
