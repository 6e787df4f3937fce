use super::language_code::LanguageCode;

#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub word: String,
    pub start: f64,
    pub end: f64,
    pub score: Option<f32>,
}

impl Word {
    pub fn new(word: impl Into<String>, start: f64, end: f64, score: Option<f32>) -> Self {
        Self {
            word: word.into(),
            start,
            end,
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTranscript {
    pub language: LanguageCode,
    pub segments: Vec<AlignedSegment>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranscriptInvariantError {
    #[error("segment {segment}: word {word} ends before it starts")]
    WordEndsBeforeStart { segment: usize, word: usize },
    #[error("segment {segment}: word {word} starts before the previous word")]
    WordStartsOutOfOrder { segment: usize, word: usize },
    #[error("segment {segment}: word {word} has a non-finite timestamp")]
    NonFiniteTimestamp { segment: usize, word: usize },
}

impl AlignedTranscript {
    pub fn new(language: LanguageCode, segments: Vec<AlignedSegment>) -> Self {
        Self { language, segments }
    }

    pub fn word_count(&self) -> usize {
        self.segments.iter().map(|s| s.words.len()).sum()
    }

    /// Checks per-word ordering: `start <= end`, and starts never go backwards within a segment.
    pub fn validate(&self) -> Result<(), TranscriptInvariantError> {
        for (si, segment) in self.segments.iter().enumerate() {
            let mut previous_start = f64::NEG_INFINITY;
            for (wi, word) in segment.words.iter().enumerate() {
                if !word.start.is_finite() || !word.end.is_finite() {
                    return Err(TranscriptInvariantError::NonFiniteTimestamp {
                        segment: si,
                        word: wi,
                    });
                }
                if word.start > word.end {
                    return Err(TranscriptInvariantError::WordEndsBeforeStart {
                        segment: si,
                        word: wi,
                    });
                }
                if word.start < previous_start {
                    return Err(TranscriptInvariantError::WordStartsOutOfOrder {
                        segment: si,
                        word: wi,
                    });
                }
                previous_start = word.start;
            }
        }
        Ok(())
    }
}
