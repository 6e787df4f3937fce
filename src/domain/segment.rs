use super::language_code::LanguageCode;

/// Provisional span of speech produced by the recognition stage. Times are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Output of the speech recognition stage.
#[derive(Debug, Clone, PartialEq)]
pub struct AsrResult {
    pub language: Option<LanguageCode>,
    pub segments: Vec<Segment>,
}

impl AsrResult {
    pub fn new(language: Option<LanguageCode>, segments: Vec<Segment>) -> Self {
        Self { language, segments }
    }
}
