use std::collections::HashMap;

use wordstamp::application::ports::{AlignmentError, AlignmentModel};
use wordstamp::domain::{CtcVocabulary, Emissions, LanguageCode, TARGET_SAMPLE_RATE};

pub const BLANK: usize = 0;
pub const SEP: usize = 1;
pub const H: usize = 2;
pub const I: usize = 3;
pub const Y: usize = 4;
pub const O: usize = 5;
pub const WIDTH: usize = 6;

/// `<pad>`, `|`, h, i, y, o.
pub fn hiyo_vocabulary() -> CtcVocabulary {
    let tokens: HashMap<char, usize> = [('h', H), ('i', I), ('y', Y), ('o', O)]
        .into_iter()
        .collect();
    CtcVocabulary::new(tokens, BLANK, SEP)
}

/// One frame per entry; the listed token is near-certain, everything else unlikely.
pub fn peaked_log_probs(frames: &[usize]) -> Vec<Vec<f32>> {
    frames
        .iter()
        .map(|&token| {
            (0..WIDTH)
                .map(|t| if t == token { 0.0 } else { -10.0 })
                .collect()
        })
        .collect()
}

/// "hi yo" spoken over ten frames: h h i _ | y o o _ _
pub const HI_YO_FRAMES: [usize; 10] = [H, H, I, BLANK, SEP, Y, O, O, BLANK, BLANK];

/// Emits the same frame script for any audio window, stretched over the window's duration.
pub struct ScriptedCtcModel {
    pub language: LanguageCode,
    pub vocabulary: CtcVocabulary,
    pub frames: Vec<usize>,
}

impl ScriptedCtcModel {
    pub fn hi_yo(language: &str) -> Self {
        Self {
            language: LanguageCode::parse(language).unwrap(),
            vocabulary: hiyo_vocabulary(),
            frames: HI_YO_FRAMES.to_vec(),
        }
    }
}

impl AlignmentModel for ScriptedCtcModel {
    fn language(&self) -> &LanguageCode {
        &self.language
    }

    fn vocabulary(&self) -> &CtcVocabulary {
        &self.vocabulary
    }

    fn emissions(&self, samples: &[f32]) -> Result<Emissions, AlignmentError> {
        let secs = samples.len() as f64 / TARGET_SAMPLE_RATE as f64;
        Ok(Emissions::new(
            peaked_log_probs(&self.frames),
            secs / self.frames.len() as f64,
        ))
    }
}
