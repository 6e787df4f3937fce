use std::collections::HashMap;

/// Character vocabulary of a CTC acoustic model.
#[derive(Debug, Clone, PartialEq)]
pub struct CtcVocabulary {
    tokens: HashMap<char, usize>,
    blank_id: usize,
    word_separator_id: usize,
}

impl CtcVocabulary {
    pub fn new(tokens: HashMap<char, usize>, blank_id: usize, word_separator_id: usize) -> Self {
        Self {
            tokens,
            blank_id,
            word_separator_id,
        }
    }

    /// Builds a vocabulary from a `vocab.json` style map. Multi-character entries such as
    /// `<pad>` are skipped; `<pad>` (or `<blank>`) and `|` provide the special ids.
    pub fn from_token_map(raw: &HashMap<String, usize>) -> Option<Self> {
        let blank_id = raw
            .get("<pad>")
            .or_else(|| raw.get("<blank>"))
            .copied()?;
        let word_separator_id = raw.get("|").copied()?;

        let tokens = raw
            .iter()
            .filter_map(|(k, &v)| {
                let mut it = k.chars();
                let c = it.next()?;
                if it.next().is_some() {
                    return None;
                }
                Some((c, v))
            })
            .collect();

        Some(Self::new(tokens, blank_id, word_separator_id))
    }

    pub fn blank_id(&self) -> usize {
        self.blank_id
    }

    pub fn word_separator_id(&self) -> usize {
        self.word_separator_id
    }

    /// Looks a character up, trying the lowercase then the uppercase form.
    pub fn token_for(&self, c: char) -> Option<usize> {
        if c == '|' {
            return None;
        }
        c.to_lowercase()
            .next()
            .and_then(|lc| self.tokens.get(&lc))
            .or_else(|| c.to_uppercase().next().and_then(|uc| self.tokens.get(&uc)))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Frame-level log-probabilities emitted by a CTC acoustic model.
#[derive(Debug, Clone, PartialEq)]
pub struct Emissions {
    /// `[frame][token]` log-probabilities.
    pub log_probs: Vec<Vec<f32>>,
    /// Duration covered by one frame.
    pub frame_secs: f64,
}

impl Emissions {
    pub fn new(log_probs: Vec<Vec<f32>>, frame_secs: f64) -> Self {
        Self {
            log_probs,
            frame_secs,
        }
    }

    pub fn num_frames(&self) -> usize {
        self.log_probs.len()
    }
}
