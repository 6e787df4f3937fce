//! CTC forced alignment: Viterbi over a blank-interleaved token sequence, then
//! frames grouped back into the words of the transcript.

use crate::application::ports::AlignmentError;
use crate::domain::{CtcVocabulary, Emissions, Word};

struct TokenSequence {
    tokens: Vec<usize>,
    /// Index of the transcript word each token spells, `None` for blanks and separators.
    owners: Vec<Option<usize>>,
}

/// Aligns the whitespace-separated words of `text` against `emissions`.
///
/// Timestamps are offset by `offset_secs`. Words with no character in the vocabulary
/// cannot be placed; they collapse onto the end of the previous word and carry no score.
pub fn align_words(
    text: &str,
    emissions: &Emissions,
    vocabulary: &CtcVocabulary,
    offset_secs: f64,
) -> Result<Vec<Word>, AlignmentError> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let sequence = build_token_sequence(&words, vocabulary);
    if sequence.owners.iter().all(Option::is_none) {
        return Ok(words
            .iter()
            .map(|w| Word::new(*w, offset_secs, offset_secs, None))
            .collect());
    }

    let num_frames = emissions.num_frames();
    let min_frames = sequence.tokens.len().div_ceil(2);
    if num_frames < min_frames {
        return Err(AlignmentError::AlignmentFailed(format!(
            "audio too short for transcript: {} frames < {} required",
            num_frames, min_frames
        )));
    }

    let width = emissions.log_probs.iter().map(Vec::len).min().unwrap_or(0);
    if let Some(&max_token) = sequence.tokens.iter().max() {
        if max_token >= width {
            return Err(AlignmentError::AlignmentFailed(format!(
                "vocabulary token {} outside emission width {}",
                max_token, width
            )));
        }
    }

    let path = viterbi(&emissions.log_probs, &sequence.tokens);
    if path.is_empty() {
        return Err(AlignmentError::AlignmentFailed(
            "no valid alignment path".to_string(),
        ));
    }

    Ok(group_into_words(
        &words,
        &sequence,
        &path,
        emissions,
        offset_secs,
    ))
}

fn build_token_sequence(words: &[&str], vocabulary: &CtcVocabulary) -> TokenSequence {
    let blank = vocabulary.blank_id();
    let mut tokens = vec![blank];
    let mut owners = vec![None];
    let mut any_previous = false;

    for (wi, word) in words.iter().enumerate() {
        let ids: Vec<usize> = word.chars().filter_map(|c| vocabulary.token_for(c)).collect();
        if ids.is_empty() {
            continue;
        }
        if any_previous {
            tokens.push(vocabulary.word_separator_id());
            owners.push(None);
            tokens.push(blank);
            owners.push(None);
        }
        for id in ids {
            tokens.push(id);
            owners.push(Some(wi));
            tokens.push(blank);
            owners.push(None);
        }
        any_previous = true;
    }

    TokenSequence { tokens, owners }
}

/// Best state per frame. Returns an empty path when no complete path exists.
fn viterbi(log_probs: &[Vec<f32>], tokens: &[usize]) -> Vec<usize> {
    let t_len = log_probs.len();
    let s_len = tokens.len();
    if t_len == 0 || s_len == 0 {
        return Vec::new();
    }

    let mut dp = vec![vec![f32::NEG_INFINITY; s_len]; t_len];
    let mut bp = vec![vec![0usize; s_len]; t_len];

    dp[0][0] = log_probs[0][tokens[0]];
    if s_len > 1 {
        dp[0][1] = log_probs[0][tokens[1]];
    }

    for t in 1..t_len {
        for s in 0..s_len {
            let emit = log_probs[t][tokens[s]];
            let mut best = dp[t - 1][s];
            let mut from = s;

            if s >= 1 && dp[t - 1][s - 1] > best {
                best = dp[t - 1][s - 1];
                from = s - 1;
            }
            if s >= 2 && tokens[s] != tokens[s - 2] && dp[t - 1][s - 2] > best {
                best = dp[t - 1][s - 2];
                from = s - 2;
            }

            dp[t][s] = best + emit;
            bp[t][s] = from;
        }
    }

    let mut s = s_len - 1;
    if s_len >= 2 && dp[t_len - 1][s_len - 2] > dp[t_len - 1][s_len - 1] {
        s = s_len - 2;
    }
    if dp[t_len - 1][s] == f32::NEG_INFINITY {
        return Vec::new();
    }

    let mut path = vec![s];
    for t in (1..t_len).rev() {
        s = bp[t][s];
        path.push(s);
    }
    path.reverse();
    path
}

struct WordSpan {
    first_frame: usize,
    last_frame: usize,
    log_prob_sum: f32,
    frames: usize,
}

fn group_into_words(
    words: &[&str],
    sequence: &TokenSequence,
    path: &[usize],
    emissions: &Emissions,
    offset_secs: f64,
) -> Vec<Word> {
    let mut spans: Vec<Option<WordSpan>> = words.iter().map(|_| None).collect();

    for (frame, &state) in path.iter().enumerate() {
        let Some(wi) = sequence.owners[state] else {
            continue;
        };
        let lp = emissions.log_probs[frame][sequence.tokens[state]];
        match spans[wi].as_mut() {
            Some(span) => {
                span.last_frame = frame;
                span.log_prob_sum += lp;
                span.frames += 1;
            }
            None => {
                spans[wi] = Some(WordSpan {
                    first_frame: frame,
                    last_frame: frame,
                    log_prob_sum: lp,
                    frames: 1,
                });
            }
        }
    }

    let mut aligned = Vec::with_capacity(words.len());
    let mut previous_end = offset_secs;

    for (word, span) in words.iter().zip(spans) {
        let entry = match span {
            Some(span) => {
                let start = offset_secs + span.first_frame as f64 * emissions.frame_secs;
                let end = offset_secs + (span.last_frame + 1) as f64 * emissions.frame_secs;
                let score = (span.log_prob_sum / span.frames as f32).exp();
                Word::new(*word, start, end, Some(score))
            }
            None => Word::new(*word, previous_end, previous_end, None),
        };
        previous_end = entry.end;
        aligned.push(entry);
    }

    aligned
}
