use std::collections::HashMap;

use wordstamp::domain::CtcVocabulary;

fn token_map(entries: &[(&str, usize)]) -> HashMap<String, usize> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn given_wav2vec2_vocab_when_building_then_reads_special_tokens() {
    let raw = token_map(&[("<pad>", 0), ("<s>", 1), ("</s>", 2), ("<unk>", 3), ("|", 4), ("E", 5), ("T", 6)]);

    let vocab = CtcVocabulary::from_token_map(&raw).unwrap();

    assert_eq!(vocab.blank_id(), 0);
    assert_eq!(vocab.word_separator_id(), 4);
    assert_eq!(vocab.token_for('e'), Some(5));
    assert_eq!(vocab.token_for('T'), Some(6));
}

#[test]
fn given_vocab_without_separator_when_building_then_returns_none() {
    let raw = token_map(&[("<pad>", 0), ("a", 1)]);

    assert!(CtcVocabulary::from_token_map(&raw).is_none());
}

#[test]
fn given_blank_alias_when_building_then_accepts_it() {
    let raw = token_map(&[("<blank>", 0), ("|", 1), ("a", 2)]);

    let vocab = CtcVocabulary::from_token_map(&raw).unwrap();

    assert_eq!(vocab.blank_id(), 0);
}

#[test]
fn given_unknown_or_separator_char_when_looking_up_then_returns_none() {
    let raw = token_map(&[("<pad>", 0), ("|", 1), ("a", 2)]);
    let vocab = CtcVocabulary::from_token_map(&raw).unwrap();

    assert_eq!(vocab.token_for('z'), None);
    assert_eq!(vocab.token_for('|'), None);
    assert_eq!(vocab.token_for('A'), Some(2));
}
