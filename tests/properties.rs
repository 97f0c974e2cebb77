//! Property tests for the pipeline invariants: segmentation is a partition
//! of the normalized text, normalization is a fixed point, and the output
//! never leaks zero-width characters or split vowel pairs.

use khmercut::dictionary::Dictionary;
use khmercut::normalization::khmer_normalize;
use khmercut::rules::{default_rule_specs, RuleEngine};
use khmercut::segmenter::KhmerSegmenter;
use proptest::prelude::*;

const DICT: &str = "ខ្ញុំ\nស្រលាញ់\nកម្ពុជា\nសួស្តី\nការ\nក\n";

fn segmenter() -> KhmerSegmenter {
    let dictionary = Dictionary::new(DICT, None);
    KhmerSegmenter::new(dictionary, RuleEngine::compile(default_rule_specs()))
}

// Khmer letters, modifiers and punctuation, digits, Latin, whitespace,
// zero-width characters, and the split-vowel halves.
fn khmerish_char() -> impl Strategy<Value = char> {
    prop_oneof![
        5 => proptest::char::range('\u{1780}', '\u{17B3}'), // bases
        3 => proptest::char::range('\u{17B6}', '\u{17C5}'), // dependent vowels
        2 => proptest::char::range('\u{17C6}', '\u{17DD}'), // signs, coeng, punctuation
        1 => proptest::char::range('\u{17E0}', '\u{17E9}'), // Khmer digits
        1 => proptest::char::range('0', '9'),
        1 => proptest::char::range('a', 'z'),
        1 => Just(' '),
        1 => Just('.'),
        1 => Just(','),
        1 => Just('\u{200B}'),
        1 => Just('\u{17C1}'),
        1 => Just('\u{17B8}'),
    ]
}

fn khmerish_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(khmerish_char(), 0..60).prop_map(|v| v.into_iter().collect::<String>())
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in khmerish_text()) {
        let once = khmer_normalize(&text);
        let twice = khmer_normalize(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_leaves_no_zero_width_or_split_vowels(text in khmerish_text()) {
        let normalized = khmer_normalize(&text);
        prop_assert!(!normalized.contains('\u{200B}'), "zero-width space leaked");
        prop_assert!(!normalized.contains('\u{200C}'), "zero-width non-joiner leaked");
        prop_assert!(!normalized.contains('\u{200D}'), "zero-width joiner leaked");
        prop_assert!(!normalized.contains("\u{17C1}\u{17B8}"), "split vowel pair leaked");
        prop_assert!(!normalized.contains("\u{17C1}\u{17B6}"), "split vowel pair leaked");
    }

    #[test]
    fn raw_cover_partitions_normalized_text(text in khmerish_text()) {
        let segmenter = segmenter();
        let raw = segmenter.segment_raw(&text);
        prop_assert_eq!(raw.concat(), khmer_normalize(&text));
    }

    #[test]
    fn post_processing_preserves_concatenation(text in khmerish_text()) {
        let segmenter = segmenter();
        let tokens = segmenter.segment(&text);
        prop_assert_eq!(tokens.concat(), khmer_normalize(&text));
    }

    #[test]
    fn tokens_are_never_empty(text in khmerish_text()) {
        let segmenter = segmenter();
        for token in segmenter.segment(&text) {
            prop_assert!(!token.is_empty());
        }
    }
}
