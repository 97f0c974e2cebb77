//! End-to-end test: dictionary text, JSON frequency map and JSON rules go in,
//! annotated tokens come out, exercising every stage of the pipeline.

use fxhash::FxHashMap;
use khmercut::dictionary::Dictionary;
use khmercut::normalization::khmer_normalize;
use khmercut::rules::{RuleEngine, RuleSpec};
use khmercut::segmenter::KhmerSegmenter;

const DICT: &str = "\
ខ្ញុំ
ទៅ
ផ្សារ
ទិញ
អង្ករ
គីឡូ
កម្ពុជា
ប្រទេស
";

const FREQ_JSON: &str = r#"{
    "ខ្ញុំ": 5000,
    "ទៅ": 3000,
    "ផ្សារ": 800,
    "ទិញ": 600,
    "អង្ករ": 200,
    "គីឡូ": 50,
    "កម្ពុជា": 1500,
    "ប្រទេស": 1200
}"#;

const RULES_JSON: &str = r#"[
    {
        "name": "snap_stranded_single",
        "priority": 0,
        "trigger": { "type": "complexity_check", "value": "is_invalid_single" },
        "checks": [ { "target": "prev", "check": "is_separator", "value": false } ],
        "action": "merge_prev"
    },
    {
        "name": "from_the_future",
        "priority": 50,
        "trigger": { "type": "quantum_entanglement", "value": "x" },
        "action": "keep"
    }
]"#;

fn build() -> KhmerSegmenter {
    let frequencies: FxHashMap<String, f64> =
        serde_json::from_str(FREQ_JSON).expect("frequency JSON parses");
    let rule_specs: Vec<RuleSpec> = serde_json::from_str(RULES_JSON).expect("rule JSON parses");

    let dictionary = Dictionary::new(DICT, Some(&frequencies));
    let rules = RuleEngine::compile(rule_specs);
    assert_eq!(rules.len(), 1, "the unknown trigger type must be dropped");

    KhmerSegmenter::new(dictionary, rules)
}

#[test]
fn test_full_pipeline_sentence() {
    let segmenter = build();

    // "I go to the market to buy 5 kilos of rice."
    let input = "ខ្ញុំទៅផ្សារទិញអង្ករ 5 គីឡូ។";
    let tokens = segmenter.segment(input);
    assert_eq!(
        tokens,
        vec!["ខ្ញុំ", "ទៅ", "ផ្សារ", "ទិញ", "អង្ករ", " ", "5", " ", "គីឡូ", "។"]
    );
    assert_eq!(tokens.concat(), khmer_normalize(input));
    assert!(tokens.iter().all(|t| !segmenter.is_unknown(t)));
}

#[test]
fn test_full_pipeline_with_unknowns() {
    let segmenter = build();

    let annotated = segmenter.segment_annotated("ខ្ញុំ love កម្ពុជា");
    assert_eq!(
        annotated,
        vec![
            ("ខ្ញុំ".to_string(), false),
            (" ".to_string(), false),
            ("love".to_string(), true),
            (" ".to_string(), false),
            ("កម្ពុជា".to_string(), false),
        ]
    );
}

#[test]
fn test_frequencies_steer_the_cover() {
    let segmenter = build();

    // Frequent words carry lower costs than the default
    let dictionary = segmenter.dictionary();
    assert!(dictionary.cost("ខ្ញុំ").unwrap() < dictionary.default_cost);
    assert!(dictionary.cost("គីឡូ").unwrap() < dictionary.default_cost);
    assert!(dictionary.unknown_cost > dictionary.default_cost);
}

#[test]
fn test_rule_from_json_fires_in_pipeline() {
    let segmenter = build();

    // A stranded sign after a word is folded back into it
    let tokens = segmenter.segment("ប្រទេស\u{17C6}");
    assert_eq!(tokens, vec!["ប្រទេស\u{17C6}"]);
}
