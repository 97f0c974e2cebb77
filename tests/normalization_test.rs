//! Unit tests for cluster normalization.

use khmercut::normalization::khmer_normalize;

#[test]
fn strips_zero_width_characters() {
    assert_eq!(khmer_normalize("a\u{200B}b"), "ab");
    assert_eq!(khmer_normalize("\u{200C}ក\u{200D}"), "ក");
    assert_eq!(khmer_normalize("\u{200B}\u{200C}\u{200D}"), "");
}

#[test]
fn fuses_split_vowels() {
    // E + II -> OE
    assert_eq!(khmer_normalize("\u{17C1}\u{17B8}"), "\u{17BE}");
    // E + AA -> AU
    assert_eq!(khmer_normalize("ក\u{17C1}\u{17B6}"), "ក\u{17C4}");
    // A zero-width space between the halves does not block fusion
    assert_eq!(khmer_normalize("ក\u{17C1}\u{200B}\u{17B8}"), "ក\u{17BE}");
}

#[test]
fn reorders_sign_before_vowel() {
    // KA + NIKAHIT(sign) + AA(vowel) -> KA + AA + NIKAHIT
    assert_eq!(
        khmer_normalize("\u{1780}\u{17C6}\u{17B6}"),
        "\u{1780}\u{17B6}\u{17C6}"
    );
}

#[test]
fn reorders_register_before_vowel() {
    // SA + AA(vowel) + MUUSIKATOAN(register) -> SA + MUUSIKATOAN + AA
    assert_eq!(
        khmer_normalize("\u{179F}\u{17B6}\u{17C9}"),
        "\u{179F}\u{17C9}\u{17B6}"
    );
}

#[test]
fn ro_subscript_sorts_after_other_subscripts() {
    // SA + coeng-RO + coeng-TA -> SA + coeng-TA + coeng-RO
    assert_eq!(
        khmer_normalize("\u{179F}\u{17D2}\u{179A}\u{17D2}\u{178F}"),
        "\u{179F}\u{17D2}\u{178F}\u{17D2}\u{179A}"
    );
    // Already canonical order is untouched
    assert_eq!(
        khmer_normalize("\u{179F}\u{17D2}\u{178F}\u{17D2}\u{179A}"),
        "\u{179F}\u{17D2}\u{178F}\u{17D2}\u{179A}"
    );
}

#[test]
fn subscripts_stay_before_vowels() {
    // KA + AA(vowel) + coeng-KA: the subscript moves in front of the vowel
    assert_eq!(
        khmer_normalize("\u{1780}\u{17B6}\u{17D2}\u{1780}"),
        "\u{1780}\u{17D2}\u{1780}\u{17B6}"
    );
}

#[test]
fn stray_coeng_is_preserved() {
    // Coeng with no following base stays where the cluster keeps it
    assert_eq!(khmer_normalize("ក\u{17D2}"), "ក\u{17D2}");
    // Coeng followed by a separator pairs with nothing
    assert_eq!(khmer_normalize("ក\u{17D2} ខ"), "ក\u{17D2} ខ");
}

#[test]
fn isolated_modifier_passes_through() {
    // A dependent vowel with no open cluster is emitted as-is
    assert_eq!(khmer_normalize("\u{17B6}ក"), "\u{17B6}ក");
}

#[test]
fn non_khmer_text_is_untouched() {
    assert_eq!(khmer_normalize("hello, world 123"), "hello, world 123");
}

#[test]
fn reordering_refuses_fusible_pairs() {
    // KA + E(vowel) + MUUSIKATOAN(register) + II(vowel): the register moves
    // in front of the vowels, making E and II adjacent; they must fuse.
    let normalized = khmer_normalize("\u{1780}\u{17C1}\u{17C9}\u{17B8}");
    assert_eq!(normalized, "\u{1780}\u{17C9}\u{17BE}");
    assert!(!normalized.contains("\u{17C1}\u{17B8}"));
}

#[test]
fn normalization_is_idempotent() {
    let samples = [
        "\u{1780}\u{17C6}\u{17B6}",
        "\u{179F}\u{17D2}\u{179A}\u{17D2}\u{178F}\u{17B8}",
        "\u{1780}\u{17C1}\u{17C9}\u{17B8}",
        "ក\u{17D2}x",
        "ព្រះរាជាណាចក្រកម្ពុជា",
        "abc ១២៣ ។",
    ];
    for sample in samples {
        let once = khmer_normalize(sample);
        assert_eq!(khmer_normalize(&once), once, "not idempotent for {:?}", sample);
    }
}
