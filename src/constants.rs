// Khmer script tables: codepoint classification for the normalizer, the DP
// segmenter and the known-token predicate.

pub fn is_khmer_char(c: char) -> bool {
    let code = c as u32;
    (code >= 0x1780 && code <= 0x17FF) || (code >= 0x19E0 && code <= 0x19FF)
}

pub fn is_consonant(c: char) -> bool {
    let code = c as u32;
    code >= 0x1780 && code <= 0x17A2
}

pub fn is_independent_vowel(c: char) -> bool {
    let code = c as u32;
    code >= 0x17A3 && code <= 0x17B3
}

/// Anchor of an orthographic cluster: consonant or independent vowel.
pub fn is_base(c: char) -> bool {
    is_consonant(c) || is_independent_vowel(c)
}

pub fn is_dependent_vowel(c: char) -> bool {
    let code = c as u32;
    code >= 0x17B6 && code <= 0x17C5
}

/// Muusikatoan / Triisap series shifters.
pub fn is_register(c: char) -> bool {
    c == '\u{17C9}' || c == '\u{17CA}'
}

// Range includes the register shifters; classify with is_register first where
// the distinction matters (cluster modifier ordering).
pub fn is_sign(c: char) -> bool {
    let code = c as u32;
    (code >= 0x17C6 && code <= 0x17D1) || c == '\u{17D3}' || c == '\u{17DD}'
}

pub fn is_coeng(c: char) -> bool {
    c == '\u{17D2}'
}

pub fn is_digit(c: char) -> bool {
    let code = c as u32;
    // ASCII 0-9 or Khmer 0-9
    (code >= 0x30 && code <= 0x39) || (code >= 0x17E0 && code <= 0x17E9)
}

pub fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}')
}

pub fn is_separator(c: char) -> bool {
    let code = c as u32;
    // Khmer punctuation 0x17D4 - 0x17DA, plus Currency Reil (U+17DB)
    if code >= 0x17D4 && code <= 0x17DB {
        return true;
    }
    if code < 0x80 {
        return c.is_ascii_punctuation() || c.is_ascii_whitespace();
    }
    // All Unicode space separators, U+00A0 included
    if c.is_whitespace() {
        return true;
    }
    // Latin-1 guillemets, currency, double acute accent
    if matches!(c, '\u{00AB}' | '\u{00BB}' | '\u{00A3}' | '\u{00A5}' | '\u{02DD}') {
        return true;
    }
    // General Punctuation
    if code >= 0x2000 && code <= 0x206F {
        return true;
    }
    // Currency Symbols
    code >= 0x20A0 && code <= 0x20CF
}

// Valid single-character words (Consonants + Independent Vowels)
pub fn is_valid_single_word(c: char) -> bool {
    // Consonants
    if matches!(c, 'ក' | 'ខ' | 'គ' | 'ង' | 'ច' | 'ឆ' | 'ញ' | 'ដ' | 'ត' | 'ទ' | 'ព' | 'រ' | 'ល' | 'ស' | 'ឡ') {
        return true;
    }
    // Independent Vowels
    matches!(c, 'ឬ' | 'ឮ' | 'ឪ' | 'ឯ' | 'ឱ' | 'ឦ' | 'ឧ' | 'ឳ')
}
