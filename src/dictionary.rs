use fxhash::{FxHashMap, FxHashSet};

use crate::constants::{
    is_digit, is_khmer_char, is_separator, is_valid_single_word, is_zero_width,
};
use crate::rules::SegmentPredicates;

// Below this floor every frequency count behaves the same; it also anchors
// the default and unknown costs.
const MIN_FREQ_FLOOR: f64 = 5.0;

#[derive(Default)]
struct TrieNode {
    children: FxHashMap<char, Box<TrieNode>>,
    // Cost of the word ending at this node, if one does.
    word_cost: Option<f64>,
}

impl TrieNode {
    #[inline]
    fn get_child(&self, c: char) -> Option<&TrieNode> {
        self.children.get(&c).map(|b| b.as_ref())
    }

    fn get_or_create_child(&mut self, c: char) -> &mut TrieNode {
        self.children.entry(c).or_insert_with(|| Box::new(TrieNode::default()))
    }
}

/// Immutable word set with per-word negative-log-probability costs.
///
/// Construction takes the raw newline-separated dictionary text and an
/// optional `word -> count` frequency map; after that the dictionary never
/// changes and may be shared across threads.
pub struct Dictionary {
    words: FxHashMap<String, f64>, // word -> cost
    trie: TrieNode,                // codepoint trie over the same set
    pub max_word_length: usize,    // longest entry, in codepoints
    pub default_cost: f64,
    pub unknown_cost: f64,
}

impl Dictionary {
    pub fn new(dict_text: &str, frequencies: Option<&FxHashMap<String, f64>>) -> Self {
        let mut word_set: FxHashSet<String> = FxHashSet::default();
        Dictionary::load_words(dict_text, &mut word_set);

        let (word_costs, default_cost, unknown_cost) =
            Dictionary::calculate_costs(frequencies, &word_set);

        let max_word_length = word_set.iter().map(|w| w.chars().count()).max().unwrap_or(0);

        let mut words = FxHashMap::default();
        let mut trie = TrieNode::default();
        for word in word_set {
            let cost = word_costs.get(&word).copied().unwrap_or(default_cost);

            let mut node = &mut trie;
            for c in word.chars() {
                node = node.get_or_create_child(c);
            }
            node.word_cost = Some(cost);

            words.insert(word, cost);
        }

        Dictionary { words, trie, max_word_length, default_cost, unknown_cost }
    }

    fn load_words(dict_text: &str, word_set: &mut FxHashSet<String>) {
        for line in dict_text.lines() {
            let word: String = line.trim().chars().filter(|c| !is_zero_width(*c)).collect();
            if word.is_empty() {
                continue;
            }

            // Single characters only survive as stand-alone words
            if word.chars().count() == 1 {
                let c = word.chars().next().unwrap();
                if !is_valid_single_word(c) {
                    continue;
                }
            }

            for variant in Dictionary::generate_variants(&word) {
                word_set.insert(variant);
            }
            word_set.insert(word);
        }

        // Cleanup over the final set, variants included
        let mut words_to_remove: FxHashSet<String> = FxHashSet::default();
        for word in word_set.iter() {
            // "X ឬ Y" compounds that decompose into members are spurious
            if word.contains('ឬ') && word.chars().count() > 1 {
                if let Some(suffix) = word.strip_prefix('ឬ') {
                    if word_set.contains(suffix) {
                        words_to_remove.insert(word.clone());
                    }
                } else if let Some(prefix) = word.strip_suffix('ឬ') {
                    if word_set.contains(prefix) {
                        words_to_remove.insert(word.clone());
                    }
                } else if word.split('ឬ').all(|p| p.is_empty() || word_set.contains(p)) {
                    words_to_remove.insert(word.clone());
                }
            }
            // The repetition sign never belongs to a lexeme
            if word.contains('ៗ') {
                words_to_remove.insert(word.clone());
            }
            if word.starts_with('\u{17D2}') {
                words_to_remove.insert(word.clone());
            }
        }
        for word in words_to_remove {
            word_set.remove(&word);
        }
    }

    fn calculate_costs(
        frequencies: Option<&FxHashMap<String, f64>>,
        word_set: &FxHashSet<String>,
    ) -> (FxHashMap<String, f64>, f64, f64) {
        let mut word_costs = FxHashMap::default();

        let Some(frequencies) = frequencies.filter(|f| !f.is_empty()) else {
            return (word_costs, 10.0, 20.0);
        };

        // Variants inherit the effective count of the word they were derived
        // from, unless the frequency data names them directly.
        let mut effective_counts: FxHashMap<String, f64> = FxHashMap::default();
        for (word, &count) in frequencies {
            let eff = count.max(MIN_FREQ_FLOOR);
            effective_counts.insert(word.clone(), eff);
            for variant in Dictionary::generate_variants(word) {
                effective_counts.entry(variant).or_insert(eff);
            }
        }

        let total_tokens: f64 = effective_counts.values().sum();
        if total_tokens <= 0.0 {
            return (word_costs, 10.0, 20.0);
        }

        let default_cost = -(MIN_FREQ_FLOOR / total_tokens).log10();
        let unknown_cost = default_cost + 5.0;

        for (word, eff) in effective_counts {
            // Frequency entries outside the dictionary carry no cost
            if word_set.contains(&word) {
                word_costs.insert(word, -(eff / total_tokens).log10());
            }
        }

        (word_costs, default_cost, unknown_cost)
    }

    /// Orthographic equivalents of `word`: coeng-ta/coeng-da swapped, and
    /// adjacent Ro/non-Ro subscript pairs reordered. `word` itself is not
    /// part of the result.
    pub fn generate_variants(word: &str) -> FxHashSet<String> {
        let mut variants = FxHashSet::default();
        let coeng_ta = "\u{17D2}\u{178F}";
        let coeng_da = "\u{17D2}\u{178A}";

        if word.contains(coeng_ta) {
            variants.insert(word.replace(coeng_ta, coeng_da));
        }
        if word.contains(coeng_da) {
            variants.insert(word.replace(coeng_da, coeng_ta));
        }

        // Ro subscript reordering applies to the word and to its ta/da forms
        let mut base_set = variants.clone();
        base_set.insert(word.to_string());

        let coeng = '\u{17D2}';
        let ro = '\u{179A}';

        for w in base_set {
            let chars: Vec<char> = w.chars().collect();
            if chars.len() < 4 {
                continue;
            }

            // (Coeng Ro)(Coeng Other) -> (Coeng Other)(Coeng Ro), all
            // non-overlapping matches in one pass
            let mut swapped = chars.clone();
            let mut modified = false;
            let mut i = 0;
            while i + 3 < swapped.len() {
                if swapped[i] == coeng
                    && swapped[i + 1] == ro
                    && swapped[i + 2] == coeng
                    && swapped[i + 3] != ro
                {
                    swapped.swap(i, i + 2);
                    swapped.swap(i + 1, i + 3);
                    modified = true;
                    i += 4;
                } else {
                    i += 1;
                }
            }
            if modified {
                variants.insert(swapped.iter().collect());
            }

            // (Coeng Other)(Coeng Ro) -> (Coeng Ro)(Coeng Other)
            let mut swapped = chars.clone();
            let mut modified = false;
            let mut i = 0;
            while i + 3 < swapped.len() {
                if swapped[i] == coeng
                    && swapped[i + 1] != ro
                    && swapped[i + 2] == coeng
                    && swapped[i + 3] == ro
                {
                    swapped.swap(i, i + 2);
                    swapped.swap(i + 1, i + 3);
                    modified = true;
                    i += 4;
                } else {
                    i += 1;
                }
            }
            if modified {
                variants.insert(swapped.iter().collect());
            }
        }

        variants.remove(word);
        variants
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    pub fn cost(&self, word: &str) -> Option<f64> {
        self.words.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Walk the trie from `start`, invoking `on_match(end, cost)` for every
    /// dictionary word `cps[start..end]` with `end <= end_limit`.
    #[inline]
    pub fn scan_prefixes(
        &self,
        cps: &[char],
        start: usize,
        end_limit: usize,
        mut on_match: impl FnMut(usize, f64),
    ) {
        let mut node = &self.trie;
        for (j, &c) in cps.iter().enumerate().take(end_limit).skip(start) {
            match node.get_child(c) {
                Some(child) => node = child,
                None => return,
            }
            if let Some(cost) = node.word_cost {
                on_match(j + 1, cost);
            }
        }
    }
}

impl SegmentPredicates for Dictionary {
    fn is_separator_segment(&self, segment: &str) -> bool {
        segment.chars().next().map(is_separator).unwrap_or(false)
    }

    fn is_invalid_single(&self, segment: &str) -> bool {
        let mut chars = segment.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return false,
        };
        if chars.next().is_some() {
            return false;
        }
        is_khmer_char(first)
            && !is_valid_single_word(first)
            && !is_digit(first)
            && !is_separator(first)
            && !self.contains(segment)
    }
}
