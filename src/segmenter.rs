use fxhash::FxHashMap;

use crate::constants::*;
use crate::dictionary::Dictionary;
use crate::normalization::khmer_normalize;
use crate::rules::{RuleEngine, RuleSpec};

/// Word segmenter over normalized Khmer text.
///
/// Immutable after construction; `segment` is a pure function of the input
/// and may be called from any number of threads.
pub struct KhmerSegmenter {
    dictionary: Dictionary,
    rules: RuleEngine,
}

impl KhmerSegmenter {
    pub fn new(dictionary: Dictionary, rules: RuleEngine) -> Self {
        KhmerSegmenter { dictionary, rules }
    }

    /// Build a segmenter straight from its raw inputs: newline-separated
    /// dictionary text, an optional frequency map, and a rule list.
    pub fn from_inputs(
        dict_text: &str,
        frequencies: Option<&FxHashMap<String, f64>>,
        rule_specs: Vec<RuleSpec>,
    ) -> Self {
        KhmerSegmenter::new(
            Dictionary::new(dict_text, frequencies),
            RuleEngine::compile(rule_specs),
        )
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Segment `text`: normalize, minimum-cost cover, rewrite rules, then
    /// coalesce adjacent unknowns.
    pub fn segment(&self, text: &str) -> Vec<String> {
        self.segment_impl(text, true)
    }

    /// The raw minimum-cost cover, without the rule engine and the unknown
    /// grouper. Concatenating the result always reproduces the normalized
    /// input.
    pub fn segment_raw(&self, text: &str) -> Vec<String> {
        self.segment_impl(text, false)
    }

    /// Like [`segment`](Self::segment), with each token annotated by
    /// [`is_unknown`](Self::is_unknown).
    pub fn segment_annotated(&self, text: &str) -> Vec<(String, bool)> {
        self.segment(text)
            .into_iter()
            .map(|token| {
                let unknown = self.is_unknown(&token);
                (token, unknown)
            })
            .collect()
    }

    /// True unless the token is recognizable: a dictionary word, a token
    /// opening with a digit, a stand-alone base character or separator, or
    /// a dotted acronym.
    pub fn is_unknown(&self, token: &str) -> bool {
        !self.is_known(token)
    }

    fn segment_impl(&self, text: &str, post_process: bool) -> Vec<String> {
        let normalized = khmer_normalize(text);
        if normalized.is_empty() {
            return Vec::new();
        }

        let cps: Vec<char> = normalized.chars().collect();
        let segments = self.min_cost_cover(&cps);
        if !post_process {
            return segments;
        }

        let segments = self.rules.apply(segments, &self.dictionary);
        self.group_unknowns(segments)
    }

    fn min_cost_cover(&self, cps: &[char]) -> Vec<String> {
        let n = cps.len();

        // dp[k] = (best cost covering cps[..k], start of the final segment)
        let mut dp: Vec<(f64, isize)> = vec![(f64::INFINITY, -1); n + 1];
        dp[0] = (0.0, -1);

        for i in 0..n {
            if dp[i].0.is_infinite() {
                continue;
            }
            let base_cost = dp[i].0;
            let c = cps[i];

            // Stranded diacritic: the previous char was a coeng that found
            // no base, or the position opens with a dependent vowel. Absorb
            // one char at a punitive cost so the cover always progresses.
            if (i > 0 && is_coeng(cps[i - 1])) || is_dependent_vowel(c) {
                let cost = base_cost + self.dictionary.unknown_cost + 50.0;
                if cost < dp[i + 1].0 {
                    dp[i + 1] = (cost, i as isize);
                }
                continue;
            }

            // 1. Digit runs, with interior , or . between digits
            if is_digit(c) {
                let len = number_run_length(cps, i);
                relax(&mut dp, i, i + len, 1.0);
            }

            // 2. Separators
            if is_separator(c) {
                relax(&mut dp, i, i + 1, 0.1);
            }

            // 3. Acronym chains (cluster "." cluster "." ...)
            if is_acronym_start(cps, i) {
                let len = acronym_length(cps, i);
                relax(&mut dp, i, i + len, self.dictionary.default_cost);
            }

            // 4. Dictionary words
            let end_limit = (i + self.dictionary.max_word_length).min(n);
            self.dictionary.scan_prefixes(cps, i, end_limit, |end, cost| {
                relax(&mut dp, i, end, cost);
            });

            // 5. Unknown fallback: a whole Khmer cluster, or one char of
            // anything else
            if is_khmer_char(c) {
                let len = cluster_length(cps, i);
                let mut cost = self.dictionary.unknown_cost;
                if len == 1 && !is_valid_single_word(c) {
                    cost += 10.0;
                }
                relax(&mut dp, i, i + len, cost);
            } else {
                relax(&mut dp, i, i + 1, self.dictionary.unknown_cost);
            }
        }

        // Backtrack; an unreached cell mid-walk degrades to a one-char step
        let mut segments: Vec<String> = Vec::new();
        let mut k = n;
        while k > 0 {
            let prev = dp[k].1;
            if prev < 0 {
                segments.push(cps[k - 1].to_string());
                k -= 1;
                continue;
            }
            let prev = prev as usize;
            segments.push(cps[prev..k].iter().collect());
            k = prev;
        }
        segments.reverse();
        segments
    }

    fn is_known(&self, segment: &str) -> bool {
        let mut chars = segment.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return false,
        };
        if is_digit(first) {
            return true;
        }
        if self.dictionary.contains(segment) {
            return true;
        }
        let single = chars.next().is_none();
        if single {
            return is_valid_single_word(first) || is_separator(first);
        }
        // Dotted tokens are acronyms as far as highlighting is concerned
        segment.contains('.')
    }

    // Coalesce adjacent unknown tokens. Runs of unknowns merge into one
    // token, except across a Khmer/non-Khmer boundary.
    fn group_unknowns(&self, segments: Vec<String>) -> Vec<String> {
        let mut grouped: Vec<String> = Vec::with_capacity(segments.len());
        let mut buffer: Vec<String> = Vec::new();

        for segment in segments {
            if self.is_known(&segment) {
                if !buffer.is_empty() {
                    grouped.push(buffer.concat());
                    buffer.clear();
                }
                grouped.push(segment);
                continue;
            }

            if let Some(tail) = buffer.last() {
                let tail_khmer = tail.chars().next().map(is_khmer_char).unwrap_or(false);
                let seg_khmer = segment.chars().next().map(is_khmer_char).unwrap_or(false);
                if tail_khmer != seg_khmer {
                    grouped.push(buffer.concat());
                    buffer.clear();
                }
            }
            buffer.push(segment);
        }

        if !buffer.is_empty() {
            grouped.push(buffer.concat());
        }
        grouped
    }
}

#[inline]
fn relax(dp: &mut [(f64, isize)], from: usize, to: usize, step_cost: f64) {
    if to < dp.len() {
        let cost = dp[from].0 + step_cost;
        if cost < dp[to].0 {
            dp[to] = (cost, from as isize);
        }
    }
}

// Codepoint helpers

/// Length of the orthographic cluster at `start`: a base plus coeng+consonant
/// subscripts, vowels and signs. Anything not opening with a base counts as a
/// single-char cluster.
fn cluster_length(cps: &[char], start: usize) -> usize {
    if start >= cps.len() {
        return 0;
    }
    if !is_base(cps[start]) {
        return 1;
    }

    let mut len = 1;
    let mut i = start + 1;
    while i < cps.len() {
        let c = cps[i];
        if is_coeng(c) {
            if i + 1 < cps.len() && is_consonant(cps[i + 1]) {
                len += 2;
                i += 2;
                continue;
            }
            break;
        }
        if is_dependent_vowel(c) || is_sign(c) {
            len += 1;
            i += 1;
            continue;
        }
        break;
    }
    len
}

/// Maximal digit run at `start`. A `,` or `.` joins the run only when a
/// digit follows it, so `1,234.5` is one run but the dot of `12.` is not.
fn number_run_length(cps: &[char], start: usize) -> usize {
    if start >= cps.len() || !is_digit(cps[start]) {
        return 0;
    }

    let mut last_valid_len = 1;
    let mut i = start + 1;
    while i < cps.len() {
        let c = cps[i];
        if is_digit(c) {
            last_valid_len = i - start + 1;
            i += 1;
            continue;
        }
        if (c == ',' || c == '.') && i + 1 < cps.len() && is_digit(cps[i + 1]) {
            last_valid_len = i - start + 2;
            i += 2;
            continue;
        }
        break;
    }
    last_valid_len
}

fn is_acronym_start(cps: &[char], start: usize) -> bool {
    if start >= cps.len() || !is_base(cps[start]) {
        return false;
    }
    let dot_index = start + cluster_length(cps, start);
    dot_index < cps.len() && cps[dot_index] == '.'
}

/// Length of the `cluster "." cluster "." ...` chain at `start`.
fn acronym_length(cps: &[char], start: usize) -> usize {
    let mut current = start;
    while current < cps.len() && is_base(cps[current]) {
        let dot_index = current + cluster_length(cps, current);
        if dot_index < cps.len() && cps[dot_index] == '.' {
            current = dot_index + 1;
        } else {
            break;
        }
    }
    current - start
}
