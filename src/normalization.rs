//! Canonicalization of Khmer orthographic clusters.
//!
//! Text produced by editors and keyboards carries zero-width joiners, split
//! vowel encodings and visually identical modifier orderings. Dictionary
//! lookups need one canonical form, so before segmentation every cluster is
//! rebuilt as: base, subscripts, register, dependent vowels, signs.

use crate::constants::{
    is_base, is_coeng, is_dependent_vowel, is_register, is_sign, is_zero_width,
};

/// One attached unit of a cluster: either a subscript (coeng + base) or a
/// single modifier codepoint.
#[derive(Clone, Copy)]
struct ClusterPart {
    head: char,
    subscript: Option<char>,
}

// Serialization order within a cluster. Ro subscripts render around the
// whole cluster and sort after the other subscripts; a coeng that never
// found its base sits between the two.
fn part_priority(part: &ClusterPart) -> u8 {
    if is_coeng(part.head) {
        return match part.subscript {
            Some('\u{179A}') => 3, // Ro subscript
            Some(_) => 1,
            None => 2, // stray coeng
        };
    }
    if is_register(part.head) {
        4
    } else if is_dependent_vowel(part.head) {
        5
    } else if is_sign(part.head) {
        6
    } else {
        7
    }
}

/// Normalize `text` into canonical cluster form.
///
/// Idempotent: `khmer_normalize(khmer_normalize(x)) == khmer_normalize(x)`.
pub fn khmer_normalize(text: &str) -> String {
    let fused = fuse_split_vowels(text.chars().filter(|c| !is_zero_width(*c)));

    let cps: Vec<char> = fused.chars().collect();
    let n = cps.len();
    let mut out = String::with_capacity(fused.len());
    let mut cluster: Vec<ClusterPart> = Vec::with_capacity(8);

    let mut i = 0;
    while i < n {
        let c = cps[i];
        if is_base(c) {
            flush_cluster(&mut out, &mut cluster);
            cluster.push(ClusterPart { head: c, subscript: None });
            i += 1;
        } else if is_coeng(c) {
            // Pair with the following base; a trailing or orphaned coeng
            // stays in the cluster as a unit of its own.
            if i + 1 < n && is_base(cps[i + 1]) {
                cluster.push(ClusterPart { head: c, subscript: Some(cps[i + 1]) });
                i += 2;
            } else {
                cluster.push(ClusterPart { head: c, subscript: None });
                i += 1;
            }
        } else if is_register(c) || is_dependent_vowel(c) || is_sign(c) {
            if cluster.is_empty() {
                out.push(c);
            } else {
                cluster.push(ClusterPart { head: c, subscript: None });
            }
            i += 1;
        } else {
            flush_cluster(&mut out, &mut cluster);
            out.push(c);
            i += 1;
        }
    }
    flush_cluster(&mut out, &mut cluster);

    // Reordering can bring a previously separated split-vowel pair back
    // together; fuse once more so the output is a fixed point.
    fuse_split_vowels(out.chars())
}

// U+17C1 U+17B8 -> U+17BE, U+17C1 U+17B6 -> U+17C4.
fn fuse_split_vowels(chars: impl Iterator<Item = char>) -> String {
    let mut out = String::new();
    let mut chars = chars.peekable();
    while let Some(c) = chars.next() {
        if c == '\u{17C1}' {
            match chars.peek() {
                Some('\u{17B8}') => {
                    out.push('\u{17BE}');
                    chars.next();
                    continue;
                }
                Some('\u{17B6}') => {
                    out.push('\u{17C4}');
                    chars.next();
                    continue;
                }
                _ => {}
            }
        }
        out.push(c);
    }
    out
}

fn flush_cluster(out: &mut String, cluster: &mut Vec<ClusterPart>) {
    if cluster.is_empty() {
        return;
    }
    // The leading element (normally the base) stays put; the modifiers sort
    // by priority, equal priorities keeping their input order.
    cluster[1..].sort_by_key(part_priority);
    for part in cluster.iter() {
        out.push(part.head);
        if let Some(sub) = part.subscript {
            out.push(sub);
        }
    }
    cluster.clear();
}
