//! Khmer word segmentation.
//!
//! The pipeline is strictly one-way: raw text is normalized into canonical
//! orthographic clusters, covered by a minimum-cost dynamic program over the
//! dictionary, rewritten by a priority-ordered rule set, and finally adjacent
//! unknown tokens are coalesced.
//!
//! ```no_run
//! use khmercut::{Dictionary, KhmerSegmenter, RuleEngine};
//!
//! let dictionary = Dictionary::new("កម្ពុជា\nខ្ញុំ\n", None);
//! let rules = RuleEngine::compile(khmercut::rules::default_rule_specs());
//! let segmenter = KhmerSegmenter::new(dictionary, rules);
//! let tokens = segmenter.segment("ខ្ញុំកម្ពុជា");
//! ```

pub mod constants;
pub mod dictionary;
pub mod normalization;
pub mod rules;
pub mod segmenter;

pub use dictionary::Dictionary;
pub use normalization::khmer_normalize;
pub use rules::{RuleEngine, RuleSpec};
pub use segmenter::KhmerSegmenter;
