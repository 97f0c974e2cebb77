//! Declarative post-segmentation rewrite rules.
//!
//! A rule set is an ordered list of `{name, priority, trigger, checks,
//! action}` objects, typically loaded from JSON. Rules compile once
//! (descending priority, regex triggers anchored at the start of the
//! segment) and are then applied to token sequences by an index walker:
//! the first matching rule at a position fires, merges re-evaluate the
//! merged token from the top of the list, `keep` pins the token and moves
//! on. Malformed rules are dropped at compile time; an engine with zero
//! rules is still valid.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// Predicates the rule engine needs from its caller. Keeps the engine free
/// of a back-reference to the segmenter that owns it.
pub trait SegmentPredicates {
    /// Does this segment open with a separator character?
    fn is_separator_segment(&self, segment: &str) -> bool;
    /// Single Khmer char that is no word on its own: not a stand-alone
    /// base, digit, separator, or dictionary entry.
    fn is_invalid_single(&self, segment: &str) -> bool;
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    pub trigger: TriggerSpec,
    #[serde(default)]
    pub checks: Vec<CheckSpec>,
    pub action: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckSpec {
    pub target: String,
    #[serde(default)]
    pub exists: Option<bool>,
    #[serde(default)]
    pub check: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
}

enum Trigger {
    ExactMatch(String),
    Prefix(Regex),
    InvalidSingle,
}

#[derive(Clone, Copy)]
enum Action {
    MergeNext,
    MergePrev,
    Keep,
}

#[derive(Clone, Copy)]
enum Target {
    Prev,
    Next,
    Current,
}

#[derive(Clone, Copy)]
enum CheckKind {
    IsSeparator,
    IsIsolated,
    // Unknown kind from a newer rules file: evaluates to pass
    Unsupported,
}

struct Check {
    target: Target,
    exists: Option<bool>,
    kind: Option<CheckKind>,
    value: Option<Value>,
}

struct Rule {
    #[allow(dead_code)]
    name: String,
    trigger: Trigger,
    checks: Vec<Check>,
    action: Action,
}

pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Compile a rule list. Malformed rules (bad regex, unknown trigger
    /// type, action or check target) are logged and dropped.
    pub fn compile(mut specs: Vec<RuleSpec>) -> Self {
        // Stable sort: equal priorities keep file order
        specs.sort_by_key(|spec| std::cmp::Reverse(spec.priority));

        let mut rules = Vec::with_capacity(specs.len());
        'next_spec: for spec in specs {
            let trigger = match spec.trigger.kind.as_str() {
                "exact_match" => Trigger::ExactMatch(spec.trigger.value.clone()),
                "regex" => match Regex::new(&format!("^(?:{})", spec.trigger.value)) {
                    Ok(re) => Trigger::Prefix(re),
                    Err(err) => {
                        eprintln!("Dropping rule '{}': bad regex: {}", spec.name, err);
                        continue;
                    }
                },
                "complexity_check" if spec.trigger.value == "is_invalid_single" => {
                    Trigger::InvalidSingle
                }
                other => {
                    eprintln!(
                        "Dropping rule '{}': unknown trigger '{}'/'{}'",
                        spec.name, other, spec.trigger.value
                    );
                    continue;
                }
            };

            let action = match spec.action.as_str() {
                "merge_next" => Action::MergeNext,
                "merge_prev" => Action::MergePrev,
                "keep" => Action::Keep,
                other => {
                    eprintln!("Dropping rule '{}': unknown action '{}'", spec.name, other);
                    continue;
                }
            };

            let mut checks = Vec::with_capacity(spec.checks.len());
            for check in spec.checks {
                let target = match check.target.as_str() {
                    "prev" => Target::Prev,
                    "next" => Target::Next,
                    "current" | "context" => Target::Current,
                    other => {
                        eprintln!(
                            "Dropping rule '{}': unknown check target '{}'",
                            spec.name, other
                        );
                        continue 'next_spec;
                    }
                };
                let kind = check.check.as_deref().map(|kind| match kind {
                    "is_separator" => CheckKind::IsSeparator,
                    "is_isolated" => CheckKind::IsIsolated,
                    other => {
                        eprintln!(
                            "Rule '{}': unsupported check '{}' will always pass",
                            spec.name, other
                        );
                        CheckKind::Unsupported
                    }
                });
                checks.push(Check { target, exists: check.exists, kind, value: check.value });
            }

            rules.push(Rule { name: spec.name, trigger, checks, action });
        }

        RuleEngine { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite `segments` in place. Terminates: every merge shortens the
    /// sequence and everything else advances the cursor.
    pub fn apply(&self, mut segments: Vec<String>, predicates: &dyn SegmentPredicates) -> Vec<String> {
        let mut i = 0;
        while i < segments.len() {
            let mut fired = false;
            for rule in &self.rules {
                if !rule.matches(&segments, i, predicates) {
                    continue;
                }
                match rule.action {
                    Action::MergeNext if i + 1 < segments.len() => {
                        let next = segments.remove(i + 1);
                        segments[i].push_str(&next);
                        fired = true;
                    }
                    Action::MergePrev if i > 0 => {
                        let current = segments.remove(i);
                        i -= 1;
                        segments[i].push_str(&current);
                        fired = true;
                    }
                    Action::Keep => {
                        i += 1;
                        fired = true;
                    }
                    // A merge with no neighbor on that side does not fire
                    _ => continue,
                }
                break;
            }
            if !fired {
                i += 1;
            }
        }
        segments
    }
}

impl Rule {
    fn matches(&self, segments: &[String], i: usize, predicates: &dyn SegmentPredicates) -> bool {
        let segment = segments[i].as_str();
        let triggered = match &self.trigger {
            Trigger::ExactMatch(value) => segment == value,
            Trigger::Prefix(re) => re.is_match(segment),
            Trigger::InvalidSingle => predicates.is_invalid_single(segment),
        };
        triggered && self.checks.iter().all(|check| check.eval(segments, i, predicates))
    }
}

impl Check {
    fn eval(&self, segments: &[String], i: usize, predicates: &dyn SegmentPredicates) -> bool {
        let target_idx = match self.target {
            Target::Prev => i.checked_sub(1),
            Target::Next => (i + 1 < segments.len()).then_some(i + 1),
            Target::Current => Some(i),
        };

        if let Some(expected) = self.exists {
            if expected != target_idx.is_some() {
                return false;
            }
        }

        let target_idx = match target_idx {
            Some(idx) => idx,
            // A missing target fails any further constraint
            None => return self.kind.is_none() && self.value.is_none(),
        };

        let expected = self.value.as_ref().and_then(Value::as_bool).unwrap_or(true);
        match self.kind {
            None | Some(CheckKind::Unsupported) => true,
            Some(CheckKind::IsSeparator) => {
                predicates.is_separator_segment(&segments[target_idx]) == expected
            }
            Some(CheckKind::IsIsolated) => {
                let before_ok = target_idx == 0
                    || predicates.is_separator_segment(&segments[target_idx - 1]);
                let after_ok = target_idx + 1 >= segments.len()
                    || predicates.is_separator_segment(&segments[target_idx + 1]);
                (before_ok && after_ok) == expected
            }
        }
    }
}

/// The stock post-pass: the hand-written merge heuristics of earlier
/// segmenters expressed as data. Used when the host supplies no rules file.
pub fn default_rule_specs() -> Vec<RuleSpec> {
    let specs = serde_json::json!([
        {
            "name": "keep_ahsda_exception",
            "priority": 100,
            "trigger": { "type": "regex", "value": "[\u{1780}\u{178A}]\u{17CF}$" },
            "action": "keep"
        },
        {
            "name": "merge_qa_prefix",
            "priority": 90,
            "trigger": { "type": "exact_match", "value": "\u{17A2}" },
            "checks": [
                { "target": "next", "exists": true, "check": "is_separator", "value": false }
            ],
            "action": "merge_next"
        },
        {
            "name": "merge_sign_suffix_left",
            "priority": 80,
            "trigger": {
                "type": "regex",
                "value": "[\u{1780}-\u{17A2}][\u{17CB}\u{17CC}\u{17CE}\u{17CF}]$"
            },
            "action": "merge_prev"
        },
        {
            "name": "merge_samyok_next",
            "priority": 70,
            "trigger": { "type": "regex", "value": "[\u{1780}-\u{17A2}]\u{17D0}$" },
            "action": "merge_next"
        },
        {
            "name": "merge_stranded_single",
            "priority": 0,
            "trigger": { "type": "complexity_check", "value": "is_invalid_single" },
            "checks": [
                { "target": "prev", "check": "is_separator", "value": false }
            ],
            "action": "merge_prev"
        }
    ]);
    serde_json::from_value(specs).expect("built-in rule specs deserialize")
}
