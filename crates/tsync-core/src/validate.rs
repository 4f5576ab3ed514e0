//! Placeholder parsing and structural compliance checks.
//!
//! A template's placeholder count is its structural fingerprint: the remote
//! store rejects a push whose example values do not line up one-to-one with
//! the `{{n}}` markers in the body. Every occurrence counts, so `{{1}} {{1}}`
//! has two placeholders.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::catalog::RequiredTemplate;
use crate::error::{Result, SyncError};
use crate::model::TemplateRecord;

/// Maximum allowed difference in character length between a candidate and
/// its required definition.
pub const MAX_LENGTH_DRIFT: usize = 50;

/// A `{{n}}` marker located in some text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    /// Byte offset of the opening braces
    pub start: usize,
    /// Byte offset just past the closing braces
    pub end: usize,
    /// The number written between the braces
    pub index: usize,
}

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\d+)\}\}").expect("placeholder pattern is valid"));

/// Locate every `{{n}}` marker in `text`, in order of appearance.
///
/// Markers with whitespace or non-digits between the braces are not placeholders.
pub fn placeholders(text: &str) -> Vec<Placeholder> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let index = caps.get(1)?.as_str().parse::<usize>().ok()?;
            Some(Placeholder {
                start: whole.start(),
                end: whole.end(),
                index,
            })
        })
        .collect()
}

/// Number of placeholder occurrences in `text`.
pub fn placeholder_count(text: &str) -> usize {
    placeholders(text).len()
}

/// Make `provided` line up with the placeholders in `content`.
///
/// Short lists are padded with `sample_{n}` values numbered from the current
/// length; long lists are truncated keeping order.
pub fn align_examples(content: &str, provided: &[String]) -> Vec<String> {
    let needed = placeholder_count(content);
    let mut aligned: Vec<String> = provided.iter().take(needed).cloned().collect();
    while aligned.len() < needed {
        aligned.push(format!("sample_{}", aligned.len() + 1));
    }
    aligned
}

/// Check that a record's examples match its content.
///
/// `align_examples` makes this unreachable for engine-produced records; it is
/// here for callers that assemble records by hand.
pub fn validate_record(record: &TemplateRecord) -> Result<()> {
    let expected = placeholder_count(&record.content);
    let found = record.variable_examples.len();
    if expected != found {
        return Err(SyncError::ExampleCountMismatch { expected, found });
    }
    Ok(())
}

/// Result of comparing a candidate against a required definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Compliance {
    Compliant,
    PlaceholderMismatch { expected: usize, found: usize },
    LengthDrift { drift: usize, limit: usize },
}

impl Compliance {
    pub fn is_compliant(&self) -> bool {
        matches!(self, Self::Compliant)
    }

    /// One-line description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Compliant => "structure matches".to_string(),
            Self::PlaceholderMismatch { expected, found } => {
                format!("expected {expected} placeholders, found {found}")
            }
            Self::LengthDrift { drift, limit } => {
                format!("content length differs by {drift} characters (limit {limit})")
            }
        }
    }
}

/// A single structural rule.
type ComplianceRule = fn(&str, &str, &ComplianceRules) -> Option<Compliance>;

/// Thresholds and the ordered rule table used by [`check_compliance`].
#[derive(Clone)]
pub struct ComplianceRules {
    pub max_length_drift: usize,
    rules: Vec<ComplianceRule>,
}

impl std::fmt::Debug for ComplianceRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplianceRules")
            .field("max_length_drift", &self.max_length_drift)
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl Default for ComplianceRules {
    fn default() -> Self {
        Self {
            max_length_drift: MAX_LENGTH_DRIFT,
            rules: vec![placeholder_rule as ComplianceRule, length_rule],
        }
    }
}

impl ComplianceRules {
    pub fn with_max_length_drift(mut self, limit: usize) -> Self {
        self.max_length_drift = limit;
        self
    }

    /// Run the rules in order against a pair of bodies.
    pub fn check(&self, candidate: &str, required: &str) -> Compliance {
        self.rules
            .iter()
            .find_map(|rule| rule(candidate, required, self))
            .unwrap_or(Compliance::Compliant)
    }
}

fn placeholder_rule(candidate: &str, required: &str, _: &ComplianceRules) -> Option<Compliance> {
    let expected = placeholder_count(required);
    let found = placeholder_count(candidate);
    (expected != found).then_some(Compliance::PlaceholderMismatch { expected, found })
}

fn length_rule(candidate: &str, required: &str, rules: &ComplianceRules) -> Option<Compliance> {
    let drift = candidate
        .chars()
        .count()
        .abs_diff(required.chars().count());
    (drift > rules.max_length_drift).then_some(Compliance::LengthDrift {
        drift,
        limit: rules.max_length_drift,
    })
}

/// Compare a candidate record against a required definition with default rules.
pub fn check_compliance(candidate: &TemplateRecord, required: &RequiredTemplate) -> Compliance {
    ComplianceRules::default().check(&candidate.content, required.content)
}

/// Whether `candidate` is close enough to `required` to count as the same template.
pub fn is_structurally_compliant(candidate: &TemplateRecord, required: &RequiredTemplate) -> bool {
    check_compliance(candidate, required).is_compliant()
}
