//! Deterministic rule-based rewriter.
//!
//! Fixes the rejections providers hand out most often for body text:
//!
//! 1. stray whitespace and runs of blank lines
//! 2. placeholders that are not numbered `{{1}}..{{n}}` in order of appearance
//! 3. a body that starts or ends with a placeholder
//!
//! Bodies over [`MAX_BODY_CHARS`] cannot be fixed without losing meaning and
//! are refused.

use async_trait::async_trait;

use super::rewriter::{ComplianceRewriter, RewriteResult};
use crate::error::{Result, SyncError};
use crate::model::TemplateCategory;
use crate::validate::placeholders;

/// Provider limit on body length.
pub const MAX_BODY_CHARS: usize = 1024;

/// Prefix used when a body opens with a placeholder.
const LEADING_TEXT: &str = "Hello";

/// Suffix used when a body closes with a placeholder.
const TRAILING_TEXT: &str = ".";

type RewriteStep = fn(&str) -> String;

/// Rule-table rewriter; steps run in order.
pub struct RuleRewriter {
    steps: Vec<(&'static str, RewriteStep)>,
}

impl Default for RuleRewriter {
    fn default() -> Self {
        Self {
            steps: vec![
                ("whitespace", tidy_whitespace as RewriteStep),
                ("renumber", renumber_placeholders as RewriteStep),
                ("edges", pad_edge_placeholders as RewriteStep),
            ],
        }
    }
}

impl RuleRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply every step and report whether anything changed.
    pub fn rewrite(&self, content: &str) -> Result<RewriteResult> {
        let mut current = content.to_string();
        for (label, step) in &self.steps {
            let next = step(&current);
            if next != current {
                tracing::debug!(step = label, "compliance rule rewrote content");
            }
            current = next;
        }

        let length = current.chars().count();
        if length > MAX_BODY_CHARS {
            return Err(SyncError::ComplianceRewriteFailed(format!(
                "body is {} characters, limit is {}",
                length, MAX_BODY_CHARS
            )));
        }
        if current.trim().is_empty() {
            return Err(SyncError::ComplianceRewriteFailed(
                "body is empty".to_string(),
            ));
        }

        Ok(RewriteResult {
            is_compliant: current == content,
            optimized_content: current,
        })
    }
}

#[async_trait]
impl ComplianceRewriter for RuleRewriter {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn validate_and_fix(
        &self,
        content: &str,
        name: &str,
        category: TemplateCategory,
    ) -> Result<RewriteResult> {
        let result = self.rewrite(content)?;
        if !result.is_compliant {
            tracing::info!(name, %category, "rewrote template body for provider policy");
        }
        Ok(result)
    }
}

/// Trim line ends, cap blank-line runs at one, trim the whole body.
fn tidy_whitespace(content: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut blank_run = 0;
    for line in content.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

/// Number every placeholder occurrence `1..=n` in order of appearance.
fn renumber_placeholders(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    for (i, placeholder) in placeholders(content).iter().enumerate() {
        out.push_str(&content[cursor..placeholder.start]);
        out.push_str(&format!("{{{{{}}}}}", i + 1));
        cursor = placeholder.end;
    }
    out.push_str(&content[cursor..]);
    out
}

/// Wrap a body that begins or ends with a placeholder in fixed text.
fn pad_edge_placeholders(content: &str) -> String {
    let found = placeholders(content);
    let (Some(first), Some(last)) = (found.first(), found.last()) else {
        return content.to_string();
    };

    let mut result = content.to_string();
    if last.end == content.len() {
        result.push_str(TRAILING_TEXT);
    }
    if first.start == 0 {
        result = format!("{} {}", LEADING_TEXT, result);
    }
    result
}
