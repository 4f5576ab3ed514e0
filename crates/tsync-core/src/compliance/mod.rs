//! Compliance rewriting applied before every push to the remote store.

mod rewriter;
mod rules;

pub use rewriter::{ComplianceRewriter, RewriteResult};
pub use rules::{RuleRewriter, MAX_BODY_CHARS};
