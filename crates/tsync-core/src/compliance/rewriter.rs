//! Compliance rewriter trait.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::model::TemplateCategory;

/// Outcome of a compliance pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteResult {
    /// Content to push; equal to the input when nothing needed fixing
    pub optimized_content: String,
    /// Whether the input already satisfied provider policy
    pub is_compliant: bool,
}

/// Rewrites template content so the provider's review accepts it.
///
/// Implementations may be rule tables or remote services. A rewriter that
/// cannot produce acceptable content returns
/// `SyncError::ComplianceRewriteFailed`.
#[async_trait]
pub trait ComplianceRewriter: Send + Sync {
    /// Rewriter name for logs.
    fn name(&self) -> &'static str;

    async fn validate_and_fix(
        &self,
        content: &str,
        name: &str,
        category: TemplateCategory,
    ) -> Result<RewriteResult>;
}
