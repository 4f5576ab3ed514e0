//! Remote template provider trait and common types.
//!
//! The provider is the messaging platform that actually sends templates.
//! Its template list can change underneath us at any time (reviews, manual
//! edits in the provider's console), which is why the engine re-reads it on
//! every sync rather than trusting the local copy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{TemplateButton, TemplateCategory, TemplateRecord, TemplateStatus, TemplateStructure};

/// Component slot in a remote template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Header,
    Body,
    Footer,
    Buttons,
}

/// One structural component of a remote template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteComponent {
    pub kind: ComponentKind,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub buttons: Vec<TemplateButton>,
    /// Example values the provider holds for this component's placeholders
    #[serde(default)]
    pub examples: Vec<String>,
}

impl RemoteComponent {
    pub fn body(text: impl Into<String>) -> Self {
        Self {
            kind: ComponentKind::Body,
            text: Some(text.into()),
            buttons: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.examples = examples;
        self
    }
}

/// A template as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTemplate {
    pub id: String,
    pub name: String,
    pub status: TemplateStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    pub category: TemplateCategory,
    pub language: String,
    #[serde(default)]
    pub components: Vec<RemoteComponent>,
}

impl RemoteTemplate {
    fn component(&self, kind: ComponentKind) -> Option<&RemoteComponent> {
        self.components.iter().find(|c| c.kind == kind)
    }

    /// Body text; empty when the template has no body component.
    pub fn body_text(&self) -> String {
        self.component(ComponentKind::Body)
            .and_then(|c| c.text.clone())
            .unwrap_or_default()
    }

    /// Example values attached to the body, if any.
    pub fn body_examples(&self) -> &[String] {
        self.component(ComponentKind::Body)
            .map(|c| c.examples.as_slice())
            .unwrap_or(&[])
    }

    /// Rich layout derived from the component list.
    pub fn structure(&self) -> TemplateStructure {
        TemplateStructure {
            header: self
                .component(ComponentKind::Header)
                .and_then(|c| c.text.clone()),
            body: self.body_text(),
            footer: self
                .component(ComponentKind::Footer)
                .and_then(|c| c.text.clone()),
            buttons: self
                .component(ComponentKind::Buttons)
                .map(|c| c.buttons.clone())
                .unwrap_or_default(),
        }
    }
}

/// Result of a remote create call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateOutcome {
    pub success: bool,
    /// Name the provider stored the template under
    pub final_name: Option<String>,
    /// Id assigned by the provider
    pub id: Option<String>,
    pub status: Option<TemplateStatus>,
    pub error: Option<String>,
}

impl CreateOutcome {
    pub fn created(final_name: impl Into<String>, id: Option<String>) -> Self {
        Self {
            success: true,
            final_name: Some(final_name.into()),
            id,
            status: Some(TemplateStatus::Pending),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Result of a remote edit or delete call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteAck {
    pub success: bool,
    pub error: Option<String>,
}

impl RemoteAck {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Interface to the remote template store.
///
/// `Err` means the call did not complete (network, HTTP, malformed reply).
/// A completed call the provider refused comes back as `Ok` with
/// `success == false` and the provider's message in `error`.
#[async_trait]
pub trait RemoteTemplateProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &'static str;

    /// Fetch every template the provider holds for this account.
    async fn fetch_all(&self) -> Result<Vec<RemoteTemplate>>;

    /// Submit a new template for review.
    async fn create(&self, record: &TemplateRecord) -> Result<CreateOutcome>;

    /// Replace the content of an existing template, keyed by its remote id.
    async fn edit(&self, id: &str, record: &TemplateRecord) -> Result<RemoteAck>;

    /// Delete a template by name.
    async fn delete(&self, name: &str) -> Result<RemoteAck>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> RemoteTemplate {
        RemoteTemplate {
            id: "100".to_string(),
            name: "setu_payment_button".to_string(),
            status: TemplateStatus::Approved,
            rejection_reason: None,
            category: TemplateCategory::Utility,
            language: "en".to_string(),
            components: vec![
                RemoteComponent {
                    kind: ComponentKind::Header,
                    text: Some("Payment due".to_string()),
                    buttons: Vec::new(),
                    examples: Vec::new(),
                },
                RemoteComponent::body("Pay {{1}}").with_examples(vec!["500".to_string()]),
                RemoteComponent {
                    kind: ComponentKind::Buttons,
                    text: None,
                    buttons: vec![TemplateButton {
                        kind: "URL".to_string(),
                        text: "Pay now".to_string(),
                        url: Some("https://pay.example.in/{{1}}".to_string()),
                        phone_number: None,
                    }],
                    examples: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn test_structure_from_components() {
        let structure = remote().structure();
        assert_eq!(structure.header.as_deref(), Some("Payment due"));
        assert_eq!(structure.body, "Pay {{1}}");
        assert!(structure.footer.is_none());
        assert_eq!(structure.buttons.len(), 1);
    }

    #[test]
    fn test_body_examples() {
        assert_eq!(remote().body_examples(), ["500".to_string()]);
    }

    #[test]
    fn test_missing_body_is_empty() {
        let mut template = remote();
        template.components.clear();
        assert_eq!(template.body_text(), "");
        assert!(template.body_examples().is_empty());
    }
}
