//! Core data types for template records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{is_deployed_id, new_local_id};
use crate::error::SyncError;

/// Language code used when none is given.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Where a record was first observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSource {
    /// Seeded from the required catalog or authored locally
    Local,
    /// Observed on the remote store
    Remote,
}

/// Review lifecycle reported by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateStatus {
    Pending,
    Approved,
    Rejected,
}

impl TemplateStatus {
    /// Map a provider status string onto the three states we track.
    ///
    /// Paused and disabled templates cannot be sent, so they count as rejected.
    /// Everything else still in review (`IN_APPEAL`, `PENDING_DELETION`, ...) is pending.
    pub fn from_remote(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "APPROVED" | "ACTIVE" => Self::Approved,
            "REJECTED" | "DISABLED" | "PAUSED" => Self::Rejected,
            _ => Self::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-level template category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Utility,
    Marketing,
    Authentication,
}

impl TemplateCategory {
    /// Wire form used by the provider (`UTILITY`, `MARKETING`, ...).
    pub fn as_remote_str(&self) -> &'static str {
        match self {
            Self::Utility => "UTILITY",
            Self::Marketing => "MARKETING",
            Self::Authentication => "AUTHENTICATION",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utility => "utility",
            Self::Marketing => "marketing",
            Self::Authentication => "authentication",
        }
    }
}

impl FromStr for TemplateCategory {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utility" | "transactional" => Ok(Self::Utility),
            "marketing" => Ok(Self::Marketing),
            "authentication" | "otp" => Ok(Self::Authentication),
            other => Err(SyncError::InvalidInput(format!(
                "unknown template category '{other}'"
            ))),
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business-level grouping used by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppGroup {
    Payment,
    OrderStatus,
    Marketing,
    Support,
    Uncategorized,
}

impl AppGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::OrderStatus => "order_status",
            Self::Marketing => "marketing",
            Self::Support => "support",
            Self::Uncategorized => "uncategorized",
        }
    }
}

impl FromStr for AppGroup {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "payment" => Ok(Self::Payment),
            "order_status" | "order" => Ok(Self::OrderStatus),
            "marketing" => Ok(Self::Marketing),
            "support" => Ok(Self::Support),
            "uncategorized" => Ok(Self::Uncategorized),
            other => Err(SyncError::InvalidInput(format!("unknown app group '{other}'"))),
        }
    }
}

impl fmt::Display for AppGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A button attached to a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateButton {
    /// Provider button type (`URL`, `QUICK_REPLY`, `PHONE_NUMBER`, ...)
    pub kind: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Rich layout mirrored from the remote representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateStructure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<TemplateButton>,
}

/// A message template as held in the local catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Opaque id; see [`crate::model::is_deployed_id`] for the namespaces
    pub id: String,

    /// Merge key, unique within the merged set
    pub name: String,

    /// Body text with `{{n}}` placeholders
    pub content: String,

    pub category: TemplateCategory,

    /// `None` until classified
    #[serde(default)]
    pub app_group: Option<AppGroup>,

    pub source: TemplateSource,

    /// Last status reported by the remote store; `None` for records never pushed
    #[serde(default)]
    pub status: Option<TemplateStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<TemplateStructure>,

    /// One example per placeholder occurrence in `content`
    #[serde(default)]
    pub variable_examples: Vec<String>,

    #[serde(default = "default_language")]
    pub language: String,

    pub updated_at: DateTime<Utc>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl TemplateRecord {
    /// Whether the remote store knows this record by its id.
    pub fn is_deployed(&self) -> bool {
        is_deployed_id(&self.id)
    }

    pub fn is_rejected(&self) -> bool {
        self.status == Some(TemplateStatus::Rejected)
    }

    /// Group to display, falling back to `Uncategorized`.
    pub fn group(&self) -> AppGroup {
        self.app_group.unwrap_or(AppGroup::Uncategorized)
    }
}

/// Input for creating a template that does not exist remotely yet.
///
/// Both the required catalog and the user-authoring flow go through this.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDraft {
    pub name: String,
    pub content: String,
    pub category: TemplateCategory,
    pub app_group: Option<AppGroup>,
    pub examples: Vec<String>,
    pub language: String,
}

impl TemplateDraft {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        category: TemplateCategory,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            category,
            app_group: None,
            examples: Vec::new(),
            language: default_language(),
        }
    }

    pub fn with_group(mut self, group: AppGroup) -> Self {
        self.app_group = Some(group);
        self
    }

    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.examples = examples;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Materialise the draft as a never-pushed local record under `id`.
    pub fn into_record(self, id: String) -> TemplateRecord {
        TemplateRecord {
            id,
            name: self.name,
            content: self.content,
            category: self.category,
            app_group: self.app_group,
            source: TemplateSource::Local,
            status: None,
            rejection_reason: None,
            structure: None,
            variable_examples: self.examples,
            language: self.language,
            updated_at: Utc::now(),
        }
    }

    /// Materialise the draft as a user-authored record with a fresh local id.
    pub fn into_local_record(self) -> TemplateRecord {
        self.into_record(new_local_id())
    }
}

impl From<&TemplateRecord> for TemplateDraft {
    fn from(record: &TemplateRecord) -> Self {
        Self {
            name: record.name.clone(),
            content: record.content.clone(),
            category: record.category,
            app_group: record.app_group,
            examples: record.variable_examples.clone(),
            language: record.language.clone(),
        }
    }
}
