//! # tsync core
//!
//! Keeps a local catalog of message templates consistent with a remote
//! messaging provider that can change them independently.
//!
//! ## Architecture
//!
//! - **model**: template records, drafts and the id namespaces
//! - **catalog**: the nine required templates (desired state)
//! - **classify**: keyword rules assigning an app group
//! - **validate**: placeholder scanning, example alignment, structural checks
//! - **remote**: provider trait and the HTTP implementation
//! - **compliance**: rewriter trait and the rule-based rewriter
//! - **store**: persistence trait, JSON file and in-memory stores
//! - **sync**: fetching and merging the remote list
//! - **actions**: create and edit against the provider
//! - **heal**: the auto-heal pass and its log
//! - **service**: ties the above together over one store

pub mod actions;
pub mod catalog;
pub mod classify;
pub mod compliance;
pub mod error;
pub mod fs;
pub mod heal;
pub mod model;
pub mod remote;
pub mod service;
pub mod store;
pub mod sync;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod validate;

pub use error::{Result, SyncError};
pub use heal::{AutoHealer, HealEvent, HealLogEntry, HealReport};
pub use model::{AppGroup, TemplateCategory, TemplateDraft, TemplateRecord, TemplateSource, TemplateStatus};
pub use service::ReconciliationService;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
