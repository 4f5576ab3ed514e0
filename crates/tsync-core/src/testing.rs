//! Test doubles for the provider and the compliance rewriter.
//!
//! `FakeProvider` behaves like a well-mannered remote store: creates land in
//! its list as pending, edits reset status to pending, deletes remove by
//! name. Failures are injected per template name. Compiled for this crate's
//! tests and, through the `testing` feature, for integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::compliance::{ComplianceRewriter, RewriteResult, RuleRewriter};
use crate::error::{Result, SyncError};
use crate::model::{TemplateCategory, TemplateRecord, TemplateStatus, DEFAULT_LANGUAGE};
use crate::remote::{CreateOutcome, RemoteAck, RemoteComponent, RemoteTemplate, RemoteTemplateProvider};

/// Build a remote template with a single body component.
pub fn remote_template(
    id: &str,
    name: &str,
    body: &str,
    status: TemplateStatus,
) -> RemoteTemplate {
    RemoteTemplate {
        id: id.to_string(),
        name: name.to_string(),
        status,
        rejection_reason: None,
        category: TemplateCategory::Utility,
        language: DEFAULT_LANGUAGE.to_string(),
        components: vec![RemoteComponent::body(body)],
    }
}

/// Rule rewriter that fails outright for one template name.
pub struct FailingRewriter {
    inner: RuleRewriter,
    name: String,
}

impl FailingRewriter {
    pub fn for_name(name: &str) -> Self {
        Self {
            inner: RuleRewriter::new(),
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl ComplianceRewriter for FailingRewriter {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn validate_and_fix(
        &self,
        content: &str,
        name: &str,
        category: TemplateCategory,
    ) -> Result<RewriteResult> {
        if name == self.name {
            return Err(SyncError::ComplianceRewriteFailed(format!(
                "cannot make '{name}' acceptable"
            )));
        }
        self.inner.validate_and_fix(content, name, category).await
    }
}

#[derive(Default)]
pub struct FakeProvider {
    templates: Mutex<Vec<RemoteTemplate>>,
    pushed: Mutex<Vec<TemplateRecord>>,
    created: Mutex<Vec<String>>,
    edited: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    renames: Vec<(String, String)>,
    rejections: Vec<(String, String)>,
    unreachable: Vec<String>,
    fail_fetch: AtomicBool,
    fetches: AtomicUsize,
    next_id: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(5000),
            ..Self::default()
        }
    }

    pub fn with_templates(self, templates: Vec<RemoteTemplate>) -> Self {
        *lock(&self.templates) = templates;
        self
    }

    /// Store creates of `requested` under `final_name`.
    pub fn rename_on_create(mut self, requested: &str, final_name: &str) -> Self {
        self.renames
            .push((requested.to_string(), final_name.to_string()));
        self
    }

    /// Refuse every write to `name` with `error`.
    pub fn refuse(mut self, name: &str, error: &str) -> Self {
        self.rejections.push((name.to_string(), error.to_string()));
        self
    }

    /// Fail the transport for any write to `name`.
    pub fn unreachable_for(mut self, name: &str) -> Self {
        self.unreachable.push(name.to_string());
        self
    }

    pub fn set_fetch_failure(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn templates(&self) -> Vec<RemoteTemplate> {
        lock(&self.templates).clone()
    }

    pub fn created_names(&self) -> Vec<String> {
        lock(&self.created).clone()
    }

    pub fn edited_ids(&self) -> Vec<String> {
        lock(&self.edited).clone()
    }

    pub fn deleted_names(&self) -> Vec<String> {
        lock(&self.deleted).clone()
    }

    pub fn last_pushed(&self) -> Option<TemplateRecord> {
        lock(&self.pushed).last().cloned()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn write_guard(&self, name: &str) -> Result<Option<String>> {
        if self.unreachable.iter().any(|n| n == name) {
            return Err(SyncError::RemoteUnavailable(format!(
                "connection reset while writing {name}"
            )));
        }
        Ok(self
            .rejections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, error)| error.clone()))
    }
}

#[async_trait]
impl RemoteTemplateProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_all(&self) -> Result<Vec<RemoteTemplate>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(SyncError::RemoteUnavailable(
                "provider returned 503".to_string(),
            ));
        }
        Ok(self.templates())
    }

    async fn create(&self, record: &TemplateRecord) -> Result<CreateOutcome> {
        lock(&self.pushed).push(record.clone());
        if let Some(error) = self.write_guard(&record.name)? {
            return Ok(CreateOutcome::rejected(error));
        }

        let final_name = self
            .renames
            .iter()
            .find(|(requested, _)| *requested == record.name)
            .map(|(_, final_name)| final_name.clone())
            .unwrap_or_else(|| record.name.clone());
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();

        let mut template = remote_template(&id, &final_name, &record.content, TemplateStatus::Pending);
        template.category = record.category;
        template.components =
            vec![RemoteComponent::body(&record.content).with_examples(record.variable_examples.clone())];
        lock(&self.templates).push(template);
        lock(&self.created).push(record.name.clone());

        Ok(CreateOutcome::created(final_name, Some(id)))
    }

    async fn edit(&self, id: &str, record: &TemplateRecord) -> Result<RemoteAck> {
        lock(&self.pushed).push(record.clone());
        if let Some(error) = self.write_guard(&record.name)? {
            return Ok(RemoteAck::rejected(error));
        }

        let mut templates = lock(&self.templates);
        let Some(template) = templates.iter_mut().find(|t| t.id == id) else {
            return Ok(RemoteAck::rejected(format!("no template with id {id}")));
        };
        template.status = TemplateStatus::Pending;
        template.rejection_reason = None;
        template.category = record.category;
        template.components =
            vec![RemoteComponent::body(&record.content).with_examples(record.variable_examples.clone())];
        lock(&self.edited).push(id.to_string());

        Ok(RemoteAck::ok())
    }

    async fn delete(&self, name: &str) -> Result<RemoteAck> {
        if let Some(error) = self.write_guard(name)? {
            return Ok(RemoteAck::rejected(error));
        }

        let mut templates = lock(&self.templates);
        let before = templates.len();
        templates.retain(|t| t.name != name);
        if templates.len() == before {
            return Ok(RemoteAck::rejected(format!("template {name} does not exist")));
        }
        lock(&self.deleted).push(name.to_string());

        Ok(RemoteAck::ok())
    }
}
