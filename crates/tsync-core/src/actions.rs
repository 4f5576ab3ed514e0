//! Deploy and repair actions.
//!
//! Both actions push a corrected template to the remote store and hand back
//! the record as it should now look locally. They never touch the local
//! store themselves: a failed action returns `Err` and the caller keeps its
//! previous state.

use chrono::Utc;
use serde::Serialize;

use crate::classify::infer_group;
use crate::compliance::ComplianceRewriter;
use crate::error::{Result, SyncError};
use crate::model::{TemplateDraft, TemplateRecord, TemplateSource, TemplateStatus};
use crate::remote::RemoteTemplateProvider;
use crate::validate::align_examples;

/// Which remote call an action ended up making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairKind {
    Created,
    Edited,
}

/// A successful deploy or repair.
#[derive(Debug, Clone)]
pub struct Repair {
    pub kind: RepairKind,
    /// Record to store locally, keyed by its (possibly normalized) name
    pub record: TemplateRecord,
    /// Name the action was asked to deploy under
    pub requested_name: String,
    /// True when an edit was downgraded to a create
    pub degraded: bool,
    /// True when the compliance pass changed the content
    pub rewritten: bool,
}

/// Create/edit actions bound to a provider and a rewriter.
pub struct RepairActions<'a> {
    provider: &'a dyn RemoteTemplateProvider,
    rewriter: &'a dyn ComplianceRewriter,
}

impl<'a> RepairActions<'a> {
    pub fn new(
        provider: &'a dyn RemoteTemplateProvider,
        rewriter: &'a dyn ComplianceRewriter,
    ) -> Self {
        Self { provider, rewriter }
    }

    /// Push a never-deployed record as a new remote template.
    ///
    /// # Errors
    ///
    /// - `ComplianceRewriteFailed` if the rewriter gives up
    /// - `RemoteRejected` if the provider refuses the template
    /// - `RemoteUnavailable` if the call does not complete
    pub async fn create(&self, local: TemplateRecord) -> Result<Repair> {
        let requested_name = local.name.clone();
        let fixed = self
            .rewriter
            .validate_and_fix(&local.content, &local.name, local.category)
            .await?;

        let mut record = local;
        record.content = fixed.optimized_content;
        record.variable_examples = align_examples(&record.content, &record.variable_examples);
        record.structure = None;
        if record.app_group.is_none() {
            record.app_group = Some(infer_group(&record.name, &record.content));
        }

        let outcome = self.provider.create(&record).await?;
        if !outcome.success {
            let error = outcome
                .error
                .unwrap_or_else(|| "create refused without a reason".to_string());
            return Err(SyncError::RemoteRejected(error));
        }

        if let Some(final_name) = outcome.final_name {
            if final_name != record.name {
                tracing::info!(requested = %record.name, %final_name, "provider renamed template");
            }
            record.name = final_name;
        }
        if let Some(id) = outcome.id {
            record.id = id;
        }
        record.source = TemplateSource::Remote;
        record.status = Some(outcome.status.unwrap_or(TemplateStatus::Pending));
        record.rejection_reason = None;
        record.updated_at = Utc::now();

        Ok(Repair {
            kind: RepairKind::Created,
            record,
            requested_name,
            degraded: false,
            rewritten: !fixed.is_compliant,
        })
    }

    /// Replace the content of `existing` with `desired`.
    ///
    /// Records that never reached the remote store (system or local ids)
    /// cannot be edited there, so they are created instead.
    pub async fn edit(&self, existing: &TemplateRecord, desired: &TemplateDraft) -> Result<Repair> {
        if !existing.is_deployed() {
            tracing::debug!(name = %existing.name, id = %existing.id, "record not deployed, creating instead of editing");
            let mut local = desired.clone().into_record(existing.id.clone());
            local.app_group = desired.app_group.or(existing.app_group);
            let mut repair = self.create(local).await?;
            repair.degraded = true;
            return Ok(repair);
        }

        let fixed = self
            .rewriter
            .validate_and_fix(&desired.content, &existing.name, desired.category)
            .await?;

        let mut record = existing.clone();
        record.content = fixed.optimized_content;
        record.variable_examples = align_examples(&record.content, &desired.examples);
        record.category = desired.category;
        record.structure = None;

        let ack = self.provider.edit(&existing.id, &record).await?;
        if !ack.success {
            let error = ack
                .error
                .unwrap_or_else(|| "edit refused without a reason".to_string());
            return Err(SyncError::RemoteRejected(error));
        }

        record.source = TemplateSource::Remote;
        record.status = Some(TemplateStatus::Pending);
        record.rejection_reason = None;
        record.updated_at = Utc::now();

        Ok(Repair {
            kind: RepairKind::Edited,
            requested_name: existing.name.clone(),
            record,
            degraded: false,
            rewritten: !fixed.is_compliant,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::REQUIRED_TEMPLATES;
    use crate::compliance::RuleRewriter;
    use crate::model::{AppGroup, TemplateCategory};
    use crate::testing::{remote_template, FailingRewriter, FakeProvider};
    use crate::validate::validate_record;

    #[tokio::test]
    async fn test_create_reflects_remote_id_and_pending_status() {
        let provider = FakeProvider::new();
        let rewriter = RuleRewriter::new();
        let actions = RepairActions::new(&provider, &rewriter);

        let repair = actions
            .create(REQUIRED_TEMPLATES[0].seed_record())
            .await
            .unwrap();

        assert_eq!(repair.kind, RepairKind::Created);
        assert!(repair.record.is_deployed());
        assert_eq!(repair.record.source, TemplateSource::Remote);
        assert_eq!(repair.record.status, Some(TemplateStatus::Pending));
        validate_record(&repair.record).unwrap();
        assert_eq!(provider.created_names(), vec!["setu_payment_button"]);
    }

    #[tokio::test]
    async fn test_create_aligns_examples_against_rewritten_content() {
        let provider = FakeProvider::new();
        let rewriter = RuleRewriter::new();
        let actions = RepairActions::new(&provider, &rewriter);

        let local = TemplateDraft::new("pay_link", "{{1}} pay at {{2}}", TemplateCategory::Utility)
            .with_examples(vec!["A".to_string()])
            .into_local_record();
        let repair = actions.create(local).await.unwrap();

        assert!(repair.rewritten);
        assert_eq!(repair.record.content, "Hello {{1}} pay at {{2}}.");
        assert_eq!(repair.record.variable_examples, vec!["A", "sample_2"]);
        assert_eq!(repair.record.app_group, Some(AppGroup::Payment));
        let pushed = provider.last_pushed().unwrap();
        assert_eq!(pushed.variable_examples.len(), 2);
    }

    #[tokio::test]
    async fn test_create_uses_final_name_from_provider() {
        let provider = FakeProvider::new().rename_on_create("Festive Offer", "festive_offer");
        let rewriter = RuleRewriter::new();
        let actions = RepairActions::new(&provider, &rewriter);

        let local = TemplateDraft::new("Festive Offer", "Big sale {{1}} today", TemplateCategory::Marketing)
            .into_local_record();
        let repair = actions.create(local).await.unwrap();

        assert_eq!(repair.record.name, "festive_offer");
        assert_eq!(repair.requested_name, "Festive Offer");
    }

    #[tokio::test]
    async fn test_create_rejection_is_remote_rejected() {
        let provider = FakeProvider::new().refuse("setu_payment_button", "duplicate name");
        let rewriter = RuleRewriter::new();
        let actions = RepairActions::new(&provider, &rewriter);

        let err = actions
            .create(REQUIRED_TEMPLATES[0].seed_record())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::RemoteRejected(ref m) if m == "duplicate name"));
    }

    #[tokio::test]
    async fn test_edit_of_undeployed_record_degrades_to_create() {
        let provider = FakeProvider::new();
        let rewriter = RuleRewriter::new();
        let actions = RepairActions::new(&provider, &rewriter);
        let required = &REQUIRED_TEMPLATES[4];

        let repair = actions
            .edit(&required.seed_record(), &required.draft())
            .await
            .unwrap();

        assert_eq!(repair.kind, RepairKind::Created);
        assert!(repair.degraded);
        assert!(provider.edited_ids().is_empty());
        assert_eq!(provider.created_names(), vec![required.name]);
    }

    #[tokio::test]
    async fn test_edit_clears_structure_and_keys_by_id() {
        let required = &REQUIRED_TEMPLATES[6];
        let provider = FakeProvider::new().with_templates(vec![remote_template(
            "9001",
            required.name,
            "Shipped!",
            TemplateStatus::Rejected,
        )]);
        let rewriter = RuleRewriter::new();
        let actions = RepairActions::new(&provider, &rewriter);

        let mut existing = required.seed_record();
        existing.id = "9001".to_string();
        existing.content = "Shipped!".to_string();
        existing.variable_examples.clear();
        existing.status = Some(TemplateStatus::Rejected);
        existing.rejection_reason = Some("INVALID_FORMAT".to_string());
        existing.structure = Some(Default::default());

        let repair = actions.edit(&existing, &required.draft()).await.unwrap();

        assert_eq!(repair.kind, RepairKind::Edited);
        assert_eq!(repair.record.id, "9001");
        assert_eq!(repair.record.content, required.content);
        assert!(repair.record.structure.is_none());
        assert!(repair.record.rejection_reason.is_none());
        assert_eq!(repair.record.status, Some(TemplateStatus::Pending));
        assert_eq!(repair.record.variable_examples.len(), 4);
        assert_eq!(provider.edited_ids(), vec!["9001"]);
    }

    #[tokio::test]
    async fn test_create_stops_when_rewriter_fails() {
        let required = &REQUIRED_TEMPLATES[0];
        let provider = FakeProvider::new();
        let rewriter = FailingRewriter::for_name(required.name);
        let actions = RepairActions::new(&provider, &rewriter);

        let err = actions.create(required.seed_record()).await.unwrap_err();

        assert!(matches!(err, SyncError::ComplianceRewriteFailed(_)));
        assert!(provider.last_pushed().is_none());
        assert!(provider.created_names().is_empty());
    }

    #[tokio::test]
    async fn test_edit_stops_when_rewriter_fails() {
        let required = &REQUIRED_TEMPLATES[6];
        let provider = FakeProvider::new().with_templates(vec![remote_template(
            "9001",
            required.name,
            "Shipped!",
            TemplateStatus::Rejected,
        )]);
        let rewriter = FailingRewriter::for_name(required.name);
        let actions = RepairActions::new(&provider, &rewriter);

        let mut existing = required.seed_record();
        existing.id = "9001".to_string();
        existing.content = "Shipped!".to_string();

        let err = actions.edit(&existing, &required.draft()).await.unwrap_err();

        assert!(matches!(err, SyncError::ComplianceRewriteFailed(_)));
        assert!(provider.edited_ids().is_empty());
        assert_eq!(provider.templates()[0].status, TemplateStatus::Rejected);
    }
}
