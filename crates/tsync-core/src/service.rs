//! The reconciliation service: one object owning the store and collaborators.
//!
//! Every operation loads the catalog from the store, works on it in memory
//! and writes it back only when it changed.

use std::sync::Arc;

use crate::actions::{Repair, RepairActions};
use crate::catalog::seed_missing;
use crate::classify::infer_group;
use crate::compliance::ComplianceRewriter;
use crate::error::{Result, SyncError};
use crate::heal::{apply_repair, AutoHealer, HealReport, TemplateCheck};
use crate::model::{AppGroup, TemplateDraft, TemplateRecord, TemplateSource};
use crate::remote::RemoteTemplateProvider;
use crate::store::{TemplateRegistry, TemplateStore};
use crate::sync::{sync, SyncOutcome};

pub struct ReconciliationService {
    store: Box<dyn TemplateStore>,
    provider: Arc<dyn RemoteTemplateProvider>,
    rewriter: Arc<dyn ComplianceRewriter>,
    healer: AutoHealer,
}

impl ReconciliationService {
    pub fn new(
        store: Box<dyn TemplateStore>,
        provider: Arc<dyn RemoteTemplateProvider>,
        rewriter: Arc<dyn ComplianceRewriter>,
    ) -> Self {
        let healer = AutoHealer::new(Arc::clone(&provider), Arc::clone(&rewriter));
        Self {
            store,
            provider,
            rewriter,
            healer,
        }
    }

    pub fn healer(&self) -> &AutoHealer {
        &self.healer
    }

    fn load(&self) -> Result<TemplateRegistry> {
        TemplateRegistry::load(self.store.as_ref())
    }

    /// Seed bootstrap records for required templates the store lacks.
    ///
    /// Returns the names that were seeded; an up-to-date store is left alone.
    pub fn bootstrap(&self) -> Result<Vec<String>> {
        let mut registry = self.load()?;
        let seeded = seed_missing(registry.records());
        if seeded.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<String> = seeded.iter().map(|r| r.name.clone()).collect();
        for record in seeded {
            registry.upsert(record);
        }
        registry.persist(self.store.as_ref())?;
        tracing::info!(?names, "seeded required templates");
        Ok(names)
    }

    /// Refresh the catalog from the provider and persist the merge.
    pub async fn sync(&self) -> Result<SyncOutcome> {
        let registry = self.load()?;
        let outcome = sync(self.provider.as_ref(), registry.into_records()).await?;
        self.store.save(&outcome.records)?;
        Ok(outcome)
    }

    /// Run one auto-heal pass and persist its final state.
    pub async fn auto_heal(&self) -> Result<HealReport> {
        let registry = self.load()?;
        let report = self.healer.run(registry.into_records()).await?;
        self.store.save(&report.records)?;
        Ok(report)
    }

    /// Dry-run classification of the stored catalog.
    pub fn audit(&self) -> Result<Vec<TemplateCheck>> {
        let registry = self.load()?;
        Ok(self.healer.audit(registry.records()))
    }

    pub fn list(&self, group: Option<AppGroup>) -> Result<Vec<TemplateRecord>> {
        let registry = self.load()?;
        Ok(match group {
            Some(group) => registry.in_group(group).into_iter().cloned().collect(),
            None => registry.into_records(),
        })
    }

    pub fn get(&self, name: &str) -> Result<TemplateRecord> {
        self.load()?
            .get(name)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("template '{name}'")))
    }

    /// Store a user-authored template locally without deploying it.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank name or body, or a name already in use.
    pub fn add_local(&self, mut draft: TemplateDraft) -> Result<TemplateRecord> {
        draft.name = draft.name.trim().to_string();
        if draft.name.is_empty() {
            return Err(SyncError::InvalidInput("template name cannot be empty".to_string()));
        }
        if draft.content.trim().is_empty() {
            return Err(SyncError::InvalidInput("template body cannot be empty".to_string()));
        }

        let mut registry = self.load()?;
        if registry.contains(&draft.name) {
            return Err(SyncError::InvalidInput(format!(
                "a template named '{}' already exists",
                draft.name
            )));
        }

        if draft.app_group.is_none() {
            draft.app_group = Some(infer_group(&draft.name, &draft.content));
        }
        let name = draft.name.clone();
        registry.upsert(draft.into_local_record());
        registry.persist(self.store.as_ref())?;

        registry
            .get(&name)
            .cloned()
            .ok_or_else(|| SyncError::Storage(format!("template '{name}' vanished after save")))
    }

    /// Push a stored template to the provider.
    ///
    /// Never-deployed records are created; deployed ones are edited with
    /// their current content.
    pub async fn deploy(&self, name: &str) -> Result<Repair> {
        let mut registry = self.load()?;
        let record = registry
            .get(name)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("template '{name}'")))?;

        let actions = RepairActions::new(self.provider.as_ref(), self.rewriter.as_ref());
        let repair = if record.is_deployed() {
            actions.edit(&record, &TemplateDraft::from(&record)).await?
        } else {
            actions.create(record).await?
        };

        apply_repair(&mut registry, repair.clone());
        registry.persist(self.store.as_ref())?;
        Ok(repair)
    }

    /// Delete a template.
    ///
    /// Local records are dropped from the store. Remote records are deleted
    /// on the provider first and only removed locally once it confirms.
    pub async fn delete(&self, name: &str) -> Result<TemplateRecord> {
        let mut registry = self.load()?;
        let record = registry
            .get(name)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("template '{name}'")))?;

        if record.source == TemplateSource::Remote {
            let ack = self.provider.delete(name).await?;
            if !ack.success {
                return Err(SyncError::RemoteRejected(
                    ack.error
                        .unwrap_or_else(|| "delete refused without a reason".to_string()),
                ));
            }
        }

        registry.remove(name);
        registry.persist(self.store.as_ref())?;
        tracing::info!(name, source = ?record.source, "deleted template");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::REQUIRED_TEMPLATES;
    use crate::compliance::RuleRewriter;
    use crate::model::{TemplateCategory, TemplateStatus};
    use crate::store::MemoryStore;
    use crate::testing::{remote_template, FakeProvider};

    fn service(provider: Arc<FakeProvider>) -> ReconciliationService {
        ReconciliationService::new(
            Box::new(MemoryStore::new()),
            provider,
            Arc::new(RuleRewriter::new()),
        )
    }

    #[test]
    fn test_bootstrap_seeds_once() {
        let service = service(Arc::new(FakeProvider::new()));
        assert_eq!(service.bootstrap().unwrap().len(), REQUIRED_TEMPLATES.len());
        assert!(service.bootstrap().unwrap().is_empty());
        assert_eq!(service.list(None).unwrap().len(), REQUIRED_TEMPLATES.len());
    }

    #[test]
    fn test_add_local_classifies_and_aligns() {
        let service = service(Arc::new(FakeProvider::new()));
        let record = service
            .add_local(
                TemplateDraft::new("gold_rate_alert", "Today's gold rate is {{1}} per gram", TemplateCategory::Marketing)
                    .with_examples(vec!["6,450".to_string(), "extra".to_string()]),
            )
            .unwrap();

        assert!(record.id.starts_with("local-"));
        assert_eq!(record.app_group, Some(AppGroup::Marketing));
        assert_eq!(record.variable_examples, vec!["6,450"]);
    }

    #[test]
    fn test_add_local_rejects_duplicates_and_blanks() {
        let service = service(Arc::new(FakeProvider::new()));
        service.bootstrap().unwrap();

        let dup = service.add_local(TemplateDraft::new("order_shipped", "x", TemplateCategory::Utility));
        assert!(matches!(dup, Err(SyncError::InvalidInput(_))));
        let blank = service.add_local(TemplateDraft::new("  ", "x", TemplateCategory::Utility));
        assert!(matches!(blank, Err(SyncError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_deploy_local_record_creates_remotely() {
        let provider = Arc::new(FakeProvider::new());
        let service = service(Arc::clone(&provider));
        service
            .add_local(TemplateDraft::new("thank_you", "Thanks {{1}} for shopping with us", TemplateCategory::Utility))
            .unwrap();

        let repair = service.deploy("thank_you").await.unwrap();

        assert!(repair.record.is_deployed());
        let stored = service.get("thank_you").unwrap();
        assert_eq!(stored.source, TemplateSource::Remote);
        assert_eq!(stored.status, Some(TemplateStatus::Pending));
        assert_eq!(provider.created_names(), vec!["thank_you"]);
    }

    #[tokio::test]
    async fn test_delete_local_skips_provider() {
        let provider = Arc::new(FakeProvider::new());
        let service = service(Arc::clone(&provider));
        service
            .add_local(TemplateDraft::new("draft_one", "Hi {{1}}, visit us", TemplateCategory::Utility))
            .unwrap();

        service.delete("draft_one").await.unwrap();

        assert!(matches!(service.get("draft_one"), Err(SyncError::NotFound(_))));
        assert!(provider.deleted_names().is_empty());
    }

    #[tokio::test]
    async fn test_delete_remote_requires_confirmation() {
        let provider = Arc::new(
            FakeProvider::new()
                .with_templates(vec![remote_template("12", "old_promo", "Sale {{1}} today", TemplateStatus::Approved)]),
        );
        let service = service(Arc::clone(&provider));
        service.sync().await.unwrap();

        service.delete("old_promo").await.unwrap();
        assert_eq!(provider.deleted_names(), vec!["old_promo"]);
        assert!(service.get("old_promo").is_err());
    }

    #[tokio::test]
    async fn test_refused_remote_delete_keeps_record() {
        let provider = Arc::new(
            FakeProvider::new()
                .with_templates(vec![remote_template("13", "locked_promo", "Sale {{1}} today", TemplateStatus::Approved)])
                .refuse("locked_promo", "template is in use"),
        );
        let service = service(Arc::clone(&provider));
        service.sync().await.unwrap();

        let err = service.delete("locked_promo").await.unwrap_err();
        assert!(matches!(err, SyncError::RemoteRejected(ref m) if m == "template is in use"));
        assert!(service.get("locked_promo").is_ok());
    }

    #[tokio::test]
    async fn test_auto_heal_persists_final_state() {
        let provider = Arc::new(FakeProvider::new());
        let service = service(Arc::clone(&provider));

        let report = service.auto_heal().await.unwrap();

        assert_eq!(report.actions_taken, REQUIRED_TEMPLATES.len());
        let stored = service.list(None).unwrap();
        assert_eq!(stored.len(), REQUIRED_TEMPLATES.len());
        assert!(stored.iter().all(TemplateRecord::is_deployed));
    }
}
