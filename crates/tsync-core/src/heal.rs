//! Auto-heal: reconcile the required catalog against the remote store.
//!
//! A pass syncs, walks the required templates in catalog order, repairs
//! whatever is missing, rejected or structurally off, and syncs once more so
//! the returned records reflect what the provider now holds. Individual
//! failures are logged and skipped; the pass itself always completes.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::actions::{Repair, RepairActions, RepairKind};
use crate::catalog::{required_templates, RequiredTemplate};
use crate::compliance::ComplianceRewriter;
use crate::error::{Result, SyncError};
use crate::model::TemplateRecord;
use crate::remote::RemoteTemplateProvider;
use crate::store::TemplateRegistry;
use crate::sync::sync;
use crate::validate::{Compliance, ComplianceRules};

/// Kind of a heal log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealEvent {
    Synced,
    SyncFailed,
    Missing,
    Rejected,
    Mismatch,
    Ok,
    Created,
    Edited,
    Failed,
    Summary,
}

impl HealEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synced => "SYNCED",
            Self::SyncFailed => "SYNC_FAILED",
            Self::Missing => "MISSING",
            Self::Rejected => "REJECTED",
            Self::Mismatch => "MISMATCH",
            Self::Ok => "OK",
            Self::Created => "CREATED",
            Self::Edited => "EDITED",
            Self::Failed => "FAILED",
            Self::Summary => "SUMMARY",
        }
    }
}

impl fmt::Display for HealEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped line of the heal log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealLogEntry {
    pub at: DateTime<Utc>,
    pub event: HealEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub message: String,
}

impl fmt::Display for HealLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%Y-%m-%d %H:%M:%S"), self.event)?;
        if let Some(template) = &self.template {
            write!(f, " {template}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Append-only heal log.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct HealLog {
    entries: Vec<HealLogEntry>,
}

impl HealLog {
    fn push(&mut self, event: HealEvent, template: Option<&str>, message: impl Into<String>) {
        let entry = HealLogEntry {
            at: Utc::now(),
            event,
            template: template.map(str::to_string),
            message: message.into(),
        };
        match event {
            HealEvent::Failed | HealEvent::SyncFailed => {
                tracing::warn!(event = %event, template = ?entry.template, "{}", entry.message)
            }
            _ => tracing::info!(event = %event, template = ?entry.template, "{}", entry.message),
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HealLogEntry] {
        &self.entries
    }

    /// Lines of the given kind, optionally for one template.
    pub fn count(&self, event: HealEvent, template: Option<&str>) -> usize {
        self.entries
            .iter()
            .filter(|e| e.event == event)
            .filter(|e| template.map_or(true, |t| e.template.as_deref() == Some(t)))
            .count()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

/// What a pass found for one required template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "finding", rename_all = "snake_case")]
pub enum Finding {
    Missing,
    Rejected { reason: Option<String> },
    Mismatch { compliance: Compliance },
    Ok,
}

impl Finding {
    pub fn event(&self) -> HealEvent {
        match self {
            Self::Missing => HealEvent::Missing,
            Self::Rejected { .. } => HealEvent::Rejected,
            Self::Mismatch { .. } => HealEvent::Mismatch,
            Self::Ok => HealEvent::Ok,
        }
    }

    pub fn needs_repair(&self) -> bool {
        !matches!(self, Self::Ok)
    }

    fn describe(&self) -> String {
        match self {
            Self::Missing => "not present locally or remotely".to_string(),
            Self::Rejected { reason } => format!(
                "rejected by provider ({})",
                reason.as_deref().unwrap_or("no reason given")
            ),
            Self::Mismatch { compliance } => compliance.describe(),
            Self::Ok => "compliant".to_string(),
        }
    }
}

/// Finding for one required template, as reported by an audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateCheck {
    pub name: &'static str,
    #[serde(flatten)]
    pub finding: Finding,
    /// Id of the matching local record, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Whether the matching record exists at the provider
    pub deployed: bool,
}

/// Result of a completed heal pass.
#[derive(Debug, Clone, Serialize)]
pub struct HealReport {
    /// Catalog after the final sync (or the last good state if it failed)
    pub records: Vec<TemplateRecord>,
    pub log: HealLog,
    /// Successful create/edit calls
    pub actions_taken: usize,
    pub failures: usize,
    /// Required templates held only as local records at the end of the pass
    pub undeployed: Vec<String>,
}

/// Releases the single-pass slot when dropped.
struct HealGuard<'a> {
    running: &'a AtomicBool,
}

impl<'a> HealGuard<'a> {
    fn acquire(running: &'a AtomicBool) -> Result<Self> {
        running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SyncError::AlreadyRunning)?;
        Ok(Self { running })
    }
}

impl Drop for HealGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

/// Runs heal passes, at most one at a time.
pub struct AutoHealer {
    provider: Arc<dyn RemoteTemplateProvider>,
    rewriter: Arc<dyn ComplianceRewriter>,
    rules: ComplianceRules,
    running: AtomicBool,
}

impl AutoHealer {
    pub fn new(
        provider: Arc<dyn RemoteTemplateProvider>,
        rewriter: Arc<dyn ComplianceRewriter>,
    ) -> Self {
        Self {
            provider,
            rewriter,
            rules: ComplianceRules::default(),
            running: AtomicBool::new(false),
        }
    }

    pub fn with_rules(mut self, rules: ComplianceRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Classify one required template against the catalog.
    pub fn inspect(&self, candidate: Option<&TemplateRecord>, required: &RequiredTemplate) -> Finding {
        let Some(candidate) = candidate else {
            return Finding::Missing;
        };
        if candidate.is_rejected() {
            return Finding::Rejected {
                reason: candidate.rejection_reason.clone(),
            };
        }
        let compliance = self.rules.check(&candidate.content, required.content);
        if compliance.is_compliant() {
            Finding::Ok
        } else {
            Finding::Mismatch { compliance }
        }
    }

    /// Dry run: classify every required template without touching anything.
    pub fn audit(&self, records: &[TemplateRecord]) -> Vec<TemplateCheck> {
        let registry = TemplateRegistry::from_records(records.to_vec());
        required_templates()
            .iter()
            .map(|required| {
                let candidate = registry.get(required.name);
                TemplateCheck {
                    name: required.name,
                    finding: self.inspect(candidate, required),
                    id: candidate.map(|r| r.id.clone()),
                    deployed: candidate.is_some_and(TemplateRecord::is_deployed),
                }
            })
            .collect()
    }

    /// Run a full pass over `local`.
    ///
    /// # Errors
    ///
    /// Only `AlreadyRunning`, when another pass holds the slot. Everything
    /// else is recorded in the report's log.
    pub async fn run(&self, local: Vec<TemplateRecord>) -> Result<HealReport> {
        let _guard = HealGuard::acquire(&self.running)?;
        let mut log = HealLog::default();

        let merged = self.settle(local, &mut log, "initial").await;
        let mut registry = TemplateRegistry::from_records(merged);
        let actions = RepairActions::new(self.provider.as_ref(), self.rewriter.as_ref());
        let mut actions_taken = 0;
        let mut failures = 0;

        for required in required_templates() {
            let existing = registry.get(required.name).cloned();
            let finding = self.inspect(existing.as_ref(), required);
            let mut message = finding.describe();
            if existing.as_ref().is_some_and(|r| !r.is_deployed()) {
                message.push_str(", not deployed");
            }
            log.push(finding.event(), Some(required.name), message);

            let result = match (&finding, &existing) {
                (Finding::Ok, _) => continue,
                (_, Some(existing)) => actions.edit(existing, &required.draft()).await,
                (_, None) => actions.create(required.seed_record()).await,
            };

            match result {
                Ok(repair) => {
                    actions_taken += 1;
                    log.push(
                        match repair.kind {
                            RepairKind::Created => HealEvent::Created,
                            RepairKind::Edited => HealEvent::Edited,
                        },
                        Some(required.name),
                        describe_repair(&repair),
                    );
                    apply_repair(&mut registry, repair);
                }
                Err(err) => {
                    failures += 1;
                    log.push(HealEvent::Failed, Some(required.name), err.to_string());
                }
            }
        }

        log.push(
            HealEvent::Summary,
            None,
            format!(
                "{} required templates checked, {} actions taken, {} failed",
                required_templates().len(),
                actions_taken,
                failures
            ),
        );

        let records = self.settle(registry.into_records(), &mut log, "final").await;
        let undeployed = undeployed_required(&records);
        if !undeployed.is_empty() {
            log.push(
                HealEvent::Summary,
                None,
                format!(
                    "{} required templates exist only locally: {}",
                    undeployed.len(),
                    undeployed.join(", ")
                ),
            );
        }

        Ok(HealReport {
            records,
            log,
            actions_taken,
            failures,
            undeployed,
        })
    }

    /// Sync, falling back to `records` unchanged when the provider is unreachable.
    async fn settle(
        &self,
        records: Vec<TemplateRecord>,
        log: &mut HealLog,
        phase: &str,
    ) -> Vec<TemplateRecord> {
        match sync(self.provider.as_ref(), records.clone()).await {
            Ok(outcome) => {
                log.push(
                    HealEvent::Synced,
                    None,
                    format!(
                        "{phase} sync: {} remote, {} new, {} records",
                        outcome.stats.remote,
                        outcome.stats.observed,
                        outcome.records.len()
                    ),
                );
                outcome.records
            }
            Err(err) => {
                log.push(
                    HealEvent::SyncFailed,
                    None,
                    format!("{phase} sync: {err}; using local state"),
                );
                records
            }
        }
    }
}

/// Required names whose record has never reached the provider.
fn undeployed_required(records: &[TemplateRecord]) -> Vec<String> {
    required_templates()
        .iter()
        .filter(|required| {
            records
                .iter()
                .any(|r| r.name == required.name && !r.is_deployed())
        })
        .map(|required| required.name.to_string())
        .collect()
}

fn describe_repair(repair: &Repair) -> String {
    let record = &repair.record;
    let mut message = match repair.kind {
        RepairKind::Created if repair.degraded => {
            format!("not deployed yet, created as {} (id {})", record.name, record.id)
        }
        RepairKind::Created => format!("created as {} (id {})", record.name, record.id),
        RepairKind::Edited => format!("edited id {}", record.id),
    };
    if repair.rewritten {
        message.push_str(", content rewritten for compliance");
    }
    message.push_str(", pending review");
    message
}

/// Reflect a successful repair in the catalog.
///
/// A create the provider stored under a different name leaves the
/// undeployed record for the requested name behind; it is dropped so the
/// next pass does not mistake it for a live template.
pub(crate) fn apply_repair(registry: &mut TemplateRegistry, repair: Repair) {
    if repair.record.name != repair.requested_name {
        if let Some(stale) = registry.get(&repair.requested_name) {
            if !stale.is_deployed() {
                registry.remove(&repair.requested_name);
            }
        }
    }
    registry.upsert(repair.record);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{seed_missing, REQUIRED_TEMPLATES};
    use crate::compliance::RuleRewriter;
    use crate::model::TemplateStatus;
    use crate::testing::FakeProvider;

    fn healer(provider: Arc<FakeProvider>) -> AutoHealer {
        AutoHealer::new(provider, Arc::new(RuleRewriter::new()))
    }

    #[test]
    fn test_log_line_format() {
        let entry = HealLogEntry {
            at: DateTime::parse_from_rfc3339("2024-03-01T09:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            event: HealEvent::Missing,
            template: Some("setu_payment_button".to_string()),
            message: "not present locally or remotely".to_string(),
        };
        assert_eq!(
            entry.to_string(),
            "[2024-03-01 09:30:00] MISSING setu_payment_button: not present locally or remotely"
        );
    }

    #[test]
    fn test_inspect_precedence() {
        let healer = healer(Arc::new(FakeProvider::new()));
        let required = &REQUIRED_TEMPLATES[1];

        assert_eq!(healer.inspect(None, required), Finding::Missing);

        let mut record = required.seed_record();
        record.status = Some(TemplateStatus::Rejected);
        record.content = "unrelated".to_string();
        assert!(matches!(healer.inspect(Some(&record), required), Finding::Rejected { .. }));

        record.status = Some(TemplateStatus::Approved);
        assert!(matches!(healer.inspect(Some(&record), required), Finding::Mismatch { .. }));

        assert_eq!(healer.inspect(Some(&required.seed_record()), required), Finding::Ok);
    }

    #[test]
    fn test_audit_covers_every_required_template() {
        let healer = healer(Arc::new(FakeProvider::new()));
        let mut records = seed_missing(&[]);
        records.retain(|r| r.name != "order_shipped");

        let checks = healer.audit(&records);

        assert_eq!(checks.len(), REQUIRED_TEMPLATES.len());
        let shipped = checks.iter().find(|c| c.name == "order_shipped").unwrap();
        assert_eq!(shipped.finding, Finding::Missing);
        assert!(shipped.id.is_none());
        assert_eq!(checks.iter().filter(|c| c.finding == Finding::Ok).count(), 8);
    }

    #[test]
    fn test_audit_reports_deployment() {
        let healer = healer(Arc::new(FakeProvider::new()));
        let mut records = seed_missing(&[]);
        records[0].id = "4242".to_string();

        let checks = healer.audit(&records);

        assert!(checks[0].deployed);
        assert!(checks[1..].iter().all(|c| !c.deployed && c.finding == Finding::Ok));
        assert!(!healer.audit(&[])[0].deployed);
    }

    #[tokio::test]
    async fn test_seeded_records_are_reported_as_undeployed() {
        let healer = healer(Arc::new(FakeProvider::new()));

        let report = healer.run(seed_missing(&[])).await.unwrap();

        assert_eq!(report.actions_taken, 0);
        assert_eq!(report.undeployed.len(), REQUIRED_TEMPLATES.len());
        let ok = report
            .log
            .entries()
            .iter()
            .find(|e| e.event == HealEvent::Ok)
            .unwrap();
        assert_eq!(ok.message, "compliant, not deployed");
        assert_eq!(report.log.count(HealEvent::Summary, None), 2);
    }

    #[tokio::test]
    async fn test_second_pass_is_refused_while_running() {
        let healer = healer(Arc::new(FakeProvider::new()));
        let _held = HealGuard::acquire(&healer.running).unwrap();

        assert!(healer.is_running());
        let err = healer.run(Vec::new()).await.unwrap_err();
        assert!(matches!(err, SyncError::AlreadyRunning));
    }

    #[tokio::test]
    async fn test_guard_released_after_pass() {
        let healer = healer(Arc::new(FakeProvider::new()));
        healer.run(seed_missing(&[])).await.unwrap();
        assert!(!healer.is_running());
        healer.run(seed_missing(&[])).await.unwrap();
    }

    #[test]
    fn test_apply_repair_drops_stale_requested_name() {
        let mut registry = TemplateRegistry::from_records(vec![REQUIRED_TEMPLATES[0].seed_record()]);
        let mut record = REQUIRED_TEMPLATES[0].seed_record();
        record.name = "setu_payment_button_v2".to_string();
        record.id = "77".to_string();

        apply_repair(
            &mut registry,
            Repair {
                kind: RepairKind::Created,
                record,
                requested_name: "setu_payment_button".to_string(),
                degraded: false,
                rewritten: false,
            },
        );

        assert!(!registry.contains("setu_payment_button"));
        assert!(registry.contains("setu_payment_button_v2"));
    }
}
