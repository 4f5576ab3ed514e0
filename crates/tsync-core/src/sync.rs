//! Merging the remote template list into the local catalog.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;

use crate::classify::infer_group;
use crate::error::{Result, SyncError};
use crate::model::{is_system_id, TemplateRecord, TemplateSource};
use crate::remote::{RemoteTemplate, RemoteTemplateProvider};
use crate::validate::align_examples;

/// Counters describing one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Templates the provider returned
    pub remote: usize,
    /// Remote templates that matched an existing local record
    pub matched: usize,
    /// Remote templates seen for the first time
    pub observed: usize,
    /// Records dropped as duplicate names
    pub duplicates: usize,
}

/// Result of a sync: the merged catalog plus counters.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub records: Vec<TemplateRecord>,
    pub stats: SyncStats,
}

/// Fetch the remote list and merge it into `local`.
///
/// # Errors
///
/// Returns `RemoteUnavailable` if the provider cannot be read. `local` is
/// consumed either way; callers that want to fall back keep a copy.
pub async fn sync(
    provider: &dyn RemoteTemplateProvider,
    local: Vec<TemplateRecord>,
) -> Result<SyncOutcome> {
    let remote = provider.fetch_all().await.map_err(|err| match err {
        SyncError::RemoteUnavailable(_) => err,
        other => SyncError::RemoteUnavailable(other.to_string()),
    })?;

    let (records, stats) = merge_remote(local, &remote);
    tracing::info!(
        provider = provider.name(),
        remote = stats.remote,
        matched = stats.matched,
        observed = stats.observed,
        duplicates = stats.duplicates,
        total = records.len(),
        "synced templates"
    );
    Ok(SyncOutcome { records, stats })
}

/// Merge a fetched remote list into local records.
///
/// Records are matched by name. A match takes the remote id, status,
/// category, content and structure but keeps its app group. Unmatched remote
/// templates become new records classified by keyword. New records come
/// first in the output, followed by the local list in its original order;
/// duplicate names are then collapsed (see [`dedupe_by_name`]).
pub fn merge_remote(
    mut local: Vec<TemplateRecord>,
    remote: &[RemoteTemplate],
) -> (Vec<TemplateRecord>, SyncStats) {
    let mut stats = SyncStats {
        remote: remote.len(),
        ..SyncStats::default()
    };
    let mut observed = Vec::new();

    for template in remote {
        match local.iter_mut().find(|r| r.name == template.name) {
            Some(existing) => {
                absorb(existing, template);
                stats.matched += 1;
            }
            None => {
                observed.push(from_remote(template));
                stats.observed += 1;
            }
        }
    }

    observed.extend(local);
    let total = observed.len();
    let merged = dedupe_by_name(observed);
    stats.duplicates = total - merged.len();
    (merged, stats)
}

/// Collapse records sharing a name.
///
/// The first occurrence wins, except that a record with a non-system id
/// replaces an earlier one holding a system id. The replacement takes the
/// earlier record's position.
fn dedupe_by_name(records: Vec<TemplateRecord>) -> Vec<TemplateRecord> {
    let mut kept: Vec<TemplateRecord> = Vec::with_capacity(records.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        match index.get(&record.name) {
            Some(&at) => {
                if is_system_id(&kept[at].id) && !is_system_id(&record.id) {
                    tracing::debug!(name = %record.name, id = %record.id, "replacing bootstrap record");
                    kept[at] = record;
                }
            }
            None => {
                index.insert(record.name.clone(), kept.len());
                kept.push(record);
            }
        }
    }

    kept
}

/// Overwrite a local record with what the provider reports.
fn absorb(record: &mut TemplateRecord, template: &RemoteTemplate) {
    let content = template.body_text();
    let examples = if template.body_examples().is_empty() {
        std::mem::take(&mut record.variable_examples)
    } else {
        template.body_examples().to_vec()
    };

    record.id = template.id.clone();
    record.status = Some(template.status);
    record.rejection_reason = template.rejection_reason.clone();
    record.structure = Some(template.structure());
    record.category = template.category;
    record.language = template.language.clone();
    record.source = TemplateSource::Remote;
    if record.app_group.is_none() {
        record.app_group = Some(infer_group(&template.name, &content));
    }
    record.variable_examples = align_examples(&content, &examples);
    record.content = content;
    record.updated_at = Utc::now();
}

/// A record for a remote template the catalog has never seen.
fn from_remote(template: &RemoteTemplate) -> TemplateRecord {
    let content = template.body_text();
    TemplateRecord {
        id: template.id.clone(),
        name: template.name.clone(),
        app_group: Some(infer_group(&template.name, &content)),
        category: template.category,
        source: TemplateSource::Remote,
        status: Some(template.status),
        rejection_reason: template.rejection_reason.clone(),
        structure: Some(template.structure()),
        variable_examples: align_examples(&content, template.body_examples()),
        language: template.language.clone(),
        content,
        updated_at: Utc::now(),
    }
}
