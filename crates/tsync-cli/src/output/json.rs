//! JSON output for templates and audit checks.

use tsync_core::heal::TemplateCheck;
use tsync_core::validate::placeholder_count;
use tsync_core::TemplateRecord;

/// A record plus the derived fields scripts usually want.
pub fn record_json(record: &TemplateRecord) -> serde_json::Value {
    serde_json::json!({
        "id": record.id,
        "name": record.name,
        "content": record.content,
        "category": record.category,
        "app_group": record.group(),
        "source": record.source,
        "status": record.status,
        "rejection_reason": record.rejection_reason,
        "deployed": record.is_deployed(),
        "placeholders": placeholder_count(&record.content),
        "variable_examples": record.variable_examples,
        "language": record.language,
        "structure": record.structure,
        "updated_at": record.updated_at.to_rfc3339(),
    })
}

pub fn records_json(records: &[TemplateRecord]) -> Vec<serde_json::Value> {
    records.iter().map(record_json).collect()
}

pub fn check_json(checks: &[TemplateCheck]) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(checks)?)
}
