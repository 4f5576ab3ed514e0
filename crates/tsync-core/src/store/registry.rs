//! Name-keyed in-memory view of the template catalog.

use chrono::Utc;

use super::traits::TemplateStore;
use crate::error::Result;
use crate::model::{AppGroup, TemplateRecord};
use crate::validate::align_examples;

/// The local template catalog, keyed by name, in stored order.
///
/// Name uniqueness is only guaranteed after a merge; a registry loaded from
/// a hand-edited file may briefly hold duplicates, in which case lookups
/// return the first record.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    records: Vec<TemplateRecord>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<TemplateRecord>) -> Self {
        Self { records }
    }

    /// Load the catalog from a persistence backend.
    pub fn load(store: &dyn TemplateStore) -> Result<Self> {
        let records = store.load()?;
        tracing::debug!(backend = store.backend(), count = records.len(), "loaded templates");
        Ok(Self { records })
    }

    /// Write the catalog back to a persistence backend.
    pub fn persist(&self, store: &dyn TemplateStore) -> Result<()> {
        store.save(&self.records)
    }

    pub fn records(&self) -> &[TemplateRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TemplateRecord> {
        self.records
    }

    /// Swap in a whole new record list (e.g. a merge result).
    pub fn replace_all(&mut self, records: Vec<TemplateRecord>) {
        self.records = records;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TemplateRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Records in a given app group, in stored order.
    pub fn in_group(&self, group: AppGroup) -> Vec<&TemplateRecord> {
        self.records.iter().filter(|r| r.group() == group).collect()
    }

    /// Insert or replace a record by name.
    ///
    /// Example values are aligned to the content before storing, and the
    /// record's `updated_at` is bumped.
    pub fn upsert(&mut self, mut record: TemplateRecord) {
        record.variable_examples = align_examples(&record.content, &record.variable_examples);
        record.updated_at = Utc::now();
        match self.records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Remove a record by name, returning it.
    pub fn remove(&mut self, name: &str) -> Option<TemplateRecord> {
        let index = self.records.iter().position(|r| r.name == name)?;
        Some(self.records.remove(index))
    }
}
