//! In-process persistence.

use std::sync::Mutex;

use super::traits::TemplateStore;
use crate::error::{Result, SyncError};
use crate::model::TemplateRecord;

/// Keeps the template list in memory. Used by tests and `--dry-run` style callers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<TemplateRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<TemplateRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl TemplateStore for MemoryStore {
    fn load(&self) -> Result<Vec<TemplateRecord>> {
        self.records
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| SyncError::Storage("memory store lock poisoned".to_string()))
    }

    fn save(&self, records: &[TemplateRecord]) -> Result<()> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| SyncError::Storage("memory store lock poisoned".to_string()))?;
        *guard = records.to_vec();
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
