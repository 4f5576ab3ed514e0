//! JSON file persistence.

use std::path::{Path, PathBuf};

use super::traits::TemplateStore;
use crate::error::{Result, SyncError};
use crate::fs::write_atomic;
use crate::model::TemplateRecord;

/// Stores the template list as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateStore for JsonFileStore {
    fn load(&self) -> Result<Vec<TemplateRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            SyncError::Storage(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents).map_err(|e| {
            SyncError::Serialization(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, records: &[TemplateRecord]) -> Result<()> {
        let json = serde_json::to_vec_pretty(records)?;
        write_atomic(&self.path, &json).map_err(|e| {
            SyncError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "saved templates");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "json-file"
    }
}
