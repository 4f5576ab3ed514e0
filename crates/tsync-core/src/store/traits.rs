//! Persistence interface for template records.
//!
//! The reconciliation engine only needs whole-list reads and writes; change
//! notification is left to whoever renders the catalog.

use crate::error::Result;
use crate::model::TemplateRecord;

/// Key-value persistence for the local template list.
///
/// Implementations must ensure:
/// - `save` replaces the whole list
/// - `load` on a store that was never written returns an empty list
pub trait TemplateStore: Send + Sync {
    /// Read every persisted record, in stored order.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Storage` if the backend cannot be read and
    /// `SyncError::Serialization` if its contents are malformed.
    fn load(&self) -> Result<Vec<TemplateRecord>>;

    /// Replace the persisted list with `records`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Storage` if the backend cannot be written.
    fn save(&self, records: &[TemplateRecord]) -> Result<()>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_boxed(_store: Box<dyn TemplateStore>) {}
    }
}
