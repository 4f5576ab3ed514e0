//! Template data model.

mod ids;
mod types;

pub use ids::{is_deployed_id, is_local_id, is_system_id, new_local_id, system_id};
pub use types::{
    AppGroup, TemplateButton, TemplateCategory, TemplateDraft, TemplateRecord, TemplateSource,
    TemplateStatus, TemplateStructure, DEFAULT_LANGUAGE,
};
