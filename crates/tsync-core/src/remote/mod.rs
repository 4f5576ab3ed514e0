//! Remote template provider interface and the HTTP implementation.

mod http;
mod provider;

pub use http::{normalize_template_name, HttpProviderConfig, HttpTemplateProvider, DEFAULT_BASE_URL};
pub use provider::{
    ComponentKind, CreateOutcome, RemoteAck, RemoteComponent, RemoteTemplate,
    RemoteTemplateProvider,
};
