//! Template persistence and the in-memory record store.
//!
//! - **traits**: the `TemplateStore` persistence interface
//! - **json_file**: pretty-printed JSON file backend with atomic writes
//! - **memory**: in-process backend for tests and dry runs
//! - **registry**: name-keyed in-memory view loaded from a backend

mod json_file;
mod memory;
mod registry;
mod traits;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use registry::TemplateRegistry;
pub use traits::TemplateStore;
