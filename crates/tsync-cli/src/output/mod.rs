//! Output formatting for templates and heal results.
//!
//! JSON shapes live in `json`, table rows and detail views in `text`.

mod json;
mod text;

pub use json::{check_json, record_json, records_json};
pub use text::{check_rows, print_record, record_rows, CHECK_HEADERS, RECORD_HEADERS};
