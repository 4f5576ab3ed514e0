//! UI primitives for the tsync CLI.
//!
//! - **Context**: environment detection (TTY, width, color, unicode)
//! - **Mode**: output mode resolution (json, plain, pretty)
//! - **Theme**: badges and colours
//! - **Render**: tables, headers, receipts, hints
//! - **Progress**: spinner for provider calls

mod context;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use progress::Spinner;
pub use render::{badge, blank_line, header, hint, kv, print, print_error, receipt, table};
