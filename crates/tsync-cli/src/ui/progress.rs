//! Spinner for provider round trips.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::context::UiContext;
use super::render::badge;
use super::theme::Badge;

/// Spinner shown while waiting on the provider.
///
/// Animates only on a pretty TTY; elsewhere it is silent so plain and JSON
/// output stay parseable.
pub struct Spinner<'a> {
    ctx: &'a UiContext,
    bar: Option<ProgressBar>,
}

impl<'a> Spinner<'a> {
    pub fn start(ctx: &'a UiContext, message: &str) -> Self {
        let bar = ctx.allows_animation().then(|| {
            let bar = ProgressBar::new_spinner();
            let ticks: &[&str] = if ctx.unicode {
                &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""]
            } else {
                &["|", "/", "-", "\\", ""]
            };
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}...") {
                bar.set_style(style.tick_strings(ticks));
            }
            bar.set_message(message.to_string());
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Self { ctx, bar }
    }

    fn clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Clear the spinner and print a success badge (pretty mode only).
    pub fn finish(self, message: &str) {
        self.clear();
        if self.ctx.mode.is_pretty() {
            println!("{}", badge(self.ctx, Badge::Ok, message));
        }
    }

    /// Clear the spinner without printing anything.
    pub fn abandon(self) {
        self.clear();
    }
}
