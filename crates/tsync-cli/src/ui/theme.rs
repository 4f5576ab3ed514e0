//! Badges, palette and status colours.

use owo_colors::{OwoColorize, Style};
use tsync_core::heal::HealEvent;
use tsync_core::TemplateStatus;

/// Badge types for status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Warn,
    Err,
    Info,
}

impl Badge {
    /// Badge text, unicode or ASCII.
    pub fn display(&self, unicode: bool) -> &'static str {
        match (self, unicode) {
            (Self::Ok, true) => "[\u{2713}]",
            (Self::Ok, false) => "[OK]",
            (Self::Warn, true) => "[\u{26A0}]",
            (Self::Warn, false) => "[WARN]",
            (Self::Err, true) => "[\u{2717}]",
            (Self::Err, false) => "[ERR]",
            (Self::Info, true) => "[\u{2139}]",
            (Self::Info, false) => "[INFO]",
        }
    }

    pub fn style(&self) -> Style {
        match self {
            Self::Ok => styles::green(),
            Self::Warn => styles::yellow(),
            Self::Err => styles::red(),
            Self::Info => styles::cyan(),
        }
    }
}

/// Apply `style` when colour is on.
pub fn styled(text: &str, style: Style, color: bool) -> String {
    if color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

pub mod styles {
    use owo_colors::Style;

    pub fn bold() -> Style {
        Style::new().bold()
    }

    pub fn dim() -> Style {
        Style::new().dimmed()
    }

    pub fn green() -> Style {
        Style::new().green()
    }

    pub fn yellow() -> Style {
        Style::new().yellow()
    }

    pub fn red() -> Style {
        Style::new().red()
    }

    pub fn cyan() -> Style {
        Style::new().cyan()
    }
}

/// Colour for a review status; never-pushed records are dim.
pub fn status_style(status: Option<TemplateStatus>) -> Style {
    match status {
        Some(TemplateStatus::Approved) => styles::green(),
        Some(TemplateStatus::Pending) => styles::yellow(),
        Some(TemplateStatus::Rejected) => styles::red(),
        None => styles::dim(),
    }
}

/// Colour for a heal log event.
pub fn event_style(event: HealEvent) -> Style {
    match event {
        HealEvent::Ok | HealEvent::Synced => styles::green(),
        HealEvent::Created | HealEvent::Edited => styles::cyan(),
        HealEvent::Missing | HealEvent::Rejected | HealEvent::Mismatch => styles::yellow(),
        HealEvent::Failed | HealEvent::SyncFailed => styles::red(),
        HealEvent::Summary => styles::bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_display() {
        assert_eq!(Badge::Ok.display(false), "[OK]");
        assert_eq!(Badge::Err.display(true), "[\u{2717}]");
    }

    #[test]
    fn test_styled_without_color_is_plain() {
        assert_eq!(styled("pending", styles::yellow(), false), "pending");
        assert_ne!(styled("pending", styles::yellow(), true), "pending");
    }
}
