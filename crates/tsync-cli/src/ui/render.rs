//! Rendering for command output.
//!
//! Every helper returns a `String` so callers decide where it goes. Plain
//! output is line-oriented `key=value` or tab-separated rows for scripts.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL};
use comfy_table::{ContentArrangement, Table};

use super::context::UiContext;
use super::mode::OutputMode;
use super::theme::{styled, styles, Badge};

/// Width keys are padded to in pretty `kv` lines.
const KEY_WIDTH: usize = 13;

fn plain_key(key: &str) -> String {
    key.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Title line, e.g. `tsync · audit (dry run)`. Empty in JSON mode.
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    let suffix = context.map(|c| format!(" ({c})")).unwrap_or_default();
    match ctx.mode {
        OutputMode::Pretty => format!(
            "{} \u{00B7} {command}{suffix}",
            styled("tsync", styles::bold(), ctx.color)
        ),
        OutputMode::Plain => format!("tsync {command}{suffix}"),
        OutputMode::Json => String::new(),
    }
}

pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let mark = styled(kind.display(ctx.unicode), kind.style(), ctx.color);
    format!("{mark} {message}").trim_end().to_string()
}

/// Pretty: dim key padded to a column. Plain: `snake_key=value`.
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if !ctx.mode.is_pretty() {
        return format!("{}={value}", plain_key(key));
    }
    let label = format!("{key}:");
    let pad = KEY_WIDTH.saturating_sub(label.chars().count());
    format!(
        "{}{} {value}",
        styled(&label, styles::dim(), ctx.color),
        " ".repeat(pad)
    )
}

pub fn hint(ctx: &UiContext, text: &str) -> String {
    if !ctx.mode.is_pretty() {
        return format!("hint={text}");
    }
    let arrow = if ctx.unicode { "\u{21B3}" } else { "->" };
    format!("{} {text}", styled(arrow, styles::dim(), ctx.color))
}

/// Outcome of a write: an OK badge and indented fields, or `status=ok`
/// followed by the fields in plain mode.
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, String)]) -> String {
    let (first, indent) = if ctx.mode.is_pretty() {
        (badge(ctx, Badge::Ok, title), "  ")
    } else {
        ("status=ok".to_string(), "")
    };
    std::iter::once(first)
        .chain(
            items
                .iter()
                .map(|(key, value)| format!("{indent}{}", kv(ctx, key, value))),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

/// Bordered table sized to the terminal, or headerless tab-separated rows.
pub fn table(ctx: &UiContext, headers: &[&str], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut out = Table::new();
    match ctx.unicode {
        true => out.load_preset(UTF8_FULL).apply_modifier(UTF8_ROUND_CORNERS),
        false => out.load_preset(ASCII_MARKDOWN),
    };
    out.set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(u16::try_from(ctx.width).unwrap_or(u16::MAX))
        .set_header(headers.to_vec());
    for row in rows {
        out.add_row(row);
    }
    out.to_string()
}

/// Print unless in JSON mode.
pub fn print(ctx: &UiContext, message: &str) {
    if ctx.mode.is_json() || message.is_empty() {
        return;
    }
    println!("{message}");
}

pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() {
        println!();
    }
}

/// Error text for stderr: a badge and hint line, or `error=` and `hint=`.
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let head = match ctx.mode {
        OutputMode::Pretty => badge(ctx, Badge::Err, message),
        OutputMode::Plain | OutputMode::Json => format!("error={message}"),
    };
    match error_hint {
        Some(text) => format!("{head}\n{}", hint(ctx, text)),
        None => head,
    }
}

pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}
