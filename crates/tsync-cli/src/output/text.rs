//! Table rows and detail views.

use tsync_core::heal::{Finding, TemplateCheck};
use tsync_core::validate::placeholder_count;
use tsync_core::TemplateRecord;

use crate::ui::theme::{status_style, styled, styles};
use crate::ui::{kv, print, UiContext};

pub const RECORD_HEADERS: [&str; 6] = ["NAME", "GROUP", "CATEGORY", "STATUS", "SOURCE", "ID"];

pub const CHECK_HEADERS: [&str; 4] = ["TEMPLATE", "FINDING", "DETAIL", "ID"];

fn status_text(record: &TemplateRecord) -> &'static str {
    record.status.map(|s| s.as_str()).unwrap_or("local")
}

pub fn record_rows(ctx: &UiContext, records: &[TemplateRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|record| {
            vec![
                record.name.clone(),
                record.group().to_string(),
                record.category.to_string(),
                styled(status_text(record), status_style(record.status), ctx.color),
                format!("{:?}", record.source).to_lowercase(),
                record.id.clone(),
            ]
        })
        .collect()
}

pub fn check_rows(ctx: &UiContext, checks: &[TemplateCheck]) -> Vec<Vec<String>> {
    checks
        .iter()
        .map(|check| {
            let (label, detail, style) = match &check.finding {
                Finding::Ok if check.id.is_some() && !check.deployed => {
                    ("ok", "not deployed".to_string(), styles::yellow())
                }
                Finding::Ok => ("ok", String::new(), styles::green()),
                Finding::Missing => ("missing", "would create".to_string(), styles::yellow()),
                Finding::Rejected { reason } => (
                    "rejected",
                    reason.clone().unwrap_or_else(|| "no reason given".to_string()),
                    styles::red(),
                ),
                Finding::Mismatch { compliance } => ("mismatch", compliance.describe(), styles::yellow()),
            };
            vec![
                check.name.to_string(),
                styled(label, style, ctx.color),
                if detail.is_empty() && !ctx.mode.is_pretty() {
                    "-".to_string()
                } else {
                    detail
                },
                check.id.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect()
}

/// Detail view for `tsync show`.
pub fn print_record(ctx: &UiContext, record: &TemplateRecord) {
    print(ctx, &kv(ctx, "Name", &record.name));
    print(ctx, &kv(ctx, "ID", &record.id));
    print(ctx, &kv(ctx, "Group", record.group().as_str()));
    print(ctx, &kv(ctx, "Category", record.category.as_str()));
    print(
        ctx,
        &kv(
            ctx,
            "Status",
            &styled(status_text(record), status_style(record.status), ctx.color),
        ),
    );
    if let Some(reason) = &record.rejection_reason {
        print(ctx, &kv(ctx, "Rejection", reason));
    }
    print(ctx, &kv(ctx, "Language", &record.language));
    print(
        ctx,
        &kv(ctx, "Placeholders", &placeholder_count(&record.content).to_string()),
    );
    if !record.variable_examples.is_empty() {
        print(ctx, &kv(ctx, "Examples", &record.variable_examples.join(", ")));
    }
    print(ctx, &kv(ctx, "Updated", &record.updated_at.to_rfc3339()));
    if ctx.mode.is_pretty() {
        println!();
        println!("{}", record.content);
    } else {
        print(ctx, &kv(ctx, "Content", &record.content.replace('\n', "\\n")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsync_core::catalog::REQUIRED_TEMPLATES;
    use crate::ui::OutputMode;

    fn plain() -> UiContext {
        UiContext {
            is_tty: false,
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
        }
    }

    #[test]
    fn test_record_row_for_seeded_template() {
        let rows = record_rows(&plain(), &[REQUIRED_TEMPLATES[0].seed_record()]);
        assert_eq!(
            rows[0],
            vec![
                "setu_payment_button",
                "payment",
                "utility",
                "local",
                "local",
                "sys-setu_payment_button"
            ]
        );
    }

    #[test]
    fn test_check_row_placeholders_for_empty_detail() {
        let check = TemplateCheck {
            name: "order_shipped",
            finding: Finding::Ok,
            id: None,
            deployed: false,
        };
        assert_eq!(check_rows(&plain(), &[check])[0], vec!["order_shipped", "ok", "-", "-"]);
    }

    #[test]
    fn test_check_row_flags_local_only_match() {
        let check = TemplateCheck {
            name: "order_shipped",
            finding: Finding::Ok,
            id: Some("sys-order_shipped".to_string()),
            deployed: false,
        };
        assert_eq!(
            check_rows(&plain(), &[check])[0],
            vec!["order_shipped", "ok", "not deployed", "sys-order_shipped"]
        );
    }
}
