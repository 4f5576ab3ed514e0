use tsync_core::HealReport;

use crate::app::AppContext;
use crate::cli::HealArgs;
use crate::ui::theme::{event_style, styled};
use crate::ui::{badge, blank_line, header, print, Badge, OutputMode, Spinner, UiContext};

pub async fn handle_heal(ctx: &AppContext<'_>, args: &HealArgs) -> anyhow::Result<()> {
    ctx.require_provider()?;
    let service = ctx.service()?;
    let ui_ctx = ctx.ui_context(args.json, None);

    let spinner = Spinner::start(&ui_ctx, "Healing required templates");
    let report = match service.auto_heal().await {
        Ok(report) => report,
        Err(e) => {
            spinner.abandon();
            return Err(e.into());
        }
    };
    spinner.abandon();

    if ui_ctx.mode.is_json() {
        let json_output = serde_json::json!({
            "actions_taken": report.actions_taken,
            "failures": report.failures,
            "undeployed": report.undeployed,
            "log": report.log,
        });
        println!("{}", serde_json::to_string_pretty(&json_output)?);
        return Ok(());
    }
    if !ctx.quiet() {
        print_report(&ui_ctx, &report);
    }
    Ok(())
}

fn print_report(ctx: &UiContext, report: &HealReport) {
    if ctx.mode.is_pretty() {
        print(ctx, &header(ctx, "heal", None));
        blank_line(ctx);
    }
    for entry in report.log.entries() {
        match ctx.mode {
            OutputMode::Pretty => {
                let event = styled(entry.event.as_str(), event_style(entry.event), ctx.color);
                let at = entry.at.format("%H:%M:%S").to_string();
                match &entry.template {
                    Some(name) => println!("{}  {:<12} {}: {}", at, event, name, entry.message),
                    None => println!("{}  {:<12} {}", at, event, entry.message),
                }
            }
            OutputMode::Plain | OutputMode::Json => println!("{}", entry),
        }
    }

    if ctx.mode.is_pretty() {
        blank_line(ctx);
        let (kind, text) = if report.failures > 0 {
            (
                Badge::Warn,
                format!(
                    "{} actions taken, {} failed; see FAILED lines above",
                    report.actions_taken, report.failures
                ),
            )
        } else if !report.undeployed.is_empty() {
            (
                Badge::Warn,
                format!(
                    "{} actions taken, {} required templates not deployed; run `tsync deploy NAME`",
                    report.actions_taken,
                    report.undeployed.len()
                ),
            )
        } else if report.actions_taken == 0 {
            (Badge::Ok, "All required templates compliant".to_string())
        } else {
            (Badge::Ok, format!("{} actions taken", report.actions_taken))
        };
        print(ctx, &badge(ctx, kind, &text));
    }
}
