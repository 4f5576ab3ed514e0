use tsync_core::heal::Finding;

use crate::app::AppContext;
use crate::cli::AuditArgs;
use crate::output::{check_json, check_rows, CHECK_HEADERS};
use crate::ui::{badge, header, hint, print, table, Badge};

pub fn handle_audit(ctx: &AppContext, args: &AuditArgs) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let checks = service.audit()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&check_json(&checks)?)?);
        return Ok(());
    }

    let ui_ctx = ctx.ui_context(false, None);
    if ui_ctx.mode.is_pretty() {
        print(&ui_ctx, &header(&ui_ctx, "audit", Some("dry run")));
    }
    print(
        &ui_ctx,
        &table(&ui_ctx, &CHECK_HEADERS, &check_rows(&ui_ctx, &checks)),
    );

    let pending = checks
        .iter()
        .filter(|check| !matches!(check.finding, Finding::Ok))
        .count();
    let undeployed = checks
        .iter()
        .filter(|check| matches!(check.finding, Finding::Ok) && check.id.is_some() && !check.deployed)
        .count();
    if ui_ctx.mode.is_pretty() && !ctx.quiet() {
        if undeployed > 0 {
            print(
                &ui_ctx,
                &badge(
                    &ui_ctx,
                    Badge::Warn,
                    &format!("{} required templates exist only locally", undeployed),
                ),
            );
            print(&ui_ctx, &hint(&ui_ctx, "Run `tsync deploy NAME` to push them"));
        }
        if pending == 0 {
            print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "Nothing to repair"));
        } else {
            print(
                &ui_ctx,
                &badge(&ui_ctx, Badge::Warn, &format!("{} templates need repair", pending)),
            );
            print(&ui_ctx, &hint(&ui_ctx, "Run `tsync heal` to repair them"));
        }
    }
    Ok(())
}
