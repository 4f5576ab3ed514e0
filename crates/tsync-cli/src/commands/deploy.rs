use tsync_core::actions::RepairKind;

use crate::app::AppContext;
use crate::cli::DeployArgs;
use crate::ui::{print, receipt, OutputMode, Spinner};

use super::with_list_hint;

pub async fn handle_deploy(ctx: &AppContext<'_>, args: &DeployArgs) -> anyhow::Result<()> {
    ctx.require_provider()?;
    let service = ctx.service()?;
    let ui_ctx = ctx.ui_context(false, None);

    let spinner = Spinner::start(&ui_ctx, &format!("Deploying '{}'", args.name));
    let repair = match service.deploy(&args.name).await {
        Ok(repair) => repair,
        Err(e) => {
            spinner.abandon();
            return Err(with_list_hint(e, &args.name));
        }
    };
    spinner.abandon();

    if ctx.quiet() {
        return Ok(());
    }

    let kind = match repair.kind {
        RepairKind::Created => "created",
        RepairKind::Edited => "edited",
    };
    let status = repair
        .record
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "pending".to_string());

    match ui_ctx.mode {
        OutputMode::Pretty => {
            let mut items = vec![
                ("action", kind.to_string()),
                ("name", repair.record.name.clone()),
                ("id", repair.record.id.clone()),
                ("status", status),
            ];
            if repair.record.name != repair.requested_name {
                items.push(("requested", repair.requested_name.clone()));
            }
            if repair.rewritten {
                items.push(("rewritten", "yes".to_string()));
            }
            print(&ui_ctx, &receipt(&ui_ctx, "Deployed", &items));
        }
        OutputMode::Plain | OutputMode::Json => {
            println!("status=ok");
            println!("action={}", kind);
            println!("name={}", repair.record.name);
            println!("id={}", repair.record.id);
            println!("review={}", status);
        }
    }
    Ok(())
}
