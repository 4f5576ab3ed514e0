use crate::app::AppContext;
use crate::cli::SyncArgs;
use crate::ui::{print, receipt, OutputMode, Spinner};

pub async fn handle_sync(ctx: &AppContext<'_>, args: &SyncArgs) -> anyhow::Result<()> {
    ctx.require_provider()?;
    let service = ctx.service()?;
    let ui_ctx = ctx.ui_context(args.json, None);

    let spinner = Spinner::start(&ui_ctx, "Fetching templates");
    let outcome = match service.sync().await {
        Ok(outcome) => outcome,
        Err(e) => {
            spinner.abandon();
            return Err(e.into());
        }
    };
    spinner.finish("Catalog synced");

    let stats = outcome.stats;
    match ui_ctx.mode {
        OutputMode::Json => {
            let json_output = serde_json::json!({
                "status": "ok",
                "total": outcome.records.len(),
                "stats": stats,
            });
            println!("{}", serde_json::to_string_pretty(&json_output)?);
        }
        _ if ctx.quiet() => {}
        OutputMode::Pretty => {
            let items = [
                ("remote", stats.remote.to_string()),
                ("matched", stats.matched.to_string()),
                ("new", stats.observed.to_string()),
                ("duplicates", stats.duplicates.to_string()),
                ("total", outcome.records.len().to_string()),
            ];
            print(&ui_ctx, &receipt(&ui_ctx, "Sync", &items));
        }
        OutputMode::Plain => {
            println!("status=ok");
            println!("remote={}", stats.remote);
            println!("matched={}", stats.matched);
            println!("new={}", stats.observed);
            println!("duplicates={}", stats.duplicates);
            println!("total={}", outcome.records.len());
        }
    }
    Ok(())
}
