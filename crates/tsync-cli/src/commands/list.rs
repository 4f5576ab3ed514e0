use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::output::{record_rows, records_json, RECORD_HEADERS};
use crate::ui::{print, table};

use super::parse_group;

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let group = args.group.as_deref().map(parse_group).transpose()?;
    let service = ctx.service()?;
    let records = service.list(group)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records_json(&records))?);
        return Ok(());
    }

    if records.is_empty() {
        if !ctx.quiet() {
            println!("No templates found.");
        }
        return Ok(());
    }

    let ui_ctx = ctx.ui_context(false, args.format.as_deref());
    print(
        &ui_ctx,
        &table(&ui_ctx, &RECORD_HEADERS, &record_rows(&ui_ctx, &records)),
    );
    Ok(())
}
