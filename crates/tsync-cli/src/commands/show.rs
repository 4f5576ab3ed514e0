use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::output::{print_record, record_json};

use super::with_list_hint;

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let record = service
        .get(&args.name)
        .map_err(|e| with_list_hint(e, &args.name))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record_json(&record))?);
    } else {
        print_record(&ctx.ui_context(false, None), &record);
    }
    Ok(())
}
