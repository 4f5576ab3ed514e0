use tsync_core::validate::placeholder_count;
use tsync_core::TemplateDraft;

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::output::record_json;
use crate::ui::{print, receipt, OutputMode};

use super::{parse_category, parse_group};

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let category = parse_category(&args.category)?;
    let mut draft = TemplateDraft::new(args.name.as_str(), args.body.as_str(), category)
        .with_examples(args.examples.clone())
        .with_language(args.language.as_str());
    if let Some(group) = args.group.as_deref() {
        draft = draft.with_group(parse_group(group)?);
    }

    let expected = placeholder_count(&draft.content);
    let provided = draft.examples.len();

    let service = ctx.service()?;
    let record = service.add_local(draft)?;

    if ctx.quiet() {
        return Ok(());
    }

    let ui_ctx = ctx.ui_context(false, None);
    match ui_ctx.mode {
        OutputMode::Pretty => {
            let mut items = vec![
                ("name", record.name.clone()),
                ("id", record.id.clone()),
                ("group", record.group().to_string()),
                ("placeholders", expected.to_string()),
            ];
            if provided != expected {
                items.push((
                    "examples",
                    format!("{} given, aligned to {}", provided, record.variable_examples.len()),
                ));
            }
            print(&ui_ctx, &receipt(&ui_ctx, "Added local template", &items));
        }
        OutputMode::Plain => {
            println!("status=ok");
            println!("name={}", record.name);
            println!("id={}", record.id);
            println!("group={}", record.group());
            println!("placeholders={}", expected);
        }
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&record_json(&record))?);
        }
    }
    Ok(())
}
