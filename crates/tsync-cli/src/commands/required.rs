use tsync_core::catalog::required_templates;
use tsync_core::validate::placeholder_count;

use crate::app::AppContext;
use crate::cli::RequiredArgs;
use crate::ui::{print, table};

pub fn handle_required(ctx: &AppContext, args: &RequiredArgs) -> anyhow::Result<()> {
    let catalog = required_templates();

    if args.json {
        let json_output: Vec<_> = catalog
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "content": t.content,
                    "category": t.category,
                    "app_group": t.app_group,
                    "placeholders": placeholder_count(t.content),
                    "examples": t.examples,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json_output)?);
        return Ok(());
    }

    let ui_ctx = ctx.ui_context(false, None);
    let rows: Vec<Vec<String>> = catalog
        .iter()
        .map(|t| {
            vec![
                t.name.to_string(),
                t.app_group.to_string(),
                t.category.to_string(),
                placeholder_count(t.content).to_string(),
            ]
        })
        .collect();
    print(
        &ui_ctx,
        &table(&ui_ctx, &["NAME", "GROUP", "CATEGORY", "PLACEHOLDERS"], &rows),
    );
    Ok(())
}
