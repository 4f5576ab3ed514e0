use dialoguer::Confirm;
use tsync_core::TemplateSource;

use crate::app::AppContext;
use crate::cli::DeleteArgs;
use crate::errors::CliError;
use crate::ui::{badge, print, Badge, OutputMode};

use super::with_list_hint;

pub async fn handle_delete(ctx: &AppContext<'_>, args: &DeleteArgs) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let record = service
        .get(&args.name)
        .map_err(|e| with_list_hint(e, &args.name))?;

    let remote = record.source == TemplateSource::Remote;
    if remote {
        ctx.require_provider()?;
    }

    let ui_ctx = ctx.ui_context(false, None);

    if !args.force {
        if !ui_ctx.is_interactive() {
            return Err(CliError::invalid_input_with_hint(
                format!("Refusing to delete '{}' without confirmation", record.name),
                "Pass --force to delete non-interactively",
            )
            .into());
        }
        let prompt = if remote {
            format!("Delete template '{}' from the provider?", record.name)
        } else {
            format!("Delete local template '{}'?", record.name)
        };
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        if !confirmed {
            if !ctx.quiet() {
                match ui_ctx.mode {
                    OutputMode::Pretty => {
                        print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "Cancelled"));
                    }
                    OutputMode::Plain | OutputMode::Json => {
                        println!("status=cancelled");
                    }
                }
            }
            return Ok(());
        }
    }

    let deleted = service.delete(&record.name).await?;

    if !ctx.quiet() {
        match ui_ctx.mode {
            OutputMode::Pretty => {
                print(
                    &ui_ctx,
                    &badge(&ui_ctx, Badge::Ok, &format!("Deleted template '{}'", deleted.name)),
                );
            }
            OutputMode::Plain | OutputMode::Json => {
                println!("status=ok");
                println!("deleted={}", deleted.name);
            }
        }
    }
    Ok(())
}
