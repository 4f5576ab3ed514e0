use dialoguer::{theme::ColorfulTheme, Input};

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_store_path, expand_home, write_config, ProviderSection, TsyncConfig};
use crate::errors::CliError;
use crate::ui::{badge, hint, kv, print, Badge, OutputMode};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input_with_hint(
            format!("Config already exists at {}", config_path.display()),
            "Pass --force to overwrite it",
        )
        .into());
    }

    let ui_ctx = ctx.ui_context(false, None);
    let interactive = ui_ctx.is_interactive() && !args.no_input;

    let account_id = match args.account_id.clone() {
        Some(value) => value,
        None if interactive => {
            let theme = ColorfulTheme::default();
            Input::<String>::with_theme(&theme)
                .with_prompt("Provider business account id (blank to set later)")
                .allow_empty(true)
                .interact_text()?
        }
        None => String::new(),
    };

    let store_path = match ctx.cli().store.as_deref() {
        Some(path) => expand_home(path)?,
        None => default_store_path()?,
    };

    let mut provider = ProviderSection {
        account_id: account_id.trim().to_string(),
        ..ProviderSection::default()
    };
    if let Some(base_url) = args.base_url.as_deref() {
        provider.base_url = base_url.trim_end_matches('/').to_string();
    }
    write_config(&config_path, &TsyncConfig::new(store_path.clone(), provider.clone()))?;

    tracing::debug!(config = %config_path.display(), store = %store_path.display(), "initialized");

    if ctx.quiet() {
        return Ok(());
    }
    match ui_ctx.mode {
        OutputMode::Pretty => {
            print(
                &ui_ctx,
                &badge(
                    &ui_ctx,
                    Badge::Ok,
                    &format!("Config written to {}", config_path.display()),
                ),
            );
            print(
                &ui_ctx,
                &kv(&ui_ctx, "Store", &store_path.display().to_string()),
            );
            if provider.account_id.is_empty() {
                print(
                    &ui_ctx,
                    &hint(&ui_ctx, "Set [provider] account_id before running sync or heal"),
                );
            }
            println!();
            print(
                &ui_ctx,
                &hint(
                    &ui_ctx,
                    "tsync heal deploys the required templates  \u{00B7}  tsync audit previews it",
                ),
            );
        }
        OutputMode::Plain | OutputMode::Json => {
            println!("status=ok");
            println!("config_path={}", config_path.display());
            println!("store_path={}", store_path.display());
        }
    }
    Ok(())
}
