//! tsync - keeps a jewelry POS's message templates in step with the
//! messaging provider.
//!
//! This is the command-line front end over `tsync-core`.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod output;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{add, audit, delete, deploy, heal, init, list, misc, required, show, sync};
use crate::errors::exit_code_for;
use crate::ui::print_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli).await {
        let ui_ctx = ctx.ui_context(false, None);
        let error_msg = format!("{}", e);
        let (message, hint) = split_hint(&error_msg);
        print_error(&ui_ctx, message, hint);
        std::process::exit(exit_code_for(&e));
    }
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "tsync=debug,tsync_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Split "message\nHint: text" into its parts.
fn split_hint(error: &str) -> (&str, Option<&str>) {
    match error.find("\nHint:") {
        Some(idx) => (&error[..idx], Some(error[idx + "\nHint:".len()..].trim())),
        None => (error, None),
    }
}

async fn run(ctx: &AppContext<'_>, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init(args) => init::handle_init(ctx, args),
        Commands::Sync(args) => sync::handle_sync(ctx, args).await,
        Commands::Heal(args) => heal::handle_heal(ctx, args).await,
        Commands::Audit(args) => audit::handle_audit(ctx, args),
        Commands::List(args) => list::handle_list(ctx, args),
        Commands::Show(args) => show::handle_show(ctx, args),
        Commands::Add(args) => add::handle_add(ctx, args),
        Commands::Deploy(args) => deploy::handle_deploy(ctx, args).await,
        Commands::Delete(args) => delete::handle_delete(ctx, args).await,
        Commands::Required(args) => required::handle_required(ctx, args),
        Commands::Completions { shell } => misc::handle_completions(*shell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_hint() {
        assert_eq!(
            split_hint("Template 'x' not found\nHint: Run `tsync list`"),
            ("Template 'x' not found", Some("Run `tsync list`"))
        );
        assert_eq!(split_hint("disk full"), ("disk full", None));
    }
}
