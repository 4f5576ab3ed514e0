use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use tsync_core::VERSION;

/// tsync - keep message templates in step with the messaging provider
#[derive(Parser)]
#[command(name = "tsync")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the template store (JSON)
    #[arg(short, long, global = true, env = "TSYNC_STORE")]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file and seed the required templates
    Init(InitArgs),

    /// Refresh the local catalog from the provider
    Sync(SyncArgs),

    /// Repair missing, rejected or drifted required templates
    Heal(HealArgs),

    /// Report what a heal pass would do, without changing anything
    Audit(AuditArgs),

    /// List templates in the local catalog
    List(ListArgs),

    /// Show one template
    Show(ShowArgs),

    /// Author a local template (not deployed until `tsync deploy`)
    Add(AddArgs),

    /// Push a stored template to the provider
    Deploy(DeployArgs),

    /// Delete a template (remotely first, for deployed templates)
    Delete(DeleteArgs),

    /// List the required templates compiled into this build
    Required(RequiredArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Business account id at the provider
    #[arg(long)]
    pub account_id: Option<String>,

    /// Provider API root
    #[arg(long)]
    pub base_url: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `sync` command
#[derive(Args)]
pub struct SyncArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `heal` command
#[derive(Args)]
pub struct HealArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `audit` command
#[derive(Args)]
pub struct AuditArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Filter by app group (payment, order_status, marketing, support, uncategorized)
    #[arg(long, short)]
    pub group: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Template name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Template name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Body text with {{1}}, {{2}}, ... placeholders
    #[arg(long)]
    pub body: String,

    /// Provider category (utility, marketing, authentication)
    #[arg(long, default_value = "utility")]
    pub category: String,

    /// App group; inferred from the text when omitted
    #[arg(long)]
    pub group: Option<String>,

    /// Example value for a placeholder (repeat in order)
    #[arg(short, long = "example", value_name = "VALUE")]
    pub examples: Vec<String>,

    /// Language code
    #[arg(long, default_value = "en")]
    pub language: String,
}

/// Arguments for the `deploy` command
#[derive(Args)]
pub struct DeployArgs {
    /// Template name
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Template name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `required` command
#[derive(Args)]
pub struct RequiredArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_collects_examples_in_order() {
        let cli = Cli::try_parse_from([
            "tsync", "add", "gold_rate", "--body", "Rate {{1}} on {{2}}", "-e", "6450", "-e", "Monday",
        ])
        .unwrap();
        match cli.command {
            Commands::Add(args) => assert_eq!(args.examples, vec!["6450", "Monday"]),
            _ => panic!("expected add"),
        }
    }
}
