//! Application context for the tsync CLI.
//!
//! Bundles the parsed arguments with the lazily-read config file and builds
//! the reconciliation service on demand.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::unsync::OnceCell;

use tsync_core::compliance::RuleRewriter;
use tsync_core::remote::HttpTemplateProvider;
use tsync_core::store::JsonFileStore;
use tsync_core::ReconciliationService;

use crate::cli::Cli;
use crate::config::{read_config, ProviderSection, TsyncConfig};
use crate::errors::CliError;
use crate::ui::UiContext;

use super::resolver::{access_token_from_env, resolve_config_path, resolve_store_path};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<TsyncConfig>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// The config file, if one exists. Read once.
    pub fn config(&self) -> anyhow::Result<Option<&TsyncConfig>> {
        let config = self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            if !path.exists() {
                return Ok::<_, anyhow::Error>(None);
            }
            read_config(&path).map(Some)
        })?;
        Ok(config.as_ref())
    }

    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        resolve_store_path(self.cli, self.config()?)
    }

    pub fn ui_context(&self, json: bool, format: Option<&str>) -> UiContext {
        UiContext::from_env(json, format, self.cli.no_color, self.cli.ascii)
    }

    fn provider_section(&self) -> anyhow::Result<ProviderSection> {
        Ok(self
            .config()?
            .map(|config| config.provider.clone())
            .unwrap_or_default())
    }

    /// Fail early when a command needs the provider and it is not set up.
    pub fn require_provider(&self) -> anyhow::Result<()> {
        let provider = self.provider_section()?;
        if provider.account_id.trim().is_empty() {
            return Err(CliError::invalid_input_with_hint(
                "No provider account configured",
                "Set [provider] account_id in the config file (see `tsync init --account-id`)",
            )
            .into());
        }
        if access_token_from_env().is_none() && provider.access_token.is_none() {
            return Err(CliError::invalid_input_with_hint(
                "No provider access token",
                "Export TSYNC_ACCESS_TOKEN or set [provider] access_token",
            )
            .into());
        }
        Ok(())
    }

    /// Build the service over the resolved store and provider.
    ///
    /// Building never touches the network; commands that talk to the
    /// provider call [`AppContext::require_provider`] first.
    pub fn service(&self) -> anyhow::Result<ReconciliationService> {
        let store = JsonFileStore::new(self.store_path()?);
        let http = self.provider_section()?.http_config(access_token_from_env());
        let provider = HttpTemplateProvider::new(http)?;
        Ok(ReconciliationService::new(
            Box::new(store),
            Arc::new(provider),
            Arc::new(RuleRewriter::new()),
        ))
    }
}
