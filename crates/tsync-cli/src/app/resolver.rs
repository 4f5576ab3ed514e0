//! Path and credential resolution.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, expand_home, TsyncConfig};
use crate::constants::{ACCESS_TOKEN_ENV, CONFIG_ENV};
use crate::errors::CliError;

/// Resolve the config file path, checking `TSYNC_CONFIG` first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Some(value) = non_empty_env(CONFIG_ENV) {
        return Ok(PathBuf::from(value));
    }
    default_config_path()
}

/// Resolve the store path from `--store`/`TSYNC_STORE`, then the config file.
pub fn resolve_store_path(cli: &Cli, config: Option<&TsyncConfig>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.store.as_deref() {
        return expand_home(path);
    }
    match config {
        Some(config) => expand_home(&config.store.path),
        None => {
            let config_path = resolve_config_path()?;
            Err(CliError::not_found(
                missing_config_message(&config_path),
                "Run `tsync init`, or pass --store /path/to/templates.json",
            )
            .into())
        }
    }
}

/// Provider access token from the environment, if set.
pub fn access_token_from_env() -> Option<String> {
    non_empty_env(ACCESS_TOKEN_ENV)
}

pub fn missing_config_message(config_path: &Path) -> String {
    format!("No tsync config found at {}", config_path.display())
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
