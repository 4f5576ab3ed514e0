use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tsync_core::remote::{HttpProviderConfig, DEFAULT_BASE_URL};

use crate::constants::APP_DIR;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TsyncConfig {
    pub store: StoreSection,
    #[serde(default)]
    pub provider: ProviderSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub account_id: String,
    /// Usually left out in favour of `TSYNC_ACCESS_TOKEN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            account_id: String::new(),
            access_token: None,
            request_timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

impl ProviderSection {
    /// Connection settings, with `token` taking precedence over the file.
    pub fn http_config(&self, token: Option<String>) -> HttpProviderConfig {
        let token = token
            .or_else(|| self.access_token.clone())
            .unwrap_or_default();
        HttpProviderConfig::new(self.account_id.clone(), token)
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_page_size(self.page_size)
    }
}

impl TsyncConfig {
    pub fn new(store_path: PathBuf, provider: ProviderSection) -> Self {
        Self {
            store: StoreSection {
                path: store_path.to_string_lossy().to_string(),
            },
            provider,
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("templates.json"))
}

pub fn read_config(path: &Path) -> anyhow::Result<TsyncConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

pub fn write_config(path: &Path, config: &TsyncConfig) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(config).context("rendering config as TOML")?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    std::fs::write(path, rendered).with_context(|| format!("writing config {}", path.display()))
}

/// Expand a leading `~/` against `$HOME`.
pub fn expand_home(path: &str) -> anyhow::Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => Ok(home_dir()?.join(rest)),
        None => Ok(PathBuf::from(path)),
    }
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}

/// `$var/tsync`, or `$HOME/<fallback...>/tsync` when the variable is unset or blank.
fn xdg_dir(var: &str, fallback: &[&str]) -> anyhow::Result<PathBuf> {
    let root = match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => fallback.iter().fold(home_dir()?, |dir, part| dir.join(part)),
    };
    Ok(root.join(APP_DIR))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .context("HOME is not set, so default paths cannot be resolved")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_provider_defaults() {
        let config: TsyncConfig = toml::from_str("[store]\npath = \"/tmp/t.json\"\n").unwrap();
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider.request_timeout_secs, 30);
        assert_eq!(config.provider.page_size, 100);
        assert!(config.provider.access_token.is_none());
    }

    #[test]
    fn test_written_config_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let provider = ProviderSection {
            account_id: "1234".to_string(),
            ..ProviderSection::default()
        };
        write_config(&path, &TsyncConfig::new(dir.path().join("t.json"), provider)).unwrap();

        let config = read_config(&path).unwrap();
        assert_eq!(config.provider.account_id, "1234");
        assert!(config.store.path.ends_with("t.json"));
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("access_token"));
    }

    #[test]
    fn test_env_token_wins_over_file() {
        let provider = ProviderSection {
            access_token: Some("from-file".to_string()),
            ..ProviderSection::default()
        };
        assert_eq!(provider.http_config(Some("from-env".into())).access_token, "from-env");
        assert_eq!(provider.http_config(None).access_token, "from-file");
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/var/t.json").unwrap(), PathBuf::from("/var/t.json"));
    }
}
