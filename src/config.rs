//! TOML configuration.
//!
//! Every section and field is optional; a missing file is equivalent to
//! [`Config::minimal`]. Two environment variables take precedence over the
//! file: `COMPOSTER_BASE_URL` (vault URL) and `COMPOSTER_TOKEN` (bearer token).
//!
//! ```toml
//! [vault]
//! url = "https://composter.vercel.app/api"
//! timeout_secs = 30
//!
//! [crawl]
//! alias_prefix = "@/"
//! alias_dir = "src"
//! extensions = [".tsx", ".ts", ".jsx", ".js", ".css"]
//! ```

use anyhow::{Context, Result};
use composter_core::crawl::CrawlOptions;
use composter_core::manifest::MANIFEST_FILE;
use composter_core::resolve::{DEFAULT_ALIAS_DIR, DEFAULT_ALIAS_PREFIX, DEFAULT_EXTENSIONS};
use composter_core::vpath::DEFAULT_EXTERNAL_PREFIX;
use serde::Deserialize;
use std::path::Path;

pub const ENV_BASE_URL: &str = "COMPOSTER_BASE_URL";
pub const ENV_TOKEN: &str = "COMPOSTER_TOKEN";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VaultConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_url() -> String {
    "https://composter.vercel.app/api".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct CrawlConfig {
    #[serde(default = "default_alias_prefix")]
    pub alias_prefix: String,
    #[serde(default = "default_alias_dir")]
    pub alias_dir: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
    #[serde(default = "default_external_prefix")]
    pub external_prefix: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            alias_prefix: default_alias_prefix(),
            alias_dir: default_alias_dir(),
            extensions: default_extensions(),
            manifest_file: default_manifest_file(),
            external_prefix: default_external_prefix(),
        }
    }
}

fn default_alias_prefix() -> String {
    DEFAULT_ALIAS_PREFIX.to_string()
}
fn default_alias_dir() -> String {
    DEFAULT_ALIAS_DIR.to_string()
}
fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}
fn default_manifest_file() -> String {
    MANIFEST_FILE.to_string()
}
fn default_external_prefix() -> String {
    DEFAULT_EXTERNAL_PREFIX.to_string()
}

impl CrawlConfig {
    pub fn to_options(&self) -> CrawlOptions {
        CrawlOptions {
            manifest_file: self.manifest_file.clone(),
            alias_prefix: self.alias_prefix.clone(),
            alias_dir: self.alias_dir.clone(),
            extensions: self.extensions.clone(),
            external_prefix: self.external_prefix.clone(),
        }
    }
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.vault.url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.vault.token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.vault.url.trim().is_empty() {
            anyhow::bail!("vault.url must not be empty");
        }
        if self.vault.timeout_secs == 0 {
            anyhow::bail!("vault.timeout_secs must be > 0");
        }
        if self.crawl.alias_prefix.is_empty() {
            anyhow::bail!("crawl.alias_prefix must not be empty");
        }
        if self.crawl.extensions.is_empty() {
            anyhow::bail!("crawl.extensions must list at least one extension");
        }
        if let Some(bad) = self.crawl.extensions.iter().find(|e| !e.starts_with('.')) {
            anyhow::bail!("crawl.extensions entry '{}' must start with '.'", bad);
        }
        if self.crawl.manifest_file.trim().is_empty() {
            anyhow::bail!("crawl.manifest_file must not be empty");
        }
        if self.crawl.external_prefix.trim().is_empty() || self.crawl.external_prefix.contains('/')
        {
            anyhow::bail!("crawl.external_prefix must be a single non-empty path segment");
        }
        Ok(())
    }
}

/// Parse and validate a config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
/// Environment overrides are applied in both cases.
pub fn load_or_minimal(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        load_config(path)?
    } else {
        Config::minimal()
    };
    config.apply_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}
