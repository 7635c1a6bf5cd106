//! Configuration management for storefront

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `api.base_url`
pub const BASE_URL_ENV: &str = "STOREFRONT_BASE_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub cart: CartConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Category assigned to new products when none is given
    pub default_category_id: u64,
    /// How long catalog reads stay cached
    pub cache_ttl_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.escuelajs.co/api/v1/".to_string(),
            timeout_secs: 15,
            default_category_id: 36,
            cache_ttl_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CartConfig {
    pub placeholder_image: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            placeholder_image: crate::cart::PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency_symbol: String,
    /// Descriptions longer than this are cut in list views
    pub description_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            description_width: 60,
        }
    }
}

impl DisplayConfig {
    pub fn price(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}

impl Config {
    /// Load configuration from default location or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from disk, then apply the environment and an optional CLI override
    pub fn resolve(base_url_override: Option<&str>) -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env(std::env::var(BASE_URL_ENV).ok());
        if let Some(base_url) = base_url_override {
            config.api.base_url = base_url.to_string();
        }
        Ok(config)
    }

    fn apply_env(&mut self, base_url: Option<String>) {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            tracing::debug!(%base_url, "base URL taken from {}", BASE_URL_ENV);
            self.api.base_url = base_url;
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "storefront") {
            let config_dir = proj_dirs.config_dir();
            std::fs::create_dir_all(config_dir)?;
            Ok(config_dir.join("config.toml"))
        } else {
            Ok(PathBuf::from("config.toml"))
        }
    }

    /// Save configuration to default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
