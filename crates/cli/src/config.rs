use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

#[cfg(windows)]
pub fn config_dir() -> PathBuf {
    std::env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("sinktracer")
}

#[cfg(not(windows))]
pub fn config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".config")
        .join("sinktracer")
}

fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

fn default_catalog() -> PathBuf {
    PathBuf::from("rules/rules.json")
}

#[derive(Serialize, Deserialize)]
pub struct RuleConfig {
    /// Catalog used when `--rules` is not given. Relative paths are
    /// resolved against the configuration directory.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
        }
    }
}

#[derive(Serialize, Deserialize, Default)]
pub struct CacheConfig {
    /// Directory for parsed units; no disk cache when unset.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub rules: RuleConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Configured catalog. The built-in default stays relative to the
    /// working directory; configured relative paths hang off the config dir.
    pub fn catalog_path(&self) -> PathBuf {
        if self.rules.catalog == default_catalog() || self.rules.catalog.is_absolute() {
            self.rules.catalog.clone()
        } else {
            config_dir().join(&self.rules.catalog)
        }
    }
}

pub fn load_config() -> Result<Config> {
    let path = config_file_path();
    if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).context("failed to parse config")
    } else {
        Ok(Config::default())
    }
}
