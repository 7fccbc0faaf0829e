use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use streams_core::ControllerConfig;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CliConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_size_lookup_concurrency")]
    pub size_lookup_concurrency: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub org_admin: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

fn default_api_url() -> String {
    "https://api.openshift.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_per_page() -> u32 {
    10
}

fn default_size_lookup_concurrency() -> usize {
    4
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: default_timeout(),
            format: default_format(),
            poll_interval_ms: default_poll_interval_ms(),
            per_page: default_per_page(),
            size_lookup_concurrency: default_size_lookup_concurrency(),
            username: None,
            org_admin: false,
        }
    }
}

impl CliConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read the config at `path`, writing the defaults there if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .context(format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .context(format!("Failed to parse config file: {}", path.display()))
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create config directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .context(format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            per_page: self.per_page,
            size_lookup_concurrency: self.size_lookup_concurrency,
        }
    }

    fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(".streams-console").join("config.toml"))
    }
}
