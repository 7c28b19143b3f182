use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::nomad::DEFAULT_LOG_TAIL_BYTES;

pub const DEFAULT_ADDRESS: &str = "http://localhost:4646";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "NOMADTUI_CONFIG";

/// Root configuration file structure
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Base URL of the Nomad HTTP API
    #[serde(default = "default_address")]
    pub address: String,

    /// ACL token sent with every request
    #[serde(default)]
    pub token: Option<String>,

    /// Where diagnostic logs are written (the terminal belongs to the UI)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// How many bytes from the end of a task log to fetch
    #[serde(default = "default_log_tail_bytes")]
    pub log_tail_bytes: u64,
}

fn default_address() -> String {
    DEFAULT_ADDRESS.into()
}

fn default_log_tail_bytes() -> u64 {
    DEFAULT_LOG_TAIL_BYTES
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            token: None,
            log_file: None,
            log_tail_bytes: DEFAULT_LOG_TAIL_BYTES,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid address '{address}': must start with http:// or https://")]
    InvalidAddress { address: String },
    #[error("no config file found, searched: {searched:?}")]
    NotFound { searched: Vec<PathBuf> },
}

impl ViewerConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load configuration from a string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config: ViewerConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Search for a config file: `$NOMADTUI_CONFIG`, then the standard names in
    /// `start_dir` and each of its parents.
    pub fn discover(start_dir: &Path) -> Result<(PathBuf, Self), ConfigError> {
        let names = [
            "nomadtui.yaml",
            "nomadtui.yml",
            ".nomadtui.yaml",
            ".nomadtui.yml",
        ];
        let mut searched = Vec::new();

        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                return Ok((path.clone(), Self::load(&path)?));
            }
            searched.push(path);
        }

        let mut dir = Some(start_dir);
        while let Some(current) = dir {
            for name in &names {
                let path = current.join(name);
                if path.exists() {
                    return Ok((path.clone(), Self::load(&path)?));
                }
                searched.push(path);
            }
            dir = current.parent();
        }

        Err(ConfigError::NotFound { searched })
    }

    /// Checks the address and strips any trailing slash from it.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let address = self.address.trim().trim_end_matches('/');
        let host = address
            .strip_prefix("http://")
            .or_else(|| address.strip_prefix("https://"));
        if host.is_none_or(str::is_empty) {
            return Err(ConfigError::InvalidAddress {
                address: self.address.clone(),
            });
        }
        self.address = address.to_string();
        Ok(())
    }

    /// The token, if one is set and non-blank.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}
