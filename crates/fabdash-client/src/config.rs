//! Client configuration and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! `timeout_secs` bounds every network call the client makes — the source
//! behavior of unbounded requests is deliberately not carried over.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Client configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the REST backend, e.g. `https://api.example.com`
    pub base_url: String,
    /// Default timeout applied to every request
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Path of the durable session file
    pub session_file: PathBuf,
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment
    /// variables (`FABDASH_BASE_URL`).
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if let Ok(url) = std::env::var("FABDASH_BASE_URL")
            && !url.trim().is_empty()
        {
            config.base_url = url.trim().to_owned();
        }

        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                config.base_url
            )));
        }

        if config.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or FABDASH_CONFIG env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("FABDASH_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("fabdash.toml")
    }
}
