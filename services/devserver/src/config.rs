//! Devserver configuration
//!
//! Config precedence: CLI args > env vars > config file > defaults.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Controls the `Secure` flag on the login cookie
    #[serde(default)]
    pub production: bool,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

fn default_max_connections() -> usize {
    256
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        if config.max_connections == 0 {
            return Err(common::Error::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or FABDASH_DEVSERVER_CONFIG
    /// env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("FABDASH_DEVSERVER_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("fabdash-devserver.toml")
    }
}
