//! CLI configuration file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use vsys_core::ChainId;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "vsys.json";

/// Settings read from `vsys.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Network the derived addresses belong to.
    pub chain: ChainId,
    /// Default account nonce.
    pub nonce: u64,
    /// Log level: error, warn, info, debug or trace.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain: ChainId::TESTNET,
            nonce: 0,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Read `path` if given, else `./vsys.json` if it exists, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Configured log level, raised by each `-v`.
    pub fn level(&self, verbose: u8) -> Result<Level> {
        let base: Level = self
            .log_level
            .parse()
            .with_context(|| format!("Invalid log level: {}", self.log_level))?;
        Ok(match verbose {
            0 => base,
            1 => base.max(Level::DEBUG),
            _ => Level::TRACE,
        })
    }
}
