//! State-file location and optional config file

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// `~/.pairswap/config.toml`, all fields optional
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub state_path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct Config {
    pub state_path: PathBuf,
}

impl Config {
    /// Precedence: `--state` flag, then the config file, then
    /// `~/.pairswap/state.json`.
    pub fn resolve(state_flag: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = state_flag {
            return Ok(Self { state_path: path });
        }
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        let base = PathBuf::from(home).join(".pairswap");

        let config_path = base.join("config.toml");
        let file_config = if config_path.exists() {
            let raw = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str::<FileConfig>(&raw)
                .with_context(|| format!("failed to parse {}", config_path.display()))?
        } else {
            FileConfig::default()
        };

        Ok(Self {
            state_path: file_config
                .state_path
                .unwrap_or_else(|| base.join("state.json")),
        })
    }
}
