//! Exchange snapshot persistence

use anyhow::{Context, Result};
use pair_engine::{Exchange, ExchangeSnapshot};
use std::path::Path;

/// A missing file is an empty exchange; a corrupt one is an error.
pub fn load(path: &Path) -> Result<Exchange> {
    if !path.exists() {
        return Ok(Exchange::new());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read state file {}", path.display()))?;
    let snapshot: ExchangeSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse state file {}", path.display()))?;
    snapshot
        .restore()
        .with_context(|| format!("invalid state file {}", path.display()))
}

pub fn save(path: &Path, exchange: &Exchange) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&ExchangeSnapshot::capture(exchange))?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write state file {}", path.display()))?;
    Ok(())
}
