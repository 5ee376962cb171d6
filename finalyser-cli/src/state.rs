use anyhow::{Context, Result};
use finalyser_core::{FinancialSnapshot, FinancialStore};
use std::fs;
use std::path::{Path, PathBuf};

pub fn finalyser_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".finalyser"))
}

pub fn ensure_finalyser_home() -> Result<PathBuf> {
    let dir = finalyser_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Read a fixture with the same shape as the proxy's `financialData`
pub fn read_snapshot(path: &Path) -> Result<FinancialSnapshot> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// Store for a new session: the fixture when given, otherwise the sample records
pub fn load_store(data: Option<&Path>) -> Result<FinancialStore> {
    match data {
        Some(path) => {
            let snapshot = read_snapshot(path)?;
            tracing::info!(path = %path.display(), "loaded fixture");
            Ok(FinancialStore::from_snapshot(snapshot))
        }
        None => Ok(FinancialStore::seeded()),
    }
}
