use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// State root, `~/.magam` unless `MAGAM_HOME` overrides it.
pub fn magam_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("MAGAM_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".magam"))
}

pub fn ensure_magam_home() -> Result<PathBuf> {
    let dir = magam_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn events_path() -> Result<PathBuf> {
    Ok(ensure_magam_home()?.join("events.json"))
}

pub fn checklists_path() -> Result<PathBuf> {
    Ok(ensure_magam_home()?.join("checklists.json"))
}
