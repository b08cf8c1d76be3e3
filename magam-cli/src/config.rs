use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_magam_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmSection,
    pub calendar: CalendarSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    /// Per-request timeout; each analyze call gets one retry on top.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarSection {
    /// IANA timezone the wall-clock deadlines are interpreted in.
    pub timezone: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmSection {
                provider: "openai".to_string(),
                model: "gpt-4o-mini".to_string(),
                base_url: "https://api.openai.com".to_string(),
                temperature: 0.7,
                timeout_secs: 30,
            },
            calendar: CalendarSection {
                timezone: "Asia/Seoul".to_string(),
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_magam_home()?.join("config.toml"))
}

/// Load `config.toml`, writing the defaults on first miss so the file is
/// there to edit.
pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        let cfg = Config::default();
        save_config(&cfg)?;
        tracing::info!("wrote default config to {}", p.display());
        return Ok(cfg);
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}
