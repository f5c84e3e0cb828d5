use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub content_cache_age_sec: Option<usize>,
    pub upstream_url: Option<String>,
    pub upstream_timeout_sec: Option<u64>,
    pub static_dir: Option<String>,
    pub warm_up: Option<bool>,

    pub cache: Option<CacheFileConfig>,
}

/// The `[cache]` section. Per-kind TTLs fall back to `ttl_sec`.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CacheFileConfig {
    pub ttl_sec: Option<u64>,
    pub artists_ttl_sec: Option<u64>,
    pub locations_ttl_sec: Option<u64>,
    pub dates_ttl_sec: Option<u64>,
    pub relations_ttl_sec: Option<u64>,
    pub fetch_timeout_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
