mod file_config;

pub use file_config::{CacheFileConfig, FileConfig};

use crate::cache::{CacheSettings, CacheTtls};
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub upstream_url: String,
    pub upstream_timeout_sec: u64,
    pub cache_ttl_sec: u64,
    pub static_dir: Option<PathBuf>,
    pub warm_up: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::Path,
            content_cache_age_sec: 60,
            upstream_url: crate::upstream::DEFAULT_UPSTREAM_URL.to_string(),
            upstream_timeout_sec: 10,
            cache_ttl_sec: 3600,
            static_dir: None,
            warm_up: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub upstream_url: String,
    pub upstream_timeout_sec: u64,
    pub static_dir: Option<PathBuf>,
    pub warm_up: bool,
    pub cache: CacheSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port == metrics_port && port != 0 {
            bail!("port and metrics_port must differ, both are {}", port);
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);

        let upstream_url = file
            .upstream_url
            .unwrap_or_else(|| cli.upstream_url.clone());
        if !(upstream_url.starts_with("http://") || upstream_url.starts_with("https://")) {
            bail!("upstream_url must be an http(s) url: {}", upstream_url);
        }

        let upstream_timeout_sec = file
            .upstream_timeout_sec
            .unwrap_or(cli.upstream_timeout_sec);
        if upstream_timeout_sec == 0 {
            bail!("upstream_timeout_sec must be greater than zero");
        }

        let static_dir = file
            .static_dir
            .map(PathBuf::from)
            .or_else(|| cli.static_dir.clone());
        if let Some(dir) = &static_dir {
            if !dir.exists() {
                bail!("Static directory does not exist: {:?}", dir);
            }
            if !dir.is_dir() {
                bail!("static_dir is not a directory: {:?}", dir);
            }
        }

        let warm_up = file.warm_up.unwrap_or(cli.warm_up);

        // Cache settings - [cache] section over --cache-ttl-sec
        let cache_file = file.cache.unwrap_or_default();
        let default_ttl = cache_file.ttl_sec.unwrap_or(cli.cache_ttl_sec);
        let ttl = |kind_ttl: Option<u64>| Duration::from_secs(kind_ttl.unwrap_or(default_ttl));
        let cache = CacheSettings {
            ttls: CacheTtls {
                artists: ttl(cache_file.artists_ttl_sec),
                locations: ttl(cache_file.locations_ttl_sec),
                dates: ttl(cache_file.dates_ttl_sec),
                relations: ttl(cache_file.relations_ttl_sec),
            },
            fetch_timeout: Duration::from_secs(
                cache_file
                    .fetch_timeout_sec
                    .unwrap_or(upstream_timeout_sec + 5),
            ),
        };
        if cache.fetch_timeout.is_zero() {
            bail!("cache.fetch_timeout_sec must be greater than zero");
        }

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            content_cache_age_sec,
            upstream_url,
            upstream_timeout_sec,
            static_dir,
            warm_up,
            cache,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
