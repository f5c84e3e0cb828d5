use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use groupie_tracker_server::cache::TourCache;
use groupie_tracker_server::config::{self, AppConfig, FileConfig};
use groupie_tracker_server::server::{metrics, run_server, RequestsLoggingLevel, ServerConfig};
use groupie_tracker_server::upstream::{UpstreamClient, DEFAULT_UPSTREAM_URL};
use groupie_tracker_server::GIT_HASH;

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// `max-age` in seconds sent with pages and API responses, 0 disables it.
    #[clap(long, default_value_t = 60)]
    pub content_cache_age_sec: usize,

    /// Base URL of the tour dataset API.
    #[clap(long, default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Timeout in seconds for each upstream request.
    #[clap(long, default_value_t = 10)]
    pub upstream_timeout_sec: u64,

    /// Time-to-live in seconds of every cached collection.
    #[clap(long, default_value_t = 3600)]
    pub cache_ttl_sec: u64,

    /// Directory served under /static.
    #[clap(long, value_parser = parse_path)]
    pub static_dir: Option<PathBuf>,

    /// Skip fetching the whole dataset at startup.
    #[clap(long)]
    pub no_warm_up: bool,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            content_cache_age_sec: args.content_cache_age_sec,
            upstream_url: args.upstream_url.clone(),
            upstream_timeout_sec: args.upstream_timeout_sec,
            cache_ttl_sec: args.cache_ttl_sec,
            static_dir: args.static_dir.clone(),
            warm_up: !args.no_warm_up,
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, initiating graceful shutdown");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&(&cli_args).into(), file_config)?;
    info!("Starting groupie-tracker-server ({})", GIT_HASH);

    info!("Initializing metrics...");
    metrics::init_metrics();

    let upstream = UpstreamClient::new(
        app_config.upstream_url.clone(),
        app_config.upstream_timeout_sec,
    )
    .context("Failed to create upstream client")?;
    info!("Mirroring {}", app_config.upstream_url);

    let cache = Arc::new(TourCache::new(Arc::new(upstream), app_config.cache.clone()));
    if app_config.warm_up {
        cache.warm_up().await;
    }

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        metrics_port: app_config.metrics_port,
        content_cache_age_sec: app_config.content_cache_age_sec,
        static_dir: app_config.static_dir.clone(),
    };

    run_server(server_config, cache, shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}
