use super::RequestsLoggingLevel;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: u16,
    /// `max-age` of cacheable responses, 0 disables client caching.
    pub content_cache_age_sec: usize,
    /// Directory served under `/static`, if any.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8080,
            metrics_port: 9091,
            content_cache_age_sec: 60,
            static_dir: None,
        }
    }
}
