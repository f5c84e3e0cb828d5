use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use crate::cache::TourCache;

use super::ServerConfig;

pub type GuardedTourCache = Arc<TourCache>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub cache: GuardedTourCache,
}

impl ServerState {
    pub fn new(config: ServerConfig, cache: GuardedTourCache) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            cache,
        }
    }
}

impl FromRef<ServerState> for GuardedTourCache {
    fn from_ref(input: &ServerState) -> Self {
        input.cache.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
