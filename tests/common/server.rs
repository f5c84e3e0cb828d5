//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own cache and its own mocked
//! upstream.

use super::constants::*;
use super::fixtures::mount_upstream;
use groupie_tracker_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use groupie_tracker_server::{CacheSettings, TourCache, UpstreamClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use wiremock::MockServer;

/// Test server instance backed by a wiremock upstream
///
/// When dropped, the server gracefully shuts down and the mock upstream stops.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// The mocked tour dataset, for asserting on received requests
    pub upstream: MockServer,

    /// Cache shared with the running server
    pub cache: Arc<TourCache>,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server whose upstream serves the full fixture dataset.
    pub async fn spawn() -> Self {
        let upstream = MockServer::start().await;
        mount_upstream(&upstream).await;
        Self::spawn_with_upstream(upstream, CacheSettings::default()).await
    }

    /// Spawns a server on a random port against an already configured upstream.
    ///
    /// # Panics
    ///
    /// Panics if port binding fails or the server doesn't become ready within
    /// the timeout.
    pub async fn spawn_with_upstream(upstream: MockServer, settings: CacheSettings) -> Self {
        let api_url = format!("{}{}", upstream.uri(), UPSTREAM_API_PATH);
        let client = UpstreamClient::new(api_url, UPSTREAM_TIMEOUT_SECS)
            .expect("Failed to build upstream client");
        let cache = Arc::new(TourCache::new(Arc::new(client), settings));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
            metrics_port: 0,
            content_cache_age_sec: 60,
            static_dir: None,
        };
        let app = make_app(config, cache.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            upstream,
            cache,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Number of requests the upstream received for `path` (below the api prefix).
    pub async fn upstream_hits(&self, endpoint: &str) -> usize {
        let full_path = format!("{}{}", UPSTREAM_API_PATH, endpoint);
        self.upstream
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == full_path)
            .count()
    }

    /// Waits for the server to become ready by polling the cache status
    /// endpoint, which never reaches the upstream.
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client
                .get(format!("{}/api/cache/status", self.base_url))
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
