use anyhow::{Context, Result};
use std::future::Future;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tracing::{error, info};

#[cfg(feature = "slowdown")]
use super::slowdown_request;
use super::{
    http_cache, log_requests, make_search_routes, metrics, pages, security_headers, state::*,
    ServerConfig,
};
use crate::cache::CacheStatus;
use crate::upstream::UpstreamError;

#[derive(Serialize)]
struct StatusResponse {
    uptime: String,
    hash: &'static str,
    #[serde(flatten)]
    cache: CacheStatus,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Maps a cache error to a JSON API response.
pub(super) fn api_error_response(endpoint: &str, err: &UpstreamError) -> Response {
    let (status, error_type) = match err {
        UpstreamError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
        UpstreamError::Unavailable(_) => (StatusCode::BAD_GATEWAY, "upstream_unavailable"),
        UpstreamError::BadResponse(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "upstream_bad_response")
        }
    };
    metrics::record_error(error_type, endpoint);
    (status, err.to_string()).into_response()
}

async fn get_artists(State(cache): State<GuardedTourCache>) -> Response {
    match cache.get_artists().await {
        Ok(artists) => Json(artists).into_response(),
        Err(err) => api_error_response("artists", &err),
    }
}

async fn refresh_cache(State(cache): State<GuardedTourCache>) -> Response {
    match cache.refresh_all().await {
        Ok(()) => (StatusCode::OK, "Cache refreshed").into_response(),
        Err(err) => {
            error!("Cache refresh failed: {}", err);
            metrics::record_error("refresh_failed", "refresh-cache");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to refresh cache").into_response()
        }
    }
}

async fn cache_status(State(state): State<ServerState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: crate::GIT_HASH,
        cache: state.cache.status(),
    })
}

pub fn make_app(config: ServerConfig, cache: GuardedTourCache) -> Router {
    let state = ServerState::new(config.clone(), cache);

    let content_routes: Router = Router::new()
        .route("/", get(pages::index))
        .route("/artist/{id}", get(pages::artist_page))
        .route("/concerts", get(pages::concerts))
        .route("/api/artists", get(get_artists))
        .with_state(state.clone())
        .merge(make_search_routes(state.clone()))
        .layer(middleware::from_fn_with_state(
            config.content_cache_age_sec,
            http_cache,
        ));

    let cache_routes: Router = Router::new()
        .route("/api/refresh-cache", post(refresh_cache))
        .route("/api/cache/status", get(cache_status))
        .with_state(state.clone());

    let mut app: Router = content_routes.merge(cache_routes);

    if let Some(static_dir) = &config.static_dir {
        let static_files_service =
            ServeDir::new(static_dir).append_index_html_on_directories(false);
        app = app.nest_service("/static", static_files_service);
    }

    app = app
        .fallback(pages::not_found)
        .layer(CatchPanicLayer::new());

    #[cfg(feature = "slowdown")]
    {
        app = app.layer(middleware::from_fn(slowdown_request));
    }
    app = app.layer(middleware::from_fn(security_headers));
    app = app.layer(middleware::from_fn_with_state(state, log_requests));

    app
}

fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics::metrics_handler))
}

/// Serves the app and the metrics endpoint until `shutdown` resolves.
pub async fn run_server<F>(config: ServerConfig, cache: GuardedTourCache, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let port = config.port;
    let metrics_port = config.metrics_port;
    let app = make_app(config, cache);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(("0.0.0.0", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(metrics_listener, make_metrics_app()).await {
            error!("Metrics server stopped: {}", e);
        }
    });

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}
