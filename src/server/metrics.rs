use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all server metrics
const PREFIX: &str = "groupie";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Cache Metrics
    pub static ref CACHE_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_cache_lookups_total"), "Cache lookups by kind, scope and outcome"),
        &["kind", "scope", "outcome"]
    ).expect("Failed to create cache_lookups_total metric");

    pub static ref CACHE_RECORDS: GaugeVec = GaugeVec::new(
        Opts::new(format!("{PREFIX}_cache_records"), "Records currently cached per kind"),
        &["kind"]
    ).expect("Failed to create cache_records metric");

    // Upstream Metrics
    pub static ref UPSTREAM_FETCHES_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_upstream_fetches_total"), "Upstream fetches by kind, scope and result"),
        &["kind", "scope", "result"]
    ).expect("Failed to create upstream_fetches_total metric");

    pub static ref UPSTREAM_FETCH_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_upstream_fetch_duration_seconds"),
            "Upstream fetch duration in seconds"
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["kind", "scope"]
    ).expect("Failed to create upstream_fetch_duration_seconds metric");

    // Error Metrics
    pub static ref ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_errors_total"), "Total errors by type and endpoint"),
        &["error_type", "endpoint"]
    ).expect("Failed to create errors_total metric");

    pub static ref PROCESS_MEMORY_BYTES: Gauge = Gauge::new(
        format!("{PREFIX}_process_memory_bytes"),
        "Process memory usage in bytes"
    ).expect("Failed to create process_memory_bytes metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(CACHE_LOOKUPS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CACHE_RECORDS.clone()));
    let _ = REGISTRY.register(Box::new(UPSTREAM_FETCHES_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(UPSTREAM_FETCH_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(ERRORS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(PROCESS_MEMORY_BYTES.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Collapses a request path into its route, keeping label cardinality bounded.
pub fn route_label(path: &str) -> &'static str {
    match path {
        "/" => "/",
        "/concerts" => "/concerts",
        "/api/artists" => "/api/artists",
        "/api/search" => "/api/search",
        "/api/refresh-cache" => "/api/refresh-cache",
        "/api/cache/status" => "/api/cache/status",
        p if p.starts_with("/artist/") => "/artist/{id}",
        p if p.starts_with("/static/") => "/static",
        _ => "other",
    }
}

/// Record a cache lookup, `outcome` is "hit" or "miss"
pub fn record_cache_lookup(kind: &str, scope: &str, outcome: &str) {
    CACHE_LOOKUPS_TOTAL
        .with_label_values(&[kind, scope, outcome])
        .inc();
}

pub fn set_cache_records(kind: &str, count: usize) {
    CACHE_RECORDS.with_label_values(&[kind]).set(count as f64);
}

/// Record an upstream fetch and how long it took
pub fn record_upstream_fetch(kind: &str, scope: &str, result: &str, duration: Duration) {
    UPSTREAM_FETCHES_TOTAL
        .with_label_values(&[kind, scope, result])
        .inc();

    UPSTREAM_FETCH_DURATION_SECONDS
        .with_label_values(&[kind, scope])
        .observe(duration.as_secs_f64());
}

/// Record an error
pub fn record_error(error_type: &str, endpoint: &str) {
    ERRORS_TOTAL
        .with_label_values(&[error_type, endpoint])
        .inc();
}

/// Update process memory usage
pub fn update_memory_usage() {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            for line in status.lines() {
                if line.starts_with("VmRSS:") {
                    // RSS is reported in kB
                    if let Some(kb) = line
                        .split_whitespace()
                        .nth(1)
                        .and_then(|kb| kb.parse::<f64>().ok())
                    {
                        PROCESS_MEMORY_BYTES.set(kb * 1024.0);
                        return;
                    }
                }
            }
        }
    }
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    update_memory_usage();

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
