//! Random slowdown middleware, handy to watch the pages while upstream is slow.

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use rand_distr::{Distribution, Normal};
use std::time::Duration;

const MEAN_MS: f64 = 1000.0;
const STD_DEV_MS: f64 = 500.0;

fn sample_delay() -> Duration {
    let millis = Normal::new(MEAN_MS, STD_DEV_MS)
        .map(|normal| normal.sample(&mut rand::rng()))
        .unwrap_or(MEAN_MS);
    Duration::from_millis(millis.max(0.0) as u64)
}

/// Delays each request by a normally distributed amount of time.
pub async fn slowdown_request(request: Request<Body>, next: Next) -> Response {
    tokio::time::sleep(sample_delay()).await;
    next.run(request).await
}
