//! HTTP caching middleware

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

fn cache_control_value(max_age_sec: usize) -> HeaderValue {
    if max_age_sec == 0 {
        HeaderValue::from_static("no-store")
    } else {
        HeaderValue::from_str(&format!("max-age={}", max_age_sec))
            .unwrap_or_else(|_| HeaderValue::from_static("no-store"))
    }
}

/// Sets `Cache-Control` on successful responses that did not set one already.
pub async fn http_cache(
    State(max_age_sec): State<usize>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await.into_response();

    if response.status().is_success() && !response.headers().contains_key(header::CACHE_CONTROL) {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, cache_control_value(max_age_sec));
    } else if !response.status().is_success() {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }

    response
}
