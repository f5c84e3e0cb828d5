//! Request logging middleware

use super::super::state::ServerState;
use crate::server::metrics::{record_http_request, route_label};
use axum::extract::State;
use axum::{
    body::Body,
    http::{header::HeaderMap, Request, Response, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use std::time::Instant;
use tracing::{error, info};

#[derive(PartialEq, PartialOrd, Clone, Debug, Default, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    #[default]
    Path,
    Headers,
    Body,
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

enum ContentLengthParseResult {
    Ok(usize),
    No(&'static str),
}

fn parse_content_length(headers: &HeaderMap) -> ContentLengthParseResult {
    let value = match headers.get("content-length") {
        Some(x) => x,
        None => return ContentLengthParseResult::No("Content-length not set."),
    };

    let str_value = match value.to_str() {
        Ok(x) => x,
        Err(_) => {
            return ContentLengthParseResult::No("Could not get Content-length string value.")
        }
    };

    match str_value.parse::<usize>() {
        Ok(x) => ContentLengthParseResult::Ok(x),
        Err(_) => ContentLengthParseResult::No("Could not parse Content-length numeric value."),
    }
}

fn internal_error() -> Response<Body> {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

fn log_headers(title: &str, headers: &HeaderMap) {
    info!("  {}:", title);
    for header in headers.iter() {
        info!("    {:?}: {:?}", header.0, header.1);
    }
}

pub async fn log_requests(
    State(state): State<ServerState>,
    mut request: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    let level = state.config.requests_logging_level.clone();

    let start = Instant::now();

    let method = request.method().to_string();
    let uri = request.uri().to_string();
    let route = route_label(request.uri().path());

    if level > RequestsLoggingLevel::None {
        info!(">>> {} {}", method, uri);
    }

    if level >= RequestsLoggingLevel::Headers {
        log_headers("Req Headers", request.headers());
    }

    if level >= RequestsLoggingLevel::Body {
        match parse_content_length(request.headers()) {
            ContentLengthParseResult::No(reason) => info!("  Req Body: {}", reason),
            ContentLengthParseResult::Ok(size) if size < MAX_LOGGABLE_BODY_LENGTH => {
                let (parts, body) = request.into_parts();
                let bytes = match axum::body::to_bytes(body, size).await {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        error!("Failed to read request body: {:?}", err);
                        return internal_error();
                    }
                };
                info!("  Req Body:\n{}", String::from_utf8_lossy(&bytes));
                request = Request::from_parts(parts, Body::from(bytes))
            }
            ContentLengthParseResult::Ok(size) => info!(
                "  Req Body: Too big to log ({:#})",
                byte_unit::Byte::from(size)
            ),
        }
    }

    let mut response = next.run(request).await;

    if level >= RequestsLoggingLevel::Headers {
        log_headers("Resp Headers", response.headers());
    }

    if level >= RequestsLoggingLevel::Body {
        match parse_content_length(response.headers()) {
            ContentLengthParseResult::No(reason) => info!("  Resp Body: {}", reason),
            ContentLengthParseResult::Ok(size) if size < MAX_LOGGABLE_BODY_LENGTH => {
                let (parts, body) = response.into_parts();
                let bytes = match axum::body::to_bytes(body, size).await {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        error!("Failed to read response body: {:?}", err);
                        return internal_error();
                    }
                };
                info!("  Resp Body:\n{}", String::from_utf8_lossy(&bytes));
                response = Response::from_parts(parts, Body::from(bytes))
            }
            ContentLengthParseResult::Ok(size) => info!(
                "  Resp Body: Too big to log ({:#})",
                byte_unit::Byte::from(size)
            ),
        }
    }

    let status = response.status().as_u16();
    let duration = start.elapsed();

    if level > RequestsLoggingLevel::None {
        info!("<<< {} ({}ms)", status, duration.as_millis());
    }

    record_http_request(&method, route, status, duration);

    response
}
