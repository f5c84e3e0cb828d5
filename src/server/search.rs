//! Search API routes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

use super::presentation::normalize_location;
use super::server::api_error_response;
use super::state::{GuardedTourCache, ServerState};
use crate::catalog::{Artist, Location, RecordId};

pub const MAX_QUERY_CHARS: usize = 100;

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
}

/// Artists matching `query`, case-insensitively, in collection order.
///
/// Matches on name, members, first album, creation year and, when `locations`
/// is given, on the artist's normalized concert locations.
pub fn search_artists(artists: &[Artist], locations: &[Location], query: &str) -> Vec<Artist> {
    let query = query.trim().to_lowercase();
    let locations_by_id: HashMap<RecordId, &Location> =
        locations.iter().map(|l| (l.id, l)).collect();

    artists
        .iter()
        .filter(|artist| {
            let text_match = artist.name.to_lowercase().contains(&query)
                || artist
                    .members
                    .iter()
                    .any(|m| m.to_lowercase().contains(&query))
                || artist.first_album.to_lowercase().contains(&query)
                || artist.creation_date.to_string() == query;
            text_match
                || locations_by_id.get(&artist.id).is_some_and(|l| {
                    l.locations
                        .iter()
                        .any(|token| normalize_location(token).to_lowercase().contains(&query))
                })
        })
        .cloned()
        .collect()
}

async fn search(
    State(cache): State<GuardedTourCache>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() && q.chars().count() <= MAX_QUERY_CHARS => q.to_owned(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                format!(
                    "Query parameter 'q' is required and must be at most {} characters",
                    MAX_QUERY_CHARS
                ),
            )
                .into_response()
        }
    };

    let artists = match cache.get_artists().await {
        Ok(artists) => artists,
        Err(err) => return api_error_response("search", &err),
    };
    // Location matching is a bonus, searching by name still works without it.
    let locations = cache.get_locations().await.unwrap_or_else(|err| {
        warn!("Searching without locations: {}", err);
        Vec::new()
    });

    Json(search_artists(&artists, &locations, &query)).into_response()
}

pub fn make_search_routes(state: ServerState) -> Router {
    Router::new()
        .route("/api/search", get(search))
        .with_state(state)
}
