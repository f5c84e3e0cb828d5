//! Server-rendered HTML pages.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::collections::HashMap;
use tracing::{error, warn};

use super::presentation::{html_escape, normalize_location, strip_date_marker};
use super::state::GuardedTourCache;
use crate::catalog::{Artist, ConcertDates, Location, RecordId, RecordKind, Relation, ABSENT_ID};
use crate::upstream::UpstreamError;

/// Everything shown on an artist's page.
pub struct ArtistDetails {
    pub artist: Artist,
    pub location: Location,
    pub dates: ConcertDates,
    pub relation: Relation,
}

fn page(title: &str, content: &str) -> String {
    LAYOUT_HTML
        .replace("<!-- TITLE -->", &html_escape(title))
        .replace("<!-- CONTENT -->", content)
}

pub fn render_error(status: StatusCode, message: &str) -> String {
    let content = ERROR_HTML
        .replace("<!-- STATUS -->", status.as_str())
        .replace(
            "<!-- REASON -->",
            status.canonical_reason().unwrap_or("Error"),
        )
        .replace("<!-- MESSAGE -->", &html_escape(message));
    page(&format!("Error {}", status.as_u16()), &content)
}

fn error_page(status: StatusCode, message: &str) -> Response {
    (status, Html(render_error(status, message))).into_response()
}

fn upstream_error_page(what: &str, err: &UpstreamError) -> Response {
    // Retrying a request upstream rejected as malformed cannot help.
    let status = if err.is_retryable() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::BAD_REQUEST
    };
    error!("Failed to fetch {}: {}", what, err);
    error_page(status, &format!("Failed to fetch {}: {}", what, err))
}

pub fn render_index(artists: &[Artist]) -> String {
    let cards: String = artists
        .iter()
        .map(|artist| {
            format!(
                r#"<a class="card" href="/artist/{id}"><img src="{image}" alt="{name}" loading="lazy"><h2>{name}</h2><p>Since {created}</p><p>First album: {album}</p></a>"#,
                id = artist.id,
                image = html_escape(&artist.image),
                name = html_escape(&artist.name),
                created = artist.creation_date,
                album = html_escape(&artist.first_album),
            )
        })
        .collect();
    let content = INDEX_HTML
        .replace("<!-- COUNT -->", &artists.len().to_string())
        .replace("<!-- ARTISTS -->", &cards);
    page("Groupie Tracker", &content)
}

fn list_items(items: impl Iterator<Item = String>) -> String {
    items.map(|item| format!("<li>{}</li>", item)).collect()
}

fn schedule_html(relation: &Relation) -> String {
    relation
        .dates_locations
        .iter()
        .map(|(location, dates)| {
            let dates = dates
                .iter()
                .map(|d| html_escape(strip_date_marker(d)))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                html_escape(&normalize_location(location)),
                dates
            )
        })
        .collect()
}

pub fn render_artist(details: &ArtistDetails) -> String {
    let artist = &details.artist;
    let content = ARTIST_HTML
        .replace("<!-- NAME -->", &html_escape(&artist.name))
        .replace("<!-- IMAGE -->", &html_escape(&artist.image))
        .replace("<!-- CREATED -->", &artist.creation_date.to_string())
        .replace("<!-- FIRST_ALBUM -->", &html_escape(&artist.first_album))
        .replace(
            "<!-- MEMBERS -->",
            &list_items(artist.members.iter().map(|m| html_escape(m))),
        )
        .replace(
            "<!-- LOCATIONS -->",
            &list_items(
                details
                    .location
                    .locations
                    .iter()
                    .map(|l| html_escape(&normalize_location(l))),
            ),
        )
        .replace(
            "<!-- DATES -->",
            &list_items(
                details
                    .dates
                    .dates
                    .iter()
                    .map(|d| html_escape(strip_date_marker(d))),
            ),
        )
        .replace("<!-- SCHEDULE -->", &schedule_html(&details.relation));
    page(&artist.name, &content)
}

pub fn render_concerts(artists: &[Artist], relations: &[Relation]) -> String {
    let names: HashMap<RecordId, &str> = artists
        .iter()
        .map(|a| (a.id, a.name.as_str()))
        .collect();
    let sections: String = relations
        .iter()
        .filter(|r| !r.dates_locations.is_empty())
        .map(|relation| {
            let name = names.get(&relation.id).copied().unwrap_or("Unknown artist");
            format!(
                r#"<section><h2><a href="/artist/{}">{}</a></h2><table>{}</table></section>"#,
                relation.id,
                html_escape(name),
                schedule_html(relation)
            )
        })
        .collect();
    page("Concerts", &CONCERTS_HTML.replace("<!-- SECTIONS -->", &sections))
}

pub async fn index(State(cache): State<GuardedTourCache>) -> Response {
    match cache.get_artists().await {
        Ok(artists) => Html(render_index(&artists)).into_response(),
        Err(err) => upstream_error_page("artists", &err),
    }
}

pub async fn artist_page(
    State(cache): State<GuardedTourCache>,
    Path(id): Path<String>,
) -> Response {
    let id = match id.parse::<RecordId>() {
        Ok(id) if id != ABSENT_ID => id,
        _ => return error_page(StatusCode::BAD_REQUEST, "Invalid artist ID"),
    };

    // Merging a single artist into an empty store would leave the index
    // listing just that one until the TTL expires.
    let artists_empty = cache
        .status()
        .kinds
        .iter()
        .any(|k| k.kind == RecordKind::Artist && k.records == 0);
    if artists_empty {
        if let Err(err) = cache.get_artists().await {
            warn!("Loading artist {} without the collection: {}", id, err);
        }
    }

    let artist = match cache.get_artist_by_id(id).await {
        Ok(Some(artist)) => artist,
        Ok(None) => return error_page(StatusCode::NOT_FOUND, "Artist not found"),
        Err(err) => return upstream_error_page("artist", &err),
    };

    // Sub-resources fail fast, in page order.
    let location = if artist.locations.is_empty() {
        cache.get_location_by_id(id).await
    } else {
        cache.get_location_by_url(&artist.locations).await
    };
    let location = match location {
        Ok(location) => location.unwrap_or_default(),
        Err(err) => return upstream_error_page("locations", &err),
    };

    let dates = if artist.concert_dates.is_empty() {
        cache.get_dates_by_id(id).await
    } else {
        cache.get_dates_by_url(&artist.concert_dates).await
    };
    let dates = match dates {
        Ok(dates) => dates.unwrap_or_default(),
        Err(err) => return upstream_error_page("dates", &err),
    };

    let relation = if artist.relations.is_empty() {
        cache.get_relation_by_id(id).await
    } else {
        cache.get_relation_by_url(&artist.relations).await
    };
    let relation = match relation {
        Ok(relation) => relation.unwrap_or_default(),
        Err(err) => return upstream_error_page("relations", &err),
    };

    Html(render_artist(&ArtistDetails {
        artist,
        location,
        dates,
        relation,
    }))
    .into_response()
}

pub async fn concerts(State(cache): State<GuardedTourCache>) -> Response {
    let artists = match cache.get_artists().await {
        Ok(artists) => artists,
        Err(err) => return upstream_error_page("artists", &err),
    };
    match cache.get_relations().await {
        Ok(relations) => Html(render_concerts(&artists, &relations)).into_response(),
        Err(err) => upstream_error_page("relations", &err),
    }
}

pub async fn not_found() -> Response {
    error_page(StatusCode::NOT_FOUND, "Page not found")
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title><!-- TITLE --></title>
<link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
<header><nav><a href="/">Artists</a> <a href="/concerts">Concerts</a></nav></header>
<main>
<!-- CONTENT -->
</main>
<script src="/static/js/search.js" defer></script>
</body>
</html>
"#;

const INDEX_HTML: &str = r#"<h1>Artists</h1>
<form id="search-form" action="/api/search" method="get">
<input id="search" type="search" name="q" maxlength="100" placeholder="Search artists, members, albums, locations">
</form>
<ul id="search-results"></ul>
<p class="count"><!-- COUNT --> artists</p>
<div class="grid">
<!-- ARTISTS -->
</div>
"#;

const ARTIST_HTML: &str = r#"<article class="artist">
<h1><!-- NAME --></h1>
<img src="<!-- IMAGE -->" alt="<!-- NAME -->">
<dl>
<dt>Created</dt><dd><!-- CREATED --></dd>
<dt>First album</dt><dd><!-- FIRST_ALBUM --></dd>
</dl>
<h2>Members</h2>
<ul><!-- MEMBERS --></ul>
<h2>Locations</h2>
<ul><!-- LOCATIONS --></ul>
<h2>Dates</h2>
<ul><!-- DATES --></ul>
<h2>Concerts</h2>
<table><!-- SCHEDULE --></table>
</article>
"#;

const CONCERTS_HTML: &str = r#"<h1>Concerts</h1>
<!-- SECTIONS -->
"#;

const ERROR_HTML: &str = r#"<section class="error">
<h1><!-- STATUS --> <!-- REASON --></h1>
<p><!-- MESSAGE --></p>
<p><a href="/">Back to artists</a></p>
</section>
"#;
