//! Upstream fixture data
//!
//! Builds the tour dataset the mocked upstream serves. Sub-resource urls in
//! the artist records point back at the mock server, so the server under
//! test follows them exactly as it would against the real API.

use super::constants::*;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn artists_body(api: &str) -> Value {
    json!([
        {
            "id": ARTIST_1_ID,
            "image": format!("{api}/images/queen.jpeg"),
            "name": ARTIST_1_NAME,
            "members": [ARTIST_1_MEMBER, "Brian May", "John Daecon", "Roger Meddows-Taylor"],
            "creationDate": 1970,
            "firstAlbum": "14-12-1973",
            "locations": format!("{api}/locations/{ARTIST_1_ID}"),
            "concertDates": format!("{api}/dates/{ARTIST_1_ID}"),
            "relations": format!("{api}/relation/{ARTIST_1_ID}")
        },
        {
            "id": ARTIST_2_ID,
            "image": format!("{api}/images/soja.jpeg"),
            "name": ARTIST_2_NAME,
            "members": ["Jacob Hemphill", "Bob Jefferson"],
            "creationDate": 1997,
            "firstAlbum": "05-06-2002",
            "locations": format!("{api}/locations/{ARTIST_2_ID}"),
            "concertDates": format!("{api}/dates/{ARTIST_2_ID}"),
            "relations": format!("{api}/relation/{ARTIST_2_ID}")
        }
    ])
}

pub fn location_body(api: &str, id: u32) -> Value {
    let token = if id == ARTIST_1_ID {
        ARTIST_1_LOCATION_TOKEN
    } else {
        ARTIST_2_LOCATION_TOKEN
    };
    json!({
        "id": id,
        "locations": [token],
        "dates": format!("{api}/dates/{id}")
    })
}

pub fn dates_body(id: u32) -> Value {
    let date = if id == ARTIST_1_ID { "*23-08-2019" } else { "*05-12-2019" };
    json!({ "id": id, "dates": [date] })
}

pub fn relation_body(id: u32) -> Value {
    let (token, date) = if id == ARTIST_1_ID {
        (ARTIST_1_LOCATION_TOKEN, "23-08-2019")
    } else {
        (ARTIST_2_LOCATION_TOKEN, "05-12-2019")
    };
    json!({ "id": id, "datesLocations": { token: [date] } })
}

/// Mounts the bulk endpoints and every per-id sub-resource of the fixture.
pub async fn mount_upstream(server: &MockServer) {
    let api = format!("{}{}", server.uri(), UPSTREAM_API_PATH);
    let ids = [ARTIST_1_ID, ARTIST_2_ID];

    mount_json(server, "/artists", artists_body(&api)).await;
    mount_json(
        server,
        "/locations",
        json!({ "index": ids.iter().map(|id| location_body(&api, *id)).collect::<Vec<_>>() }),
    )
    .await;
    mount_json(
        server,
        "/dates",
        json!({ "index": ids.iter().map(|id| dates_body(*id)).collect::<Vec<_>>() }),
    )
    .await;
    mount_json(
        server,
        "/relation",
        json!({ "index": ids.iter().map(|id| relation_body(*id)).collect::<Vec<_>>() }),
    )
    .await;

    let artists = artists_body(&api);
    for (position, id) in ids.iter().enumerate() {
        mount_json(server, &format!("/artists/{id}"), artists[position].clone()).await;
        mount_json(server, &format!("/locations/{id}"), location_body(&api, *id)).await;
        mount_json(server, &format!("/dates/{id}"), dates_body(*id)).await;
        mount_json(server, &format!("/relation/{id}"), relation_body(*id)).await;
    }
}

async fn mount_json(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{}{}", UPSTREAM_API_PATH, endpoint)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
