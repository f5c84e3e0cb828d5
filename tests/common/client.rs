//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all server endpoints.
//!
//! When routes change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Pages
    // ========================================================================

    /// GET /
    pub async fn get_index(&self) -> Response {
        self.get("/").await
    }

    /// GET /artist/{id}
    pub async fn get_artist_page(&self, id: &str) -> Response {
        self.get(&format!("/artist/{}", id)).await
    }

    /// GET /concerts
    pub async fn get_concerts(&self) -> Response {
        self.get("/concerts").await
    }

    /// GET any path, for fallback tests
    pub async fn get_path(&self, path: &str) -> Response {
        self.get(path).await
    }

    // ========================================================================
    // API
    // ========================================================================

    /// GET /api/artists
    pub async fn get_artists(&self) -> Response {
        self.get("/api/artists").await
    }

    /// GET /api/search?q={query}
    pub async fn search(&self, query: &str) -> Response {
        self.client
            .get(format!("{}/api/search", self.base_url))
            .query(&[("q", query)])
            .send()
            .await
            .expect("Search request failed")
    }

    /// POST /api/refresh-cache
    pub async fn refresh_cache(&self) -> Response {
        self.client
            .post(format!("{}/api/refresh-cache", self.base_url))
            .send()
            .await
            .expect("Refresh request failed")
    }

    /// GET /api/cache/status
    pub async fn cache_status(&self) -> Response {
        self.get("/api/cache/status").await
    }
}
