//! reqwest-backed client for the public tour dataset API.

use super::{TourUpstream, UpstreamError};
use crate::catalog::{Artist, DateIndex, LocationIndex, RecordKind, RelationIndex};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_UPSTREAM_URL: &str = "https://groupietrackers.herokuapp.com/api";

/// HTTP client for the remote dataset.
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a new upstream client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the dataset API (e.g., "https://groupietrackers.herokuapp.com/api")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: String, timeout_sec: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, UpstreamError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(UpstreamError::from_reqwest)?;

        check_status(&url, response.status())?;

        response.json().await.map_err(|e| {
            UpstreamError::BadResponse(format!("Failed to parse response from {}: {}", url, e))
        })
    }
}

fn check_status(url: &str, status: StatusCode) -> Result<(), UpstreamError> {
    if status.is_success() {
        Ok(())
    } else if status.is_server_error() {
        Err(UpstreamError::Unavailable(format!(
            "{} answered with status {}",
            url, status
        )))
    } else {
        Err(UpstreamError::BadResponse(format!(
            "{} answered with status {}",
            url, status
        )))
    }
}

#[async_trait]
impl TourUpstream for UpstreamClient {
    async fn fetch_all_artists(&self) -> Result<Vec<Artist>, UpstreamError> {
        self.get_json(RecordKind::Artist.endpoint()).await
    }

    async fn fetch_all_locations(&self) -> Result<LocationIndex, UpstreamError> {
        self.get_json(RecordKind::Location.endpoint()).await
    }

    async fn fetch_all_dates(&self) -> Result<DateIndex, UpstreamError> {
        self.get_json(RecordKind::Date.endpoint()).await
    }

    async fn fetch_all_relations(&self) -> Result<RelationIndex, UpstreamError> {
        self.get_json(RecordKind::Relation.endpoint()).await
    }

    async fn fetch_sub_resource(
        &self,
        kind: RecordKind,
        url: &str,
    ) -> Result<Option<serde_json::Value>, UpstreamError> {
        debug!("GET {} ({})", url, kind);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::from_reqwest)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_status(url, response.status())?;

        response.json().await.map(Some).map_err(|e| {
            UpstreamError::BadResponse(format!("Failed to parse {} from {}: {}", kind, url, e))
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
