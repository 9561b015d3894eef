use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{AtlasError, AtlasResult};
use crate::models::GeoCandidate;

/// Free-text location search.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Candidates in the service's ranking order; may be empty.
    async fn search(&self, query: &str) -> AtlasResult<Vec<GeoCandidate>>;
}

/// Nominatim-compatible search endpoint (`/search?format=json&q=...`).
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> AtlasResult<Vec<GeoCandidate>> {
        let url = format!("{}/search", self.base_url);
        debug!(%url, %query, "geocoding");

        let response = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AtlasError::status(status, "Location service error"));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
