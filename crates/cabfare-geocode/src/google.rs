//! Google Geocoding API client.

use std::time::Duration;

use cabfare_pricing::Coordinate;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{build_client, normalize_address, trim_base_url, GeocodeError, ResolvedAddress};

pub const GOOGLE_BASE_URL: &str = "https://maps.googleapis.com";
const GEOCODE_PATH: &str = "/maps/api/geocode/json";
const USER_AGENT: &str = concat!("cabfare/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleResult {
    formatted_address: String,
    geometry: GoogleGeometry,
}

#[derive(Debug, Deserialize)]
struct GoogleGeometry {
    location: GoogleLocation,
}

#[derive(Debug, Deserialize)]
struct GoogleLocation {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(GeocodeError::Config("Google API key is empty".to_string()));
        }

        Ok(Self {
            client: build_client(timeout, USER_AGENT)?,
            api_key,
            base_url: GOOGLE_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different host (proxies, tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = trim_base_url(base_url);
        self
    }

    /// Resolve the first match for `address`.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve(&self, address: &str) -> Result<ResolvedAddress, GeocodeError> {
        let address = normalize_address(address)?;
        let url = format!("{}{}", self.base_url, GEOCODE_PATH);

        let response = self
            .client
            .get(&url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::Network(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Google geocoding returned HTTP {}", status);
            return Err(GeocodeError::Http(status.as_u16()));
        }

        let body: GoogleResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.without_url().to_string()))?;

        if body.status != "OK" {
            let status = match body.error_message {
                Some(msg) => format!("{} ({})", body.status, msg),
                None => body.status,
            };
            tracing::warn!("Google geocoding error: {} for '{}'", status, address);
            return Err(GeocodeError::NotResolved {
                address: address.to_string(),
                status,
            });
        }

        let first = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotResolved {
                address: address.to_string(),
                status: "OK with no results".to_string(),
            })?;

        let location = first.geometry.location;
        let resolved = ResolvedAddress {
            coordinate: Coordinate::new(location.lat, location.lng),
            formatted_address: first.formatted_address,
        };
        tracing::info!(
            "Resolved '{}' to {} ({})",
            address,
            resolved.coordinate,
            resolved.formatted_address
        );
        Ok(resolved)
    }
}
