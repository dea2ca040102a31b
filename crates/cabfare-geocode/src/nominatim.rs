//! Forward geocoding via Nominatim (OpenStreetMap) - free, no API key required.

use std::time::Duration;

use cabfare_pricing::Coordinate;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{build_client, normalize_address, trim_base_url, GeocodeError, ResolvedAddress};

pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!("cabfare/", env!("CARGO_PKG_VERSION"));

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Nominatim's usage policy requires an identifying User-Agent.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let user_agent = match user_agent.trim() {
            "" => DEFAULT_USER_AGENT,
            ua => ua,
        };

        Ok(Self {
            client: build_client(timeout, user_agent)?,
            base_url: NOMINATIM_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = trim_base_url(base_url);
        self
    }

    #[instrument(skip(self), level = "info")]
    pub async fn resolve(&self, address: &str) -> Result<ResolvedAddress, GeocodeError> {
        let address = normalize_address(address)?;
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Nominatim returned HTTP {}", status);
            return Err(GeocodeError::Http(status.as_u16()));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotResolved {
                address: address.to_string(),
                status: "no match".to_string(),
            })?;

        let coordinate = parse_place(&place)?;
        let formatted_address = place
            .display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| address.to_string());

        tracing::info!("Resolved '{}' to {}", address, coordinate);
        Ok(ResolvedAddress {
            coordinate,
            formatted_address,
        })
    }
}

fn parse_place(place: &NominatimPlace) -> Result<Coordinate, GeocodeError> {
    let latitude = place
        .lat
        .parse::<f64>()
        .map_err(|e| GeocodeError::Parse(format!("lat '{}': {}", place.lat, e)))?;
    let longitude = place
        .lon
        .parse::<f64>()
        .map_err(|e| GeocodeError::Parse(format!("lon '{}': {}", place.lon, e)))?;

    let coordinate = Coordinate::new(latitude, longitude);
    if !coordinate.is_valid() {
        return Err(GeocodeError::Parse(format!("coordinate out of range: {}", coordinate)));
    }
    Ok(coordinate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(lat: &str, lon: &str) -> NominatimPlace {
        NominatimPlace {
            lat: lat.to_string(),
            lon: lon.to_string(),
            display_name: None,
        }
    }

    #[test]
    fn test_parse_place() {
        let c = parse_place(&place("40.7127281", "-74.0060152")).unwrap();
        assert_eq!(c, Coordinate::new(40.7127281, -74.0060152));
    }

    #[test]
    fn test_parse_place_rejects_garbage() {
        assert!(matches!(parse_place(&place("north", "-74.0")), Err(GeocodeError::Parse(_))));
        assert!(matches!(parse_place(&place("95.0", "-74.0")), Err(GeocodeError::Parse(_))));
    }

    #[test]
    fn test_blank_user_agent_falls_back() {
        assert!(NominatimGeocoder::new("", Duration::from_secs(10)).is_ok());
    }

    #[tokio::test]
    // Hits the public Nominatim service: cargo test -p cabfare-geocode -- --ignored
    #[ignore]
    async fn test_resolve_live_new_york() {
        let geocoder = NominatimGeocoder::new(DEFAULT_USER_AGENT, Duration::from_secs(10)).unwrap();
        let resolved = geocoder.resolve("City Hall, New York").await.unwrap();
        assert!((resolved.coordinate.latitude - 40.71).abs() < 0.05);
    }
}
