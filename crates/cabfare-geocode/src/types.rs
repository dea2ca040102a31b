use cabfare_pricing::Coordinate;
use serde::{Deserialize, Serialize};

/// A geocoded address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub coordinate: Coordinate,
    pub formatted_address: String,
}

/// Geocoding errors
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Address is empty")]
    EmptyAddress,

    #[error("Address '{address}' not resolved: {status}")]
    NotResolved { address: String, status: String },

    #[error("Geocoding service returned HTTP {0}")]
    Http(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Geocoder misconfigured: {0}")]
    Config(String),
}

impl GeocodeError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyAddress => "Please enter an address.".to_string(),
            Self::NotResolved { address, .. } => {
                format!("Could not find '{}'. Check the address and try again.", address)
            }
            Self::Http(status) if *status >= 500 => {
                "The geocoding service is having issues. Please try again later.".to_string()
            }
            Self::Http(_) => "The geocoding request was rejected.".to_string(),
            Self::Network(e) if e.is_timeout() => {
                "The geocoding request timed out. Please try again.".to_string()
            }
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Parse(_) => "Unexpected response from the geocoding service.".to_string(),
            Self::Config(_) => "Geocoding is not configured. Check your settings.".to_string(),
        }
    }
}

/// Reject blank input before any request is made.
pub(crate) fn normalize_address(address: &str) -> Result<&str, GeocodeError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(GeocodeError::EmptyAddress);
    }
    Ok(trimmed)
}

/// Shared client setup: bounded timeout, no retries.
pub(crate) fn build_client(
    timeout: std::time::Duration,
    user_agent: &str,
) -> Result<reqwest::Client, GeocodeError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?)
}

pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
