use cabfare_pricing::Coordinate;
use serde::{Deserialize, Serialize};

/// What to look weather up for.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates(Coordinate),
}

impl std::fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::City(name) => write!(f, "{}", name),
            Self::Coordinates(c) => write!(f, "({})", c),
        }
    }
}

/// Current conditions at one trip endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_f: f64,
    pub condition: String,
}

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
    /// Code outside the WMO table; prices at the unmatched-condition rate.
    Unknown,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::Sleet, // Freezing drizzle
            61 | 63 | 80 => Self::Rain,
            65 | 81 | 82 => Self::HeavyRain,
            66 | 67 => Self::Sleet, // Freezing rain
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    /// Human-readable description, also the text the fare surcharge keys on.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Provider {provider} cannot look up {query}")]
    UnsupportedQuery {
        provider: &'static str,
        query: String,
    },

    #[error("Weather service returned HTTP {0}")]
    Http(u16),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Weather provider misconfigured: {0}")]
    Config(String),
}

impl WeatherError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(e) if e.is_timeout() => {
                "The weather request timed out. Please try again."
            }
            Self::Network(_) => "Network error. Check your connection.",
            Self::InvalidApiKey => "Weather API key is invalid. Check settings.",
            Self::LocationNotFound(_) => "Location not found. Check and try again.",
            Self::UnsupportedQuery { .. } => "This weather provider needs coordinates.",
            Self::Http(status) if *status >= 500 => {
                "Weather service unavailable. Please try again later."
            }
            Self::Http(_) => "Weather service error. Please try again.",
            Self::Parse(_) => "Unexpected response from the weather service.",
            Self::Config(_) => "Weather is not configured. Check your settings.",
        }
    }
}

/// Shared client setup: bounded timeout, no retries.
pub(crate) fn build_client(timeout: std::time::Duration) -> Result<reqwest::Client, WeatherError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("cabfare/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
