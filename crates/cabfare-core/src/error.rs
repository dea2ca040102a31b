//! Centralized error types for cabfare.
//!
//! Each crate keeps its own error enum; [`AppError`] is the type the binary
//! and any UI layer deal with. Use `user_message()` for display text and the
//! `Display` impl for logs.

use cabfare_geocode::GeocodeError;
use cabfare_pricing::{InputError, ModelError};
use cabfare_weather::WeatherError;
use thiserror::Error;

/// Which end of the trip an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Pickup,
    Dropoff,
}

impl Leg {
    pub fn title(&self) -> &'static str {
        match self {
            Leg::Pickup => "Pickup",
            Leg::Dropoff => "Dropoff",
        }
    }

    pub fn as_field(&self) -> &'static str {
        match self {
            Leg::Pickup => "pickup",
            Leg::Dropoff => "dropoff",
        }
    }
}

impl std::fmt::Display for Leg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_field())
    }
}

/// Why a single fare estimate was not produced. Never fatal to the process.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("Could not resolve {leg} address: {source}")]
    AddressNotResolved {
        leg: Leg,
        #[source]
        source: GeocodeError,
    },

    #[error("Weather unavailable for {leg}: {source}")]
    WeatherUnavailable {
        leg: Leg,
        #[source]
        source: WeatherError,
    },

    #[error("Incomplete input: {0}")]
    IncompleteInput(#[from] InputError),

    #[error("Fare model failed: {0}")]
    ModelInvocation(#[from] ModelError),
}

impl EstimateError {
    pub fn user_message(&self) -> String {
        match self {
            Self::AddressNotResolved { leg, source } => {
                format!("{} location: {}", leg.title(), source.user_message())
            }
            Self::WeatherUnavailable { leg, source } => format!(
                "Incomplete weather data ({}): {}",
                leg,
                source.user_message()
            ),
            Self::IncompleteInput(e) => e.user_message(),
            Self::ModelInvocation(e) => e.user_message(),
        }
    }

    /// The trip end involved, if the failure is tied to one.
    pub fn leg(&self) -> Option<Leg> {
        match self {
            Self::AddressNotResolved { leg, .. } | Self::WeatherUnavailable { leg, .. } => {
                Some(*leg)
            }
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Estimate failed: {0}")]
    Estimate(#[from] EstimateError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Geocoder setup failed: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("Weather setup failed: {0}")]
    Weather(#[from] WeatherError),

    #[error("Model setup failed: {0}")]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Estimate(e) => e.user_message(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Geocode(e) => e.user_message(),
            AppError::Weather(e) => e.user_message().to_string(),
            AppError::Model(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.".to_string(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}
