//! Application layer for cabfare: configuration, provider wiring and the
//! end-to-end estimate flow.

pub mod app;
pub mod config;
pub mod error;
pub mod estimator;

pub use app::App;
pub use config::{
    Config, GeocodingConfig, GeocodingProvider, HttpConfig, ModelConfig, ValidationResult,
    WeatherConfig, WeatherMode, WeatherProvider,
};
pub use error::{AppError, ConfigError, EstimateError, Leg};
pub use estimator::{FareEstimator, FareReport, LegInput, ResolvedLeg, TripInput, MANUAL_LABEL};

use anyhow::Result;

/// Initialize logging with `info` as the default level
pub fn init() -> Result<()> {
    init_with_default("info")
}

/// Initialize logging; `RUST_LOG` overrides `default_level` when set
pub fn init_with_default(default_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("cabfare core initialized");
    Ok(())
}
