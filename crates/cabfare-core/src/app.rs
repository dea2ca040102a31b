use std::sync::Arc;

use cabfare_geocode::{Geocoder, GoogleGeocoder, NominatimGeocoder};
use cabfare_pricing::ModelArtifact;
use cabfare_weather::{OpenMeteo, OpenWeatherMap, WeatherService};

use crate::config::{Config, GeocodingProvider, WeatherProvider};
use crate::error::{AppError, ConfigError};
use crate::estimator::{FareEstimator, FareReport, TripInput};

/// Main application state: configured providers and the loaded model.
pub struct App {
    config: Arc<Config>,
    estimator: FareEstimator<Geocoder, WeatherService, ModelArtifact>,
}

impl App {
    /// Build the application from a validated configuration
    pub fn new(config: Config) -> Result<Self, AppError> {
        let geocoder = build_geocoder(&config)?;
        let weather = build_weather(&config)?;
        let model = ModelArtifact::load(&config.model.path)?;

        tracing::info!(
            geocoder = geocoder.provider_name(),
            weather = weather.provider_name(),
            model = %config.model.path.display(),
            "Application initialized"
        );

        let estimator = FareEstimator::new(geocoder, weather, model)
            .with_params(config.pricing)
            .with_mode(config.weather.mode);

        Ok(Self {
            config: Arc::new(config),
            estimator,
        })
    }

    /// Estimate a fare with the configured providers
    pub async fn estimate(&self, input: &TripInput) -> Result<FareReport, AppError> {
        Ok(self.estimator.estimate(input).await?)
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn build_geocoder(config: &Config) -> Result<Geocoder, AppError> {
    let settings = &config.geocoding;
    let timeout = config.http.timeout();

    let geocoder: Geocoder = match settings.provider {
        GeocodingProvider::Google => {
            let key = settings
                .api_key
                .clone()
                .ok_or_else(|| ConfigError::MissingSetting("geocoding.api_key".to_string()))?;
            let google = GoogleGeocoder::new(key, timeout)?;
            let google = match &settings.base_url {
                Some(url) => google.with_base_url(url),
                None => google,
            };
            google.into()
        }
        GeocodingProvider::Nominatim => {
            let nominatim = NominatimGeocoder::new(&settings.user_agent, timeout)?;
            let nominatim = match &settings.base_url {
                Some(url) => nominatim.with_base_url(url),
                None => nominatim,
            };
            nominatim.into()
        }
    };

    Ok(geocoder)
}

fn build_weather(config: &Config) -> Result<WeatherService, AppError> {
    let settings = &config.weather;
    let timeout = config.http.timeout();

    let service: WeatherService = match settings.provider {
        WeatherProvider::OpenWeatherMap => {
            let key = settings
                .api_key
                .clone()
                .ok_or_else(|| ConfigError::MissingSetting("weather.api_key".to_string()))?;
            let owm = OpenWeatherMap::new(key, timeout)?;
            let owm = match &settings.base_url {
                Some(url) => owm.with_base_url(url),
                None => owm,
            };
            owm.into()
        }
        WeatherProvider::OpenMeteo => {
            let meteo = OpenMeteo::new(timeout)?;
            let meteo = match &settings.base_url {
                Some(url) => meteo.with_base_url(url),
                None => meteo,
            };
            meteo.into()
        }
    };

    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_requires_key() {
        let mut config = Config::default();
        config.geocoding.provider = GeocodingProvider::Google;
        config.geocoding.api_key = None;

        let err = build_geocoder(&config).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::MissingSetting(_))));
    }

    #[test]
    fn test_default_providers() {
        let config = Config::default();
        assert_eq!(build_geocoder(&config).unwrap().provider_name(), "nominatim");
        assert_eq!(build_weather(&config).unwrap().provider_name(), "open-meteo");
    }

    #[test]
    fn test_missing_model_fails() {
        let mut config = Config::default();
        config.model.path = "/nonexistent/cabfare/model.json".into();

        let err = App::new(config).err().unwrap();
        assert!(matches!(err, AppError::Model(_)));
        assert!(err.user_message().contains("could not be read"));
    }
}
