//! Open-Meteo current conditions. Free, no API key, coordinates only.

use std::time::Duration;

use serde::Deserialize;
use tracing::instrument;

use crate::types::{build_client, WeatherCondition, WeatherError, WeatherQuery, WeatherReading};

pub const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    weather_code: i32,
}

#[derive(Debug, Clone)]
pub struct OpenMeteo {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteo {
    pub fn new(timeout: Duration) -> Result<Self, WeatherError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: OPEN_METEO_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[instrument(skip(self), level = "info")]
    pub async fn lookup(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        let coord = match query {
            WeatherQuery::Coordinates(c) => *c,
            WeatherQuery::City(_) => {
                return Err(WeatherError::UnsupportedQuery {
                    provider: "open-meteo",
                    query: query.to_string(),
                })
            }
        };

        let url = format!("{}/v1/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", coord.latitude.to_string()),
                ("longitude", coord.longitude.to_string()),
                ("current", "temperature_2m,weather_code".to_string()),
                ("temperature_unit", "fahrenheit".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Open-Meteo returned HTTP {}", status);
            return Err(WeatherError::Http(status.as_u16()));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        if !body.current.temperature_2m.is_finite() {
            return Err(WeatherError::Parse(format!(
                "temperature {}",
                body.current.temperature_2m
            )));
        }

        let condition = WeatherCondition::from_wmo_code(body.current.weather_code);
        let reading = WeatherReading {
            temperature_f: body.current.temperature_2m,
            condition: condition.description().to_string(),
        };
        tracing::info!(
            "Weather at {}: {}°F, {}",
            query,
            reading.temperature_f,
            reading.condition
        );
        Ok(reading)
    }
}
