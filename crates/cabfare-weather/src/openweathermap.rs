//! OpenWeatherMap current-weather client.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{build_client, WeatherError, WeatherQuery, WeatherReading};

pub const OPENWEATHERMAP_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmWeather>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: String,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherMap {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherMap {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(WeatherError::Config("OpenWeatherMap API key is empty".to_string()));
        }

        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            base_url: OPENWEATHERMAP_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Current temperature in °F and a title-cased condition.
    #[instrument(skip(self), level = "info")]
    pub async fn lookup(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let mut params: Vec<(&str, String)> = match query {
            WeatherQuery::City(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(WeatherError::LocationNotFound("empty city name".to_string()));
                }
                vec![("q", name.to_string())]
            }
            WeatherQuery::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        };
        params.push(("units", "imperial".to_string()));
        params.push(("appid", self.api_key.clone()));

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.without_url()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(WeatherError::InvalidApiKey),
            StatusCode::NOT_FOUND => return Err(WeatherError::LocationNotFound(query.to_string())),
            status if !status.is_success() => {
                tracing::warn!("OpenWeatherMap returned HTTP {}", status);
                return Err(WeatherError::Http(status.as_u16()));
            }
            _ => {}
        }

        let body: OwmResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.without_url().to_string()))?;

        let reading = reading_from(body)?;
        tracing::info!(
            "Weather at {}: {}°F, {}",
            query,
            reading.temperature_f,
            reading.condition
        );
        Ok(reading)
    }
}

fn reading_from(body: OwmResponse) -> Result<WeatherReading, WeatherError> {
    if !body.main.temp.is_finite() {
        return Err(WeatherError::Parse(format!("temperature {}", body.main.temp)));
    }
    let description = body
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| WeatherError::Parse("response has no weather entry".to_string()))?;

    Ok(WeatherReading {
        temperature_f: body.main.temp,
        condition: title_case(&description),
    })
}

/// "light rain" -> "Light Rain"
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
