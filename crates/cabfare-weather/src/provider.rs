use crate::open_meteo::OpenMeteo;
use crate::openweathermap::OpenWeatherMap;
use crate::types::{WeatherError, WeatherQuery, WeatherReading};

/// Anything that reports current temperature and conditions.
#[allow(async_fn_in_trait)]
pub trait WeatherLookup {
    async fn lookup(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError>;
}

impl WeatherLookup for OpenWeatherMap {
    async fn lookup(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        OpenWeatherMap::lookup(self, query).await
    }
}

impl WeatherLookup for OpenMeteo {
    async fn lookup(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        OpenMeteo::lookup(self, query).await
    }
}

/// Provider chosen at startup from configuration.
#[derive(Debug, Clone)]
pub enum WeatherService {
    OpenWeatherMap(OpenWeatherMap),
    OpenMeteo(OpenMeteo),
}

impl WeatherService {
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::OpenWeatherMap(_) => "openweathermap",
            Self::OpenMeteo(_) => "open-meteo",
        }
    }
}

impl WeatherLookup for WeatherService {
    async fn lookup(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        match self {
            Self::OpenWeatherMap(p) => p.lookup(query).await,
            Self::OpenMeteo(p) => p.lookup(query).await,
        }
    }
}

impl From<OpenWeatherMap> for WeatherService {
    fn from(p: OpenWeatherMap) -> Self {
        Self::OpenWeatherMap(p)
    }
}

impl From<OpenMeteo> for WeatherService {
    fn from(p: OpenMeteo) -> Self {
        Self::OpenMeteo(p)
    }
}
