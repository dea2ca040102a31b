//! Weather lookup for cabfare
//!
//! Current temperature (°F) and a condition description for a city or a
//! coordinate, from OpenWeatherMap (API key) or Open-Meteo (keyless).

pub mod open_meteo;
pub mod openweathermap;
pub mod provider;
pub mod types;

pub use open_meteo::OpenMeteo;
pub use openweathermap::OpenWeatherMap;
pub use provider::{WeatherLookup, WeatherService};
pub use types::*;
