//! Address to coordinate resolution for cabfare.
//!
//! Two interchangeable providers: Google Geocoding (API key) and Nominatim
//! (OpenStreetMap, keyless). Callers only see [`ResolvedAddress`].

pub mod google;
pub mod nominatim;
pub mod provider;
pub mod types;

pub use google::GoogleGeocoder;
pub use nominatim::NominatimGeocoder;
pub use provider::{CoordinateResolver, Geocoder};
pub use types::*;
