use crate::google::GoogleGeocoder;
use crate::nominatim::NominatimGeocoder;
use crate::types::{GeocodeError, ResolvedAddress};

/// Anything that turns free-text addresses into coordinates.
#[allow(async_fn_in_trait)]
pub trait CoordinateResolver {
    async fn resolve(&self, address: &str) -> Result<ResolvedAddress, GeocodeError>;
}

impl CoordinateResolver for GoogleGeocoder {
    async fn resolve(&self, address: &str) -> Result<ResolvedAddress, GeocodeError> {
        GoogleGeocoder::resolve(self, address).await
    }
}

impl CoordinateResolver for NominatimGeocoder {
    async fn resolve(&self, address: &str) -> Result<ResolvedAddress, GeocodeError> {
        NominatimGeocoder::resolve(self, address).await
    }
}

/// Provider chosen at startup from configuration.
#[derive(Debug, Clone)]
pub enum Geocoder {
    Google(GoogleGeocoder),
    Nominatim(NominatimGeocoder),
}

impl Geocoder {
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Google(_) => "google",
            Self::Nominatim(_) => "nominatim",
        }
    }
}

impl CoordinateResolver for Geocoder {
    async fn resolve(&self, address: &str) -> Result<ResolvedAddress, GeocodeError> {
        match self {
            Self::Google(g) => g.resolve(address).await,
            Self::Nominatim(n) => n.resolve(address).await,
        }
    }
}

impl From<GoogleGeocoder> for Geocoder {
    fn from(g: GoogleGeocoder) -> Self {
        Self::Google(g)
    }
}

impl From<NominatimGeocoder> for Geocoder {
    fn from(n: NominatimGeocoder) -> Self {
        Self::Nominatim(n)
    }
}
