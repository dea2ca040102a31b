//! End-to-end fare estimation for one trip.
//!
//! Calls run one after another: pickup, dropoff, pickup weather, dropoff
//! weather, model. The first failure ends the estimate; no fallback fare is
//! ever produced.

use cabfare_geocode::{CoordinateResolver, ResolvedAddress};
use cabfare_pricing::weather_factor::DEFAULT_WEATHER_FACTOR;
use cabfare_pricing::{
    adjust_fare, blend, build_features, haversine_miles, pickup_weight, weather_factor,
    Coordinate, FareModel, FareQuote, FeatureVector, InputError, MapView, PricingParams,
    TripRequest, WeatherMultiplier,
};
use cabfare_weather::{WeatherError, WeatherLookup, WeatherQuery, WeatherReading};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::instrument;

use crate::config::WeatherMode;
use crate::error::{EstimateError, Leg};

/// Label shown instead of a geocoded address for manual legs.
pub const MANUAL_LABEL: &str = "Manual coordinates";

/// One trip end as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum LegInput {
    Address(String),
    Coordinates(Coordinate),
}

/// Raw form input for one estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct TripInput {
    pub pickup: LegInput,
    pub dropoff: LegInput,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub passenger_count: u8,
}

/// A located trip end and its weather, if looked up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLeg {
    pub coordinate: Coordinate,
    pub formatted_address: String,
    pub weather: Option<WeatherReading>,
}

/// Everything shown after a successful estimate.
#[derive(Debug, Clone, Serialize)]
pub struct FareReport {
    pub pickup: ResolvedLeg,
    pub dropoff: ResolvedLeg,
    pub trip: TripRequest,
    pub distance_miles: f64,
    pub pickup_weight: f64,
    pub temperature_f: f64,
    pub features: FeatureVector,
    pub map: MapView,
    pub quote: FareQuote,
    pub model_name: String,
}

pub struct FareEstimator<G, W, M> {
    geocoder: G,
    weather: W,
    model: M,
    params: PricingParams,
    mode: WeatherMode,
}

impl<G, W, M> FareEstimator<G, W, M>
where
    G: CoordinateResolver,
    W: WeatherLookup,
    M: FareModel,
{
    pub fn new(geocoder: G, weather: W, model: M) -> Self {
        Self {
            geocoder,
            weather,
            model,
            params: PricingParams::default(),
            mode: WeatherMode::default(),
        }
    }

    pub fn with_params(mut self, params: PricingParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_mode(mut self, mode: WeatherMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Estimate the fare for one trip.
    #[instrument(skip(self, input), fields(passengers = input.passenger_count), level = "info")]
    pub async fn estimate(&self, input: &TripInput) -> Result<FareReport, EstimateError> {
        // Reject before spending any network calls.
        if !(cabfare_pricing::trip::MIN_PASSENGERS..=cabfare_pricing::trip::MAX_PASSENGERS)
            .contains(&input.passenger_count)
        {
            return Err(InputError::PassengerCount(input.passenger_count).into());
        }

        let pickup = self.resolve_leg(Leg::Pickup, &input.pickup).await?;
        let dropoff = self.resolve_leg(Leg::Dropoff, &input.dropoff).await?;

        let pickup_weather = Some(self.lookup_weather(Leg::Pickup, pickup.coordinate).await?);
        let dropoff_weather = match self.mode {
            WeatherMode::Blended => {
                Some(self.lookup_weather(Leg::Dropoff, dropoff.coordinate).await?)
            }
            WeatherMode::Single => None,
        };

        let pickup = ResolvedLeg {
            coordinate: pickup.coordinate,
            formatted_address: pickup.formatted_address,
            weather: pickup_weather,
        };
        let dropoff = ResolvedLeg {
            coordinate: dropoff.coordinate,
            formatted_address: dropoff.formatted_address,
            weather: dropoff_weather,
        };

        let trip = TripRequest::new(
            pickup.coordinate,
            dropoff.coordinate,
            input.date,
            input.time,
            input.passenger_count,
        )?;

        let distance_miles = haversine_miles(&pickup.coordinate, &dropoff.coordinate);
        let weight = pickup_weight(distance_miles, self.params.blend_radius_miles);
        let temperature_f = representative_temperature(
            pickup.weather.as_ref(),
            dropoff.weather.as_ref(),
            self.mode,
            weight,
        )?;

        let features = build_features(&trip, temperature_f);
        let raw = self.model.predict(&features).map_err(|e| {
            tracing::warn!("Fare model failed: {}", e);
            EstimateError::ModelInvocation(e)
        })?;

        let multiplier =
            weather_multiplier(pickup.weather.as_ref(), dropoff.weather.as_ref(), weight);
        let quote = adjust_fare(raw, trip.passenger_count(), multiplier, &self.params)?;

        tracing::info!(
            distance_miles,
            raw_prediction = quote.raw_prediction,
            fare = quote.fare,
            "Fare estimated"
        );

        Ok(FareReport {
            map: MapView::for_trip(&pickup.coordinate, &dropoff.coordinate),
            pickup,
            dropoff,
            trip,
            distance_miles,
            pickup_weight: weight,
            temperature_f,
            features,
            quote,
            model_name: self.model.name().to_string(),
        })
    }

    async fn resolve_leg(
        &self,
        leg: Leg,
        input: &LegInput,
    ) -> Result<ResolvedAddress, EstimateError> {
        match input {
            LegInput::Coordinates(coordinate) => {
                if !coordinate.is_valid() {
                    return Err(InputError::InvalidCoordinate {
                        field: leg.as_field(),
                        latitude: coordinate.latitude,
                        longitude: coordinate.longitude,
                    }
                    .into());
                }
                Ok(ResolvedAddress {
                    coordinate: *coordinate,
                    formatted_address: MANUAL_LABEL.to_string(),
                })
            }
            LegInput::Address(address) => self.geocoder.resolve(address).await.map_err(|source| {
                tracing::warn!("Geocoding {} failed: {}", leg, source);
                EstimateError::AddressNotResolved { leg, source }
            }),
        }
    }

    async fn lookup_weather(
        &self,
        leg: Leg,
        coordinate: Coordinate,
    ) -> Result<WeatherReading, EstimateError> {
        let reading = self
            .weather
            .lookup(&WeatherQuery::Coordinates(coordinate))
            .await
            .map_err(|source| {
                tracing::warn!("Weather lookup for {} failed: {}", leg, source);
                EstimateError::WeatherUnavailable { leg, source }
            })?;

        if !reading.temperature_f.is_finite() {
            let source = WeatherError::Parse(format!("temperature {}", reading.temperature_f));
            tracing::warn!("Weather lookup for {} failed: {}", leg, source);
            return Err(EstimateError::WeatherUnavailable { leg, source });
        }
        tracing::debug!(
            %leg,
            temperature_f = reading.temperature_f,
            condition = %reading.condition
        );
        Ok(reading)
    }
}

/// Single temperature fed to the model.
///
/// Blended mode weights both legs like the weather surcharge does; single
/// mode uses the pickup reading alone.
fn representative_temperature(
    pickup: Option<&WeatherReading>,
    dropoff: Option<&WeatherReading>,
    mode: WeatherMode,
    pickup_weight: f64,
) -> Result<f64, InputError> {
    let pickup = pickup.ok_or(InputError::Incomplete("pickup temperature"))?;
    match mode {
        WeatherMode::Single => Ok(pickup.temperature_f),
        WeatherMode::Blended => {
            let dropoff = dropoff.ok_or(InputError::Incomplete("dropoff temperature"))?;
            Ok(blend(pickup.temperature_f, dropoff.temperature_f, pickup_weight))
        }
    }
}

fn weather_multiplier(
    pickup: Option<&WeatherReading>,
    dropoff: Option<&WeatherReading>,
    pickup_weight: f64,
) -> WeatherMultiplier {
    let pickup_factor = pickup.map_or(DEFAULT_WEATHER_FACTOR, |r| weather_factor(&r.condition));
    match dropoff {
        Some(reading) => {
            let dropoff_factor = weather_factor(&reading.condition);
            WeatherMultiplier::blended(pickup_factor, dropoff_factor, pickup_weight)
        }
        None => WeatherMultiplier::single(pickup_factor),
    }
}
