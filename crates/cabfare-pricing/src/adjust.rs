//! Turning a raw model prediction into the displayed fare.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

pub const DEFAULT_PASSENGER_SURCHARGE: f64 = 0.10;
pub const DEFAULT_BLEND_RADIUS_MILES: f64 = 5.0;

/// Tunable pricing heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingParams {
    /// Extra fraction of the base fare per passenger beyond the first.
    pub passenger_surcharge: f64,
    /// Pickup weight is `radius / distance`, capped at 0.5.
    pub blend_radius_miles: f64,
}

impl Default for PricingParams {
    fn default() -> Self {
        Self {
            passenger_surcharge: DEFAULT_PASSENGER_SURCHARGE,
            blend_radius_miles: DEFAULT_BLEND_RADIUS_MILES,
        }
    }
}

/// `1 + surcharge × (passengers − 1)`.
pub fn passenger_multiplier(passenger_count: u8, surcharge: f64) -> f64 {
    1.0 + surcharge * f64::from(passenger_count.saturating_sub(1))
}

/// Weight given to pickup-side conditions for a trip of `distance_miles`.
///
/// `radius / distance`, capped at 0.5. Trips up to twice the radius weight
/// both ends equally; longer trips lean toward the dropoff, tending to 0.
pub fn pickup_weight(distance_miles: f64, radius_miles: f64) -> f64 {
    let radius = radius_miles.max(0.0);
    if distance_miles > 0.0 {
        (radius / distance_miles).min(0.5)
    } else {
        0.5
    }
}

/// `pickup × weight + dropoff × (1 − weight)`.
pub fn blend(pickup: f64, dropoff: f64, pickup_weight: f64) -> f64 {
    pickup * pickup_weight + dropoff * (1.0 - pickup_weight)
}

/// Weather surcharge for a trip, from one or both endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WeatherMultiplier {
    Single(SingleFactor),
    Blended {
        pickup: f64,
        dropoff: f64,
        pickup_weight: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SingleFactor {
    pub factor: f64,
}

impl WeatherMultiplier {
    pub fn single(factor: f64) -> Self {
        Self::Single(SingleFactor { factor })
    }

    pub fn blended(pickup: f64, dropoff: f64, pickup_weight: f64) -> Self {
        Self::Blended {
            pickup,
            dropoff,
            pickup_weight,
        }
    }

    pub fn value(&self) -> f64 {
        match *self {
            Self::Single(SingleFactor { factor }) => factor,
            Self::Blended {
                pickup,
                dropoff,
                pickup_weight,
            } => blend(pickup, dropoff, pickup_weight),
        }
    }
}

/// Final fare with its breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FareQuote {
    /// Model output as returned.
    pub raw_prediction: f64,
    /// Magnitude of the raw prediction.
    pub base_fare: f64,
    pub passenger_multiplier: f64,
    pub weather: WeatherMultiplier,
    pub weather_multiplier: f64,
    pub fare: f64,
}

/// Apply passenger and weather surcharges to a raw model prediction.
///
/// The model can emit negative values; the magnitude is used. This keeps
/// compatibility with existing fares but is a heuristic, not a domain rule.
pub fn adjust_fare(
    raw_prediction: f64,
    passenger_count: u8,
    weather: WeatherMultiplier,
    params: &PricingParams,
) -> Result<FareQuote, ModelError> {
    if !raw_prediction.is_finite() {
        return Err(ModelError::NonFinite(raw_prediction));
    }

    let base_fare = raw_prediction.abs();
    let passenger_multiplier = passenger_multiplier(passenger_count, params.passenger_surcharge);
    let weather_multiplier = weather.value();
    let fare = base_fare * passenger_multiplier * weather_multiplier;

    if raw_prediction < 0.0 {
        tracing::debug!(raw_prediction, "negative model output, using magnitude");
    }

    Ok(FareQuote {
        raw_prediction,
        base_fare,
        passenger_multiplier,
        weather,
        weather_multiplier,
        fare,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather_factor::weather_factor;
    use approx::assert_relative_eq;

    #[test]
    fn test_passenger_multiplier_single_rider() {
        assert_eq!(passenger_multiplier(1, DEFAULT_PASSENGER_SURCHARGE), 1.0);
    }

    #[test]
    fn test_passenger_multiplier_strictly_increasing() {
        let values: Vec<f64> = (1..=6)
            .map(|n| passenger_multiplier(n, DEFAULT_PASSENGER_SURCHARGE))
            .collect();
        for pair in values.windows(2) {
            assert!(pair[1] > pair[0], "{:?}", values);
        }
        assert_relative_eq!(values[5], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_pickup_weight_equal_at_zero() {
        assert_eq!(pickup_weight(0.0, DEFAULT_BLEND_RADIUS_MILES), 0.5);
    }

    #[test]
    fn test_pickup_weight_monotonic() {
        let mut last = f64::INFINITY;
        for step in 0..200 {
            let d = f64::from(step) * 0.5;
            let w = pickup_weight(d, DEFAULT_BLEND_RADIUS_MILES);
            assert!(w <= last, "weight rose at {} miles", d);
            assert!((0.0..=0.5).contains(&w));
            last = w;
        }
        assert!(pickup_weight(1000.0, DEFAULT_BLEND_RADIUS_MILES) < 0.01);
    }

    #[test]
    fn test_pickup_weight_follows_radius_over_distance() {
        assert_eq!(pickup_weight(3.0, DEFAULT_BLEND_RADIUS_MILES), 0.5);
        assert_eq!(pickup_weight(10.0, DEFAULT_BLEND_RADIUS_MILES), 0.5);
        assert_eq!(pickup_weight(20.0, DEFAULT_BLEND_RADIUS_MILES), 0.25);
        assert_relative_eq!(
            pickup_weight(50.0, DEFAULT_BLEND_RADIUS_MILES),
            0.1,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_temperature_blend_at_twenty_miles() {
        let weight = pickup_weight(20.0, DEFAULT_BLEND_RADIUS_MILES);
        assert_relative_eq!(blend(40.0, 60.0, weight), 55.0, epsilon = 1e-12);
    }

    #[test]
    fn test_same_point_is_simple_average() {
        let weather = WeatherMultiplier::blended(1.20, 1.00, pickup_weight(0.0, 5.0));
        assert_relative_eq!(weather.value(), 1.10, epsilon = 1e-12);
    }

    #[test]
    fn test_single_factor() {
        assert_eq!(WeatherMultiplier::single(1.3).value(), 1.3);
    }

    #[test]
    fn test_fare_non_negative() {
        let params = PricingParams::default();
        for raw in [-1e6, -22.5, -0.0, 0.0, 3.2, 1e6] {
            let quote = adjust_fare(raw, 4, WeatherMultiplier::single(1.05), &params).unwrap();
            assert!(quote.fare >= 0.0, "raw {} gave {}", raw, quote.fare);
        }
    }

    #[test]
    fn test_negative_prediction_uses_magnitude() {
        let params = PricingParams::default();
        let pos = adjust_fare(10.0, 1, WeatherMultiplier::single(1.0), &params).unwrap();
        let neg = adjust_fare(-10.0, 1, WeatherMultiplier::single(1.0), &params).unwrap();
        assert_eq!(pos.fare, neg.fare);
        assert_eq!(neg.raw_prediction, -10.0);
    }

    #[test]
    fn test_non_finite_prediction_rejected() {
        let params = PricingParams::default();
        for raw in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = adjust_fare(raw, 1, WeatherMultiplier::single(1.0), &params).unwrap_err();
            assert!(matches!(err, ModelError::NonFinite(_)));
        }
    }

    #[test]
    fn test_end_to_end_rain_then_clear() {
        let weather =
            WeatherMultiplier::blended(weather_factor("Rain"), weather_factor("Clear"), 0.5);
        let quote = adjust_fare(22.50, 3, weather, &PricingParams::default()).unwrap();

        assert_relative_eq!(quote.weather_multiplier, 1.10, epsilon = 1e-12);
        assert_relative_eq!(quote.passenger_multiplier, 1.20, epsilon = 1e-12);
        assert_relative_eq!(quote.fare, 29.70, epsilon = 1e-9);
    }

    #[test]
    fn test_blend() {
        assert_eq!(blend(40.0, 50.0, 1.0), 40.0);
        assert_eq!(blend(40.0, 50.0, 0.0), 50.0);
        assert_relative_eq!(blend(40.0, 50.0, 0.25), 47.5, epsilon = 1e-12);
    }
}
