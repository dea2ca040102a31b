//! Model input features.
//!
//! [`FeatureVector`] is a named record rather than a bare array. The
//! positional layout the model was trained on is pinned once, in
//! [`FEATURE_NAMES`] and [`FeatureVector::to_array`], and model artifacts are
//! checked against it when loaded.

use serde::Serialize;

use crate::geo::manhattan_distance;
use crate::reference::ReferencePoint;
use crate::trip::TripRequest;

pub const FEATURE_COUNT: usize = 20;

/// Column names in training order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "pickup_latitude",
    "pickup_longitude",
    "dropoff_latitude",
    "dropoff_longitude",
    "passenger_count",
    "pickup_hour",
    "pickup_day",
    "pickup_month",
    "pickup_year",
    "dist_to_center",
    "pickup_dist_jfk",
    "dropoff_dist_jfk",
    "pickup_dist_ewr",
    "dropoff_dist_ewr",
    "pickup_dist_lga",
    "dropoff_dist_lga",
    "longitude_diff",
    "latitude_diff",
    "manhattan_distance",
    "temperature",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub dropoff_latitude: f64,
    pub dropoff_longitude: f64,
    pub passenger_count: f64,
    pub pickup_hour: f64,
    pub pickup_day: f64,
    pub pickup_month: f64,
    pub pickup_year: f64,
    pub dist_to_center: f64,
    pub pickup_dist_jfk: f64,
    pub dropoff_dist_jfk: f64,
    pub pickup_dist_ewr: f64,
    pub dropoff_dist_ewr: f64,
    pub pickup_dist_lga: f64,
    pub dropoff_dist_lga: f64,
    pub longitude_diff: f64,
    pub latitude_diff: f64,
    pub manhattan_distance: f64,
    pub temperature: f64,
}

impl FeatureVector {
    /// Values in [`FEATURE_NAMES`] order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.pickup_latitude,
            self.pickup_longitude,
            self.dropoff_latitude,
            self.dropoff_longitude,
            self.passenger_count,
            self.pickup_hour,
            self.pickup_day,
            self.pickup_month,
            self.pickup_year,
            self.dist_to_center,
            self.pickup_dist_jfk,
            self.dropoff_dist_jfk,
            self.pickup_dist_ewr,
            self.dropoff_dist_ewr,
            self.pickup_dist_lga,
            self.dropoff_dist_lga,
            self.longitude_diff,
            self.latitude_diff,
            self.manhattan_distance,
            self.temperature,
        ]
    }

    /// `(name, value)` pairs in training order, handy for logging.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_array())
    }
}

/// Derive model features for a trip.
///
/// `temperature_f` is the single representative temperature for the trip,
/// normally the distance-weighted blend of both legs. Callers must check it
/// is present before building; a non-finite value is a caller bug.
pub fn build_features(request: &TripRequest, temperature_f: f64) -> FeatureVector {
    debug_assert!(temperature_f.is_finite(), "temperature must be finite");

    let pickup = request.pickup();
    let dropoff = request.dropoff();
    let [jfk, ewr, lga] = ReferencePoint::AIRPORTS;

    FeatureVector {
        pickup_latitude: pickup.latitude,
        pickup_longitude: pickup.longitude,
        dropoff_latitude: dropoff.latitude,
        dropoff_longitude: dropoff.longitude,
        passenger_count: f64::from(request.passenger_count()),
        pickup_hour: f64::from(request.hour()),
        pickup_day: f64::from(request.day()),
        pickup_month: f64::from(request.month()),
        pickup_year: f64::from(request.year()),
        dist_to_center: ReferencePoint::CITY_CENTER.distance_from(&pickup),
        pickup_dist_jfk: jfk.distance_from(&pickup),
        dropoff_dist_jfk: jfk.distance_from(&dropoff),
        pickup_dist_ewr: ewr.distance_from(&pickup),
        dropoff_dist_ewr: ewr.distance_from(&dropoff),
        pickup_dist_lga: lga.distance_from(&pickup),
        dropoff_dist_lga: lga.distance_from(&dropoff),
        longitude_diff: dropoff.longitude - pickup.longitude,
        latitude_diff: dropoff.latitude - pickup.latitude,
        manhattan_distance: manhattan_distance(&pickup, &dropoff),
        temperature: temperature_f,
    }
}
