use serde::Serialize;

use crate::geo::{haversine_miles, Coordinate};

/// Initial map viewport showing both trip endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub pitch: u8,
}

impl MapView {
    const PITCH: u8 = 45;

    pub fn for_trip(pickup: &Coordinate, dropoff: &Coordinate) -> Self {
        Self {
            center: pickup.midpoint(dropoff),
            zoom: zoom_for_distance(haversine_miles(pickup, dropoff)),
            pitch: Self::PITCH,
        }
    }
}

/// Closer zoom for shorter trips.
pub fn zoom_for_distance(distance_miles: f64) -> u8 {
    match distance_miles {
        d if d < 2.0 => 14,
        d if d < 10.0 => 13,
        d if d < 25.0 => 12,
        d if d < 50.0 => 11,
        d if d < 100.0 => 10,
        _ => 8,
    }
}
