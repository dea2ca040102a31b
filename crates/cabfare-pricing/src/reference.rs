//! Fixed New York area landmarks used for distance features.

use serde::Serialize;

use crate::geo::Coordinate;

/// A named landmark coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferencePoint {
    pub name: &'static str,
    pub coordinate: Coordinate,
}

impl ReferencePoint {
    /// Lower Manhattan, City Hall.
    pub const CITY_CENTER: ReferencePoint = ReferencePoint {
        name: "city_center",
        coordinate: Coordinate::new(40.7141667, -74.0063889),
    };

    /// John F. Kennedy International Airport.
    pub const JFK: ReferencePoint = ReferencePoint {
        name: "jfk",
        coordinate: Coordinate::new(40.6441667, -73.7822222),
    };

    /// Newark Liberty International Airport.
    pub const EWR: ReferencePoint = ReferencePoint {
        name: "ewr",
        coordinate: Coordinate::new(40.69, -74.175),
    };

    /// LaGuardia Airport.
    pub const LGA: ReferencePoint = ReferencePoint {
        name: "lga",
        coordinate: Coordinate::new(40.77, -73.87),
    };

    /// Airports in feature order.
    pub const AIRPORTS: [ReferencePoint; 3] = [Self::JFK, Self::EWR, Self::LGA];

    /// Cityblock distance from `point` to this landmark.
    pub fn distance_from(&self, point: &Coordinate) -> f64 {
        crate::geo::manhattan_distance(&self.coordinate, point)
    }
}
