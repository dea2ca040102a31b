//! Coordinates and the two distance measures used for pricing.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_MILES: f64 = 3958.7613;

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both components are finite and inside WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Point halfway between `self` and `other` in degree space.
    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        Coordinate::new(
            (self.latitude + other.latitude) / 2.0,
            (self.longitude + other.longitude) / 2.0,
        )
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = String;

    /// Parses `"lat,lon"`, whitespace around either part allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| format!("expected \"lat,lon\", got \"{}\"", s))?;
        let latitude = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("bad latitude \"{}\": {}", lat.trim(), e))?;
        let longitude = lon
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("bad longitude \"{}\": {}", lon.trim(), e))?;
        let coord = Coordinate::new(latitude, longitude);
        if !coord.is_valid() {
            return Err(format!("coordinate out of range: {}", coord));
        }
        Ok(coord)
    }
}

/// Cityblock distance in degrees: `|Δlat| + |Δlon|`.
pub fn manhattan_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    (a.latitude - b.latitude).abs() + (a.longitude - b.longitude).abs()
}

/// Great-circle distance in statute miles.
pub fn haversine_miles(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_MILES * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const LOWER_MANHATTAN: Coordinate = Coordinate::new(40.7128, -74.0060);
    const EAST_VILLAGE: Coordinate = Coordinate::new(40.7306, -73.9352);

    #[test]
    fn test_manhattan_distance_symmetric() {
        let pairs = [
            (LOWER_MANHATTAN, EAST_VILLAGE),
            (Coordinate::new(0.0, 0.0), Coordinate::new(-12.5, 170.25)),
            (Coordinate::new(40.77, -73.87), Coordinate::new(40.69, -74.175)),
        ];
        for (a, b) in pairs {
            assert_eq!(manhattan_distance(&a, &b), manhattan_distance(&b, &a));
        }
    }

    #[test]
    fn test_manhattan_distance_zero_for_same_point() {
        assert_eq!(manhattan_distance(&LOWER_MANHATTAN, &LOWER_MANHATTAN), 0.0);
        assert_eq!(manhattan_distance(&EAST_VILLAGE, &EAST_VILLAGE), 0.0);
    }

    #[test]
    fn test_manhattan_distance_value() {
        assert_relative_eq!(
            manhattan_distance(&LOWER_MANHATTAN, &EAST_VILLAGE),
            0.0886,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_haversine_known_distance() {
        // JFK to LGA is roughly 9.8 miles as the crow flies
        let jfk = Coordinate::new(40.6441667, -73.7822222);
        let lga = Coordinate::new(40.77, -73.87);
        let d = haversine_miles(&jfk, &lga);
        assert!((9.5..10.2).contains(&d), "unexpected distance {}", d);
        assert_relative_eq!(d, haversine_miles(&lga, &jfk), epsilon = 1e-9);
        assert_eq!(haversine_miles(&jfk, &jfk), 0.0);
    }

    #[test]
    fn test_parse_coordinate() {
        let c: Coordinate = "40.7128, -74.0060".parse().unwrap();
        assert_eq!(c, LOWER_MANHATTAN);
        assert!("40.7".parse::<Coordinate>().is_err());
        assert!("abc,1".parse::<Coordinate>().is_err());
        assert!("91.0,0".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_midpoint() {
        let m = Coordinate::new(0.0, 0.0).midpoint(&Coordinate::new(2.0, -4.0));
        assert_eq!(m, Coordinate::new(1.0, -2.0));
    }
}
