use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

use crate::error::InputError;
use crate::geo::Coordinate;

pub const MIN_PASSENGERS: u8 = 1;
pub const MAX_PASSENGERS: u8 = 6;

/// A validated trip. Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRequest {
    pickup: Coordinate,
    dropoff: Coordinate,
    pickup_at: NaiveDateTime,
    passenger_count: u8,
}

impl TripRequest {
    pub fn new(
        pickup: Coordinate,
        dropoff: Coordinate,
        date: NaiveDate,
        time: NaiveTime,
        passenger_count: u8,
    ) -> Result<Self, InputError> {
        if !(MIN_PASSENGERS..=MAX_PASSENGERS).contains(&passenger_count) {
            return Err(InputError::PassengerCount(passenger_count));
        }
        for (field, coord) in [("pickup", &pickup), ("dropoff", &dropoff)] {
            if !coord.is_valid() {
                return Err(InputError::InvalidCoordinate {
                    field,
                    latitude: coord.latitude,
                    longitude: coord.longitude,
                });
            }
        }

        Ok(Self {
            pickup,
            dropoff,
            pickup_at: date.and_time(time),
            passenger_count,
        })
    }

    pub fn pickup(&self) -> Coordinate {
        self.pickup
    }

    pub fn dropoff(&self) -> Coordinate {
        self.dropoff
    }

    pub fn pickup_at(&self) -> NaiveDateTime {
        self.pickup_at
    }

    pub fn passenger_count(&self) -> u8 {
        self.passenger_count
    }

    pub fn hour(&self) -> u32 {
        self.pickup_at.hour()
    }

    pub fn day(&self) -> u32 {
        self.pickup_at.day()
    }

    pub fn month(&self) -> u32 {
        self.pickup_at.month()
    }

    pub fn year(&self) -> i32 {
        self.pickup_at.year()
    }
}
