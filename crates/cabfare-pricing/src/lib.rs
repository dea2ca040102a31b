//! Fare pricing core for cabfare.
//!
//! Pure computations only: trip feature derivation, weather surcharges and
//! fare adjustment. The regression model is consumed through [`FareModel`]
//! and never trained here.

pub mod adjust;
pub mod error;
pub mod features;
pub mod geo;
pub mod map;
pub mod model;
pub mod reference;
pub mod trip;
pub mod weather_factor;

pub use adjust::{
    adjust_fare, blend, passenger_multiplier, pickup_weight, FareQuote, PricingParams,
    WeatherMultiplier,
};
pub use error::{InputError, ModelError};
pub use features::{build_features, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use geo::{haversine_miles, manhattan_distance, Coordinate};
pub use map::MapView;
pub use model::{FareModel, LinearModel, ModelArtifact, TreeEnsembleModel};
pub use reference::ReferencePoint;
pub use trip::TripRequest;
pub use weather_factor::weather_factor;
