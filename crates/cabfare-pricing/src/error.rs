//! Pricing error types.

use thiserror::Error;

/// Rejected trip input. Raised before any feature is built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Passenger count {0} outside 1..={}", crate::trip::MAX_PASSENGERS)]
    PassengerCount(u8),

    #[error("Invalid {field} coordinate: ({latitude}, {longitude})")]
    InvalidCoordinate {
        field: &'static str,
        latitude: f64,
        longitude: f64,
    },

    #[error("Incomplete input: missing {0}")]
    Incomplete(&'static str),
}

impl InputError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::PassengerCount(_) => {
                format!("Choose between 1 and {} passengers.", crate::trip::MAX_PASSENGERS)
            }
            Self::InvalidCoordinate { field, .. } => {
                format!("The {} location is not a valid coordinate.", field)
            }
            Self::Incomplete(what) => format!("Missing {}. Cannot estimate a fare.", what),
        }
    }
}

/// Errors raised while loading or invoking the fare model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model feature schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Malformed model artifact: {0}")]
    Malformed(String),

    #[error("Model produced a non-finite prediction: {0}")]
    NonFinite(f64),
}

impl ModelError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(_) => "The fare model file could not be read.".to_string(),
            Self::Parse(_) | Self::Malformed(_) => "The fare model file is corrupted.".to_string(),
            Self::SchemaMismatch(_) => {
                "The fare model does not match this version of cabfare.".to_string()
            }
            Self::NonFinite(_) => "The fare model returned an invalid estimate.".to_string(),
        }
    }
}
