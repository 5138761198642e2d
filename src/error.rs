//! Error types for route planning.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// A latitude/longitude pair is non-finite or out of range.
    #[error("invalid location for {owner}: lat={lat}, lng={lng}")]
    InvalidLocation { owner: String, lat: f64, lng: f64 },
    /// A stop carries a priority outside {low, medium, high}.
    #[error("invalid priority for stop {stop_id}: {value:?}")]
    InvalidPriority { stop_id: String, value: String },
    /// A stop carries a negative or non-finite service duration.
    #[error("invalid service duration for stop {stop_id}: {duration}")]
    InvalidDuration { stop_id: String, duration: f64 },
    #[error("duplicate stop id: {0}")]
    DuplicateStop(String),
    /// A configuration value is outside its usable range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_location(owner: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self::InvalidLocation { owner: owner.into(), lat, lng }
    }

    pub fn invalid_priority(stop_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidPriority { stop_id: stop_id.into(), value: value.into() }
    }

    /// True for errors raised by request validation rather than file loading.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidLocation { .. }
                | Error::InvalidPriority { .. }
                | Error::InvalidDuration { .. }
                | Error::DuplicateStop(_)
                | Error::InvalidConfig(_)
        )
    }
}
