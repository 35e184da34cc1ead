use chrono::{DateTime, Utc};
use model::time::window::WindowError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("Invalid resolution '{0}': expected digits followed by one of s, m, h, d")]
    InvalidResolution(String),

    #[error("Unsupported rollup of {seconds} seconds")]
    UnsupportedRollup { seconds: u64 },

    #[error("Invalid {field} timestamp '{value}': expected seconds since the UNIX epoch")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("Window start {start} is after its end {end}")]
    InvertedWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Window error: {0}")]
    Window(#[from] WindowError),
}

impl StatsError {
    /// Name of the query parameter that caused the error, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            StatsError::InvalidResolution(_) | StatsError::UnsupportedRollup { .. } => {
                Some("resolution")
            }
            StatsError::InvalidTimestamp { field, .. } => Some(*field),
            StatsError::InvertedWindow { .. } => Some("since"),
            StatsError::Window(_) => None,
        }
    }
}
