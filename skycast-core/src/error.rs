//! Error taxonomy for the lookup pipeline.

use std::fmt;

use thiserror::Error;

/// The pipeline step a request belongs to. Used to give every upstream
/// failure enough context to tell which service misbehaved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Geocoding,
    Weather,
    AirQuality,
    HourlyWeather,
    HourlyAir,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Geocoding => "geocoding",
            Stage::Weather => "weather",
            Stage::AirQuality => "air quality",
            Stage::HourlyWeather => "hourly weather",
            Stage::HourlyAir => "hourly air quality",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Please enter a city name")]
    InvalidInput,

    #[error("City not found: {query}")]
    NotFound { query: String },

    #[error("{stage} service returned HTTP {status}: {body}")]
    Upstream {
        stage: Stage,
        status: u16,
        body: String,
    },

    #[error("could not reach the {stage} service: {source}")]
    Network {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage} service sent an unreadable response: {source}")]
    Malformed {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },

    #[error("{stage} data unavailable: {reason}")]
    DataUnavailable { stage: Stage, reason: String },

    #[error("lookup was superseded by a newer request")]
    Cancelled,
}

impl DashboardError {
    /// Single-line text for the dashboard's error surface.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput => "Please enter a city name.".to_string(),
            Self::NotFound { query } => {
                format!("City \"{query}\" not found. Check the spelling and try again.")
            }
            Self::Upstream { stage, status, .. } => {
                format!("The {stage} service returned an error (HTTP {status}). Please try again later.")
            }
            Self::Network { stage, .. } => {
                format!("The {stage} service is unreachable. Check your connection.")
            }
            Self::Malformed { stage, .. } => {
                format!("The {stage} service sent data we could not read.")
            }
            Self::DataUnavailable { stage, .. } => format!("No {stage} data available."),
            Self::Cancelled => "Lookup cancelled.".to_string(),
        }
    }

    /// HTTP status carried by an upstream failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
