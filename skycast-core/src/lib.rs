//! Core library for the `skycast` dashboard.
//!
//! This crate defines:
//! - Geocoding and the current/hourly weather and air quality fetchers
//! - PM2.5 to air quality index derivation and banding
//! - The lookup pipeline and the presenter interface it reports to
//! - Configuration handling and the error taxonomy
//!
//! It is used by `skycast-cli`, but any other front end can drive the
//! [`Pipeline`] with its own [`Presenter`].

pub mod aqi;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod presenter;
pub mod provider;

pub use aqi::{AqiBand, StatusTier, classify, derive_index};
pub use config::{Config, Endpoints};
pub use error::{DashboardError, Stage};
pub use model::{
    AirQualitySnapshot, AirReading, Coordinates, DashboardBundle, HOURLY_WINDOW, HourlySeries,
    SeriesDomain, WeatherSnapshot,
};
pub use pipeline::Pipeline;
pub use presenter::{Phase, Presenter};
pub use provider::{
    WeatherSource, open_meteo::OpenMeteoProvider, source_from_config, weather::weather_description,
};
