use crate::{
    AirQualitySnapshot, Config, Coordinates, DashboardError, HourlySeries, SeriesDomain,
    WeatherSnapshot, provider::open_meteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use tokio_util::sync::CancellationToken;

pub mod air_quality;
pub mod geocode;
pub mod hourly;
pub mod open_meteo;
pub mod weather;

/// Upstream data for one lookup.
///
/// Geocoding and current weather are mandatory and return errors. Air quality
/// and hourly series are enrichment: their signatures cannot fail, and any
/// upstream problem comes back as a degraded value instead.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn resolve(
        &self,
        city: &str,
        cancel: &CancellationToken,
    ) -> Result<Coordinates, DashboardError>;

    async fn fetch_current_weather(
        &self,
        coords: &Coordinates,
        cancel: &CancellationToken,
    ) -> Result<WeatherSnapshot, DashboardError>;

    async fn fetch_current_air_quality(
        &self,
        coords: &Coordinates,
        cancel: &CancellationToken,
    ) -> AirQualitySnapshot;

    async fn fetch_hourly(
        &self,
        coords: &Coordinates,
        domain: SeriesDomain,
        cancel: &CancellationToken,
    ) -> Option<HourlySeries>;
}

/// Construct the Open-Meteo source described by `config`.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let provider = OpenMeteoProvider::from_config(config)?;
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_from_default_config_builds() {
        let cfg = Config::default();
        assert!(source_from_config(&cfg).is_ok());
    }

    #[test]
    fn source_from_config_with_timeout_builds() {
        let cfg = Config {
            timeout_secs: Some(5),
            ..Config::default()
        };
        assert!(source_from_config(&cfg).is_ok());
    }
}
