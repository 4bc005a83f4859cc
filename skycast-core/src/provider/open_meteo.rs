use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::{
    AirQualitySnapshot, Config, Coordinates, DashboardError, HourlySeries, SeriesDomain, Stage,
    WeatherSnapshot, config::Endpoints,
};

use super::WeatherSource;

/// Open-Meteo geocoding, forecast and air quality APIs. No API key needed.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    pub(crate) http: Client,
    pub(crate) endpoints: Endpoints,
}

impl OpenMeteoProvider {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            http: Client::new(),
            endpoints,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoints: config.endpoints.clone(),
        })
    }

    /// One GET, decoded as JSON. Non-success statuses become `Upstream` with the
    /// status code; the request is abandoned as soon as `cancel` fires.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        stage: Stage,
        url: &str,
        query: &[(&str, String)],
        cancel: &CancellationToken,
    ) -> Result<T, DashboardError> {
        let request = async {
            tracing::debug!(%stage, url, "sending request");

            let res = self
                .http
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|source| DashboardError::Network { stage, source })?;

            let status = res.status();
            let body = res
                .text()
                .await
                .map_err(|source| DashboardError::Network { stage, source })?;

            if !status.is_success() {
                return Err(DashboardError::Upstream {
                    stage,
                    status: status.as_u16(),
                    body: truncate_body(&body),
                });
            }

            serde_json::from_str(&body).map_err(|source| DashboardError::Malformed { stage, source })
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DashboardError::Cancelled),
            result = request => result,
        }
    }
}

/// Query pairs every coordinate-based request starts with.
pub(crate) fn coordinate_query(coords: &Coordinates) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", coords.latitude.to_string()),
        ("longitude", coords.longitude.to_string()),
        ("timezone", "auto".to_string()),
    ]
}

#[async_trait]
impl WeatherSource for OpenMeteoProvider {
    async fn resolve(
        &self,
        city: &str,
        cancel: &CancellationToken,
    ) -> Result<Coordinates, DashboardError> {
        self.geocode(city, cancel).await
    }

    async fn fetch_current_weather(
        &self,
        coords: &Coordinates,
        cancel: &CancellationToken,
    ) -> Result<WeatherSnapshot, DashboardError> {
        self.current_weather(coords, cancel).await
    }

    async fn fetch_current_air_quality(
        &self,
        coords: &Coordinates,
        cancel: &CancellationToken,
    ) -> AirQualitySnapshot {
        self.current_air_quality(coords, cancel).await
    }

    async fn fetch_hourly(
        &self,
        coords: &Coordinates,
        domain: SeriesDomain,
        cancel: &CancellationToken,
    ) -> Option<HourlySeries> {
        self.hourly_series(coords, domain, cancel).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
