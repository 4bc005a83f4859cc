use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{Coordinates, DashboardError, HourlySeries, SeriesDomain, Stage};

use super::open_meteo::{OpenMeteoProvider, coordinate_query};

/// Local time as sent with `timezone=auto`, e.g. `2026-10-19T14:00`.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
struct HourlyResponse {
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    #[serde(flatten)]
    channels: BTreeMap<String, Vec<Option<f64>>>,
}

impl OpenMeteoProvider {
    /// One-day hourly forecast for `domain`, or `None` if anything goes wrong.
    pub async fn hourly_series(
        &self,
        coords: &Coordinates,
        domain: SeriesDomain,
        cancel: &CancellationToken,
    ) -> Option<HourlySeries> {
        match self.try_hourly_series(coords, domain, cancel).await {
            Ok(series) => Some(series),
            Err(err) => {
                tracing::warn!(%domain, error = %err, "hourly series unavailable");
                None
            }
        }
    }

    async fn try_hourly_series(
        &self,
        coords: &Coordinates,
        domain: SeriesDomain,
        cancel: &CancellationToken,
    ) -> Result<HourlySeries, DashboardError> {
        let (stage, url) = match domain {
            SeriesDomain::Weather => (Stage::HourlyWeather, &self.endpoints.forecast),
            SeriesDomain::Air => (Stage::HourlyAir, &self.endpoints.air_quality),
        };

        let mut query = coordinate_query(coords);
        query.push(("hourly", domain.channels().join(",")));
        query.push(("forecast_days", "1".to_string()));

        let parsed: HourlyResponse = self.get_json(stage, url, &query, cancel).await?;
        let block = parsed.hourly.ok_or_else(|| DashboardError::DataUnavailable {
            stage,
            reason: "response has no hourly block".to_string(),
        })?;

        to_series(stage, domain, block)
    }
}

fn to_series(
    stage: Stage,
    domain: SeriesDomain,
    block: HourlyBlock,
) -> Result<HourlySeries, DashboardError> {
    let unavailable = |reason: String| DashboardError::DataUnavailable { stage, reason };

    let timestamps = block
        .time
        .iter()
        .map(|t| {
            NaiveDateTime::parse_from_str(t, TIME_FORMAT)
                .map_err(|e| unavailable(format!("bad timestamp '{t}': {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let wanted = domain.channels();
    let channels: BTreeMap<String, Vec<Option<f64>>> = block
        .channels
        .into_iter()
        .filter(|(name, _)| wanted.contains(&name.as_str()))
        .collect();

    if channels.is_empty() {
        return Err(unavailable("none of the requested channels present".to_string()));
    }

    HourlySeries::new(timestamps, channels).map_err(unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> HourlyBlock {
        serde_json::from_str::<HourlyResponse>(json)
            .expect("valid hourly JSON")
            .hourly
            .expect("hourly block")
    }

    #[test]
    fn builds_aligned_weather_series() {
        let block = parse(
            r#"{"hourly":{
                "time":["2026-10-19T00:00","2026-10-19T01:00"],
                "temperature_2m":[21.5,21.0],
                "relative_humidity_2m":[70,72],
                "weather_code":[3,61],
                "precipitation":[0.0,null]
            }}"#,
        );

        let series = to_series(Stage::HourlyWeather, SeriesDomain::Weather, block).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.channel("weather_code").unwrap(), &[Some(3.0), Some(61.0)]);
        assert_eq!(series.channel("precipitation").unwrap(), &[Some(0.0), None]);
    }

    #[test]
    fn unrequested_channels_are_dropped() {
        let block = parse(
            r#"{"hourly":{
                "time":["2026-10-19T00:00"],
                "pm2_5":[8.1],
                "european_aqi":[20]
            }}"#,
        );

        let series = to_series(Stage::HourlyAir, SeriesDomain::Air, block).unwrap();
        assert!(series.channel("pm2_5").is_some());
        assert!(series.channel("european_aqi").is_none());
    }

    #[test]
    fn misaligned_channel_is_unavailable() {
        let block = parse(
            r#"{"hourly":{
                "time":["2026-10-19T00:00","2026-10-19T01:00"],
                "pm2_5":[8.1]
            }}"#,
        );

        let err = to_series(Stage::HourlyAir, SeriesDomain::Air, block).unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[test]
    fn bad_timestamp_is_unavailable() {
        let block = parse(r#"{"hourly":{"time":["yesterday"],"pm10":[1.0]}}"#);

        let err = to_series(Stage::HourlyAir, SeriesDomain::Air, block).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn no_requested_channels_is_unavailable() {
        let block = parse(r#"{"hourly":{"time":["2026-10-19T00:00"]}}"#);
        assert!(to_series(Stage::HourlyWeather, SeriesDomain::Weather, block).is_err());
    }
}
