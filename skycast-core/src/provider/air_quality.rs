use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{
    AirQualitySnapshot, Coordinates, Stage,
    aqi::{classify, derive_index},
    model::AirReading,
};

use super::open_meteo::{OpenMeteoProvider, coordinate_query};

/// Label when the service answered but has no PM2.5 reading for the place.
pub const NO_DATA_LABEL: &str = "No air quality data available for this location";
/// Label when the request itself failed.
pub const UNAVAILABLE_LABEL: &str = "Air quality data not available";

const CURRENT_FIELDS: &str = "pm2_5,us_aqi";

#[derive(Debug, Deserialize)]
struct CurrentAirResponse {
    current: Option<CurrentAir>,
}

#[derive(Debug, Deserialize)]
struct CurrentAir {
    pm2_5: Option<f64>,
    us_aqi: Option<f64>,
}

impl OpenMeteoProvider {
    /// Never fails: any upstream problem yields a snapshot without readings.
    pub async fn current_air_quality(
        &self,
        coords: &Coordinates,
        cancel: &CancellationToken,
    ) -> AirQualitySnapshot {
        let mut query = coordinate_query(coords);
        query.push(("current", CURRENT_FIELDS.to_string()));

        match self
            .get_json::<CurrentAirResponse>(Stage::AirQuality, &self.endpoints.air_quality, &query, cancel)
            .await
        {
            Ok(parsed) => to_snapshot(parsed.current),
            Err(err) => {
                tracing::warn!(error = %err, "air quality fetch failed, continuing without it");
                AirQualitySnapshot::unavailable(UNAVAILABLE_LABEL)
            }
        }
    }
}

fn to_snapshot(current: Option<CurrentAir>) -> AirQualitySnapshot {
    let Some(current) = current else {
        return AirQualitySnapshot::unavailable(NO_DATA_LABEL);
    };
    let Some(pm25) = current.pm2_5.map(|v| v.max(0.0)) else {
        return AirQualitySnapshot::unavailable(NO_DATA_LABEL);
    };

    // A zero upstream index is a real "Good" reading, only absence triggers derivation.
    let index = match current.us_aqi {
        Some(aqi) => aqi.round().max(0.0) as u32,
        None => derive_index(pm25),
    };

    AirQualitySnapshot {
        reading: Some(AirReading { pm25, index }),
        status_label: classify(index).label().to_string(),
    }
}
