use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{Coordinates, DashboardError, Stage, WeatherSnapshot};

use super::open_meteo::{OpenMeteoProvider, coordinate_query};

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";

/// Short lowercase phrase for a WMO weather code, or `"unknown"`.
pub fn weather_description(code: i64) -> &'static str {
    match code {
        0 => "clear sky",
        1 => "mainly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 => "foggy",
        48 => "depositing rime fog",
        51 => "light drizzle",
        53 => "moderate drizzle",
        55 => "dense drizzle",
        61 => "slight rain",
        63 => "moderate rain",
        65 => "heavy rain",
        71 => "slight snow",
        73 => "moderate snow",
        75 => "heavy snow",
        80 => "slight rain showers",
        81 => "moderate rain showers",
        82 => "violent rain showers",
        85 => "slight snow showers",
        86 => "heavy snow showers",
        95 => "thunderstorm",
        _ => "unknown",
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    current: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    weather_code: Option<i64>,
    wind_speed_10m: f64,
}

impl OpenMeteoProvider {
    pub async fn current_weather(
        &self,
        coords: &Coordinates,
        cancel: &CancellationToken,
    ) -> Result<WeatherSnapshot, DashboardError> {
        let mut query = coordinate_query(coords);
        query.push(("current", CURRENT_FIELDS.to_string()));
        query.push(("wind_speed_unit", "ms".to_string()));

        let parsed: CurrentWeatherResponse = self
            .get_json(Stage::Weather, &self.endpoints.forecast, &query, cancel)
            .await?;

        Ok(to_snapshot(parsed.current, coords))
    }
}

fn to_snapshot(current: CurrentWeather, coords: &Coordinates) -> WeatherSnapshot {
    let description = current
        .weather_code
        .map(weather_description)
        .unwrap_or("unknown");

    WeatherSnapshot {
        temperature_c: current.temperature_2m.round() as i32,
        description: description.to_string(),
        humidity_pct: current.relative_humidity_2m,
        wind_speed_mps: current.wind_speed_10m,
        city_name: coords.name.clone(),
        country_code: coords.country_code.clone(),
    }
}
