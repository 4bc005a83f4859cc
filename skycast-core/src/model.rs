use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Number of hourly entries presentation consumers chart.
pub const HOURLY_WINDOW: usize = 24;

/// Result of resolving a free-text place name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: i32,
    pub description: String,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    pub city_name: String,
    pub country_code: String,
}

/// A PM2.5 reading together with its index; one is never present without the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirReading {
    pub pm25: f64,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualitySnapshot {
    pub reading: Option<AirReading>,
    pub status_label: String,
}

impl AirQualitySnapshot {
    pub fn unavailable(label: impl Into<String>) -> Self {
        Self {
            reading: None,
            status_label: label.into(),
        }
    }

    pub fn pm25(&self) -> Option<f64> {
        self.reading.map(|r| r.pm25)
    }

    pub fn index(&self) -> Option<u32> {
        self.reading.map(|r| r.index)
    }
}

/// Which channel set an hourly request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesDomain {
    Weather,
    Air,
}

impl SeriesDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesDomain::Weather => "weather",
            SeriesDomain::Air => "air",
        }
    }

    /// Open-Meteo channel names requested for this domain.
    pub fn channels(&self) -> &'static [&'static str] {
        match self {
            SeriesDomain::Weather => &[
                "temperature_2m",
                "relative_humidity_2m",
                "weather_code",
                "precipitation",
            ],
            SeriesDomain::Air => &[
                "pm2_5",
                "pm10",
                "ozone",
                "nitrogen_dioxide",
                "carbon_monoxide",
            ],
        }
    }
}

impl std::fmt::Display for SeriesDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-aligned forecast channels. Every channel has exactly one value slot
/// per timestamp; a slot is `None` when upstream sent null for that hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHourlySeries")]
pub struct HourlySeries {
    timestamps: Vec<NaiveDateTime>,
    channels: BTreeMap<String, Vec<Option<f64>>>,
}

#[derive(Deserialize)]
struct RawHourlySeries {
    timestamps: Vec<NaiveDateTime>,
    channels: BTreeMap<String, Vec<Option<f64>>>,
}

impl TryFrom<RawHourlySeries> for HourlySeries {
    type Error = String;

    fn try_from(raw: RawHourlySeries) -> Result<Self, Self::Error> {
        HourlySeries::new(raw.timestamps, raw.channels)
    }
}

impl HourlySeries {
    /// Build a series, rejecting any channel whose length differs from the time axis.
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        channels: BTreeMap<String, Vec<Option<f64>>>,
    ) -> Result<Self, String> {
        if let Some((name, values)) = channels.iter().find(|(_, v)| v.len() != timestamps.len()) {
            return Err(format!(
                "channel '{name}' has {} values for {} timestamps",
                values.len(),
                timestamps.len()
            ));
        }

        Ok(Self { timestamps, channels })
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn channel(&self, name: &str) -> Option<&[Option<f64>]> {
        self.channels.get(name).map(Vec::as_slice)
    }

    pub fn channels(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.channels.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// The first `hours` entries of every channel, still aligned.
    pub fn window(&self, hours: usize) -> HourlySeries {
        let n = hours.min(self.timestamps.len());
        HourlySeries {
            timestamps: self.timestamps[..n].to_vec(),
            channels: self
                .channels
                .iter()
                .map(|(k, v)| (k.clone(), v[..n].to_vec()))
                .collect(),
        }
    }
}

/// Everything one lookup produces, handed to presentation in one piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardBundle {
    pub location: Coordinates,
    pub weather: WeatherSnapshot,
    pub air_quality: AirQualitySnapshot,
    pub hourly_weather: Option<HourlySeries>,
    pub hourly_air: Option<HourlySeries>,
}
