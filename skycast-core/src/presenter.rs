//! Interfaces the pipeline uses to hand results to the presentation layer.

use crate::{AirQualitySnapshot, HourlySeries, SeriesDomain, WeatherSnapshot};

/// Where a lookup currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Resolving,
    Fetching,
    Done,
    Error,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Resolving => "resolving",
            Phase::Fetching => "fetching",
            Phase::Done => "done",
            Phase::Error => "error",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumer of one lookup's results.
///
/// `clear_error` is called when a lookup starts and `show_error` at most once
/// when it fails. On success `render_panels` is called once and
/// `render_series` once per domain, absent series included.
pub trait Presenter {
    fn clear_error(&mut self);

    fn show_error(&mut self, message: &str);

    fn render_panels(&mut self, weather: &WeatherSnapshot, air_quality: &AirQualitySnapshot);

    fn render_series(&mut self, domain: SeriesDomain, series: Option<&HourlySeries>);

    fn phase_changed(&mut self, _phase: Phase) {}
}
