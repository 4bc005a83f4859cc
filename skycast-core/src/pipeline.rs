//! City lookup orchestration: geocode, fan out the fetches, join, present.

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    DashboardBundle, DashboardError, SeriesDomain,
    presenter::{Phase, Presenter},
    provider::WeatherSource,
};

#[derive(Debug, Default)]
struct InFlight {
    generation: u64,
    token: Option<CancellationToken>,
}

#[derive(Debug)]
pub struct Pipeline {
    source: Box<dyn WeatherSource>,
    in_flight: Mutex<InFlight>,
}

impl Pipeline {
    pub fn new(source: Box<dyn WeatherSource>) -> Self {
        Self {
            source,
            in_flight: Mutex::new(InFlight::default()),
        }
    }

    /// Cancel the lookup currently in flight, if any.
    pub fn cancel(&self) {
        if let Some(token) = self.in_flight.lock().token.take() {
            token.cancel();
        }
    }

    /// Look up `city` and hand the results to `presenter`.
    ///
    /// Starting a lookup cancels any earlier one still running on this
    /// pipeline; the superseded call returns `Cancelled` without presenting
    /// anything.
    pub async fn load_city<P>(
        &self,
        city: &str,
        presenter: &mut P,
    ) -> Result<DashboardBundle, DashboardError>
    where
        P: Presenter + ?Sized,
    {
        let token = CancellationToken::new();
        let generation = {
            let mut slot = self.in_flight.lock();
            if let Some(previous) = slot.token.replace(token.clone()) {
                previous.cancel();
            }
            slot.generation += 1;
            slot.generation
        };

        presenter.clear_error();
        let result = self.run(city, &token, presenter).await;

        {
            let mut slot = self.in_flight.lock();
            if slot.generation == generation {
                slot.token = None;
            }
        }

        match result {
            Ok(bundle) => {
                transition(presenter, Phase::Done);
                presenter.render_panels(&bundle.weather, &bundle.air_quality);
                presenter.render_series(SeriesDomain::Weather, bundle.hourly_weather.as_ref());
                presenter.render_series(SeriesDomain::Air, bundle.hourly_air.as_ref());
                transition(presenter, Phase::Idle);
                Ok(bundle)
            }
            Err(DashboardError::Cancelled) => {
                tracing::info!(city, "lookup superseded");
                Err(DashboardError::Cancelled)
            }
            Err(err) => {
                tracing::warn!(city, error = %err, "lookup failed");
                transition(presenter, Phase::Error);
                presenter.show_error(&err.user_message());
                Err(err)
            }
        }
    }

    async fn run<P>(
        &self,
        city: &str,
        token: &CancellationToken,
        presenter: &mut P,
    ) -> Result<DashboardBundle, DashboardError>
    where
        P: Presenter + ?Sized,
    {
        let city = city.trim();
        if city.is_empty() {
            return Err(DashboardError::InvalidInput);
        }

        transition(presenter, Phase::Resolving);
        let location = self.source.resolve(city, token).await?;

        transition(presenter, Phase::Fetching);
        let fetch = token.child_token();
        let source = self.source.as_ref();

        let weather = async {
            let result = source.fetch_current_weather(&location, &fetch).await;
            if result.is_err() {
                // Weather is mandatory: stop the enrichment branches early.
                fetch.cancel();
            }
            result
        };

        let (weather, air_quality, hourly_weather, hourly_air) = tokio::join!(
            weather,
            source.fetch_current_air_quality(&location, &fetch),
            source.fetch_hourly(&location, SeriesDomain::Weather, &fetch),
            source.fetch_hourly(&location, SeriesDomain::Air, &fetch),
        );

        if token.is_cancelled() {
            return Err(DashboardError::Cancelled);
        }

        Ok(DashboardBundle {
            location,
            weather: weather?,
            air_quality,
            hourly_weather,
            hourly_air,
        })
    }
}

fn transition<P: Presenter + ?Sized>(presenter: &mut P, phase: Phase) {
    tracing::info!(%phase, "pipeline phase");
    presenter.phase_changed(phase);
}
