//! Forward geocoding: free-text place name to coordinates.

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{Coordinates, DashboardError, Stage};

use super::open_meteo::OpenMeteoProvider;

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeoPlace>>,
}

#[derive(Debug, Deserialize)]
struct GeoPlace {
    latitude: f64,
    longitude: f64,
    name: String,
    country_code: Option<String>,
}

impl OpenMeteoProvider {
    /// Resolve `city` to its single best match. Zero matches is `NotFound`.
    pub async fn geocode(
        &self,
        city: &str,
        cancel: &CancellationToken,
    ) -> Result<Coordinates, DashboardError> {
        let query = [("name", city.to_string()), ("count", "1".to_string())];

        let parsed: GeocodingResponse = self
            .get_json(Stage::Geocoding, &self.endpoints.geocoding, &query, cancel)
            .await?;

        let coords = best_match(city, parsed)?;
        tracing::info!(
            query = city,
            name = %coords.name,
            country = %coords.country_code,
            lat = coords.latitude,
            lon = coords.longitude,
            "resolved location"
        );
        Ok(coords)
    }
}

fn best_match(query: &str, parsed: GeocodingResponse) -> Result<Coordinates, DashboardError> {
    let place = parsed
        .results
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| DashboardError::NotFound {
            query: query.to_string(),
        })?;

    Ok(Coordinates {
        latitude: place.latitude,
        longitude: place.longitude,
        name: place.name,
        country_code: place.country_code.unwrap_or_default(),
    })
}
