use std::future::Future;

use reqwest::Client;
use serde::Deserialize;

use crate::planning::domain::Coordinate;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeocodingError {
    #[error("geocoding transport failed: {0}")]
    Transport(String),
    #[error("geocoding service responded with status {0}")]
    Status(u16),
    #[error("malformed geocoding response: {0}")]
    Malformed(String),
}

/// Resolves free-text place names into coordinates.
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` means the service answered but knows no such place.
    fn geocode(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, GeocodingError>> + Send;
}

/// Geocoder backed by a Nominatim-compatible `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>, GeocodingError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("format", "json"), ("q", query), ("limit", "1")])
            .send()
            .await
            .map_err(|err| GeocodingError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::Status(status.as_u16()));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|err| GeocodingError::Malformed(err.to_string()))?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let lat = place
            .lat
            .trim()
            .parse::<f64>()
            .map_err(|err| GeocodingError::Malformed(format!("latitude '{}': {err}", place.lat)))?;
        let lon = place
            .lon
            .trim()
            .parse::<f64>()
            .map_err(|err| GeocodingError::Malformed(format!("longitude '{}': {err}", place.lon)))?;

        Ok(Some(Coordinate::new(lat, lon)))
    }
}
