//! Geocoding providers
//!
//! `find_location` turns free-text queries into coordinates through the
//! `Geocoder` trait. `Ok(None)` means the provider answered with no match;
//! `Err` means the lookup itself failed. The ordered-fallback loop treats both
//! the same way (move on to the next group), so providers never need to blur
//! the distinction themselves.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::geo::LatLng;
use crate::core::options::MapFieldOptions;

/// Key the bundled HTTP provider is registered under.
pub const HTTP_PROVIDER: &str = "http";

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocode request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider-defined failure, for geocoders not built on the bundled HTTP call.
    #[error("geocode lookup failed: {0}")]
    Failed(String),
}

/// Resolves a free-text query to a coordinate.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the provider has no match for the query.
    async fn geocode(&self, query: &str) -> Result<Option<LatLng>, GeocodeError>;
}

/// Geocoder that never matches; the `none` behaviour resolves to this.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGeocoder;

#[async_trait]
impl Geocoder for NullGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Option<LatLng>, GeocodeError> {
        Ok(None)
    }
}

/// Single-endpoint HTTP geocoder.
///
/// Issues `GET {url}?q={query}` (the configured URL carries any API key) and
/// takes the first entry of the `matches` array in the JSON response.
#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    client: reqwest::Client,
    url: String,
}

impl HttpGeocoder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    matches: Vec<GeocodeMatch>,
}

#[derive(Debug, Deserialize)]
struct GeocodeMatch {
    point: [f64; 2],
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<LatLng>, GeocodeError> {
        let response: GeocodeResponse = self
            .client
            .get(&self.url)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let found = response
            .matches
            .into_iter()
            .next()
            .map(|entry| LatLng::new(entry.point[0], entry.point[1]));
        // An out-of-range point from a misbehaving provider counts as no match
        Ok(found.filter(LatLng::is_valid))
    }
}

/// Factory for the bundled HTTP provider; fails when `geocode_url` is unset.
pub fn http_geocoder(options: &MapFieldOptions) -> Result<Arc<dyn Geocoder>, ConfigError> {
    match &options.geocode_url {
        Some(url) => Ok(Arc::new(HttpGeocoder::new(url.clone()))),
        None => Err(ConfigError::MissingOption {
            option: "geocode_url",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_decoding() {
        let parsed: GeocodeResponse =
            serde_json::from_str(r#"{"matches": [{"point": [55.0, 2.0]}]}"#).unwrap();
        assert_eq!(parsed.matches.len(), 1);
        assert_eq!(parsed.matches[0].point, [55.0, 2.0]);

        // A response with no matches field decodes to an empty list
        let empty: GeocodeResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.matches.is_empty());
    }

    #[tokio::test]
    async fn test_null_geocoder_never_matches() {
        let result = NullGeocoder.geocode("anywhere").await.unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_http_factory_requires_url() {
        let options = MapFieldOptions::default();
        assert!(matches!(
            http_geocoder(&options),
            Err(ConfigError::MissingOption {
                option: "geocode_url"
            })
        ));

        let configured = MapFieldOptions {
            geocode_url: Some("https://geocode.example/api?key=k".to_string()),
            ..MapFieldOptions::default()
        };
        assert!(http_geocoder(&configured).is_ok());
    }
}
