//! Public Deezer API client.
//!
//! This module provides a provider backed by the public Deezer API
//! (api.deezer.com). No authentication is required.

use async_trait::async_trait;
use serde_json::Value;
use tracing::error;

use super::client::{ClientOptions, JsonClient};
use super::{require_query, LookupOptions, Provider, SearchOptions};
use crate::converters::deezer as convert;
use crate::error::{CatalogError, Result};
use crate::models::{Track, TrackSource};

/// Base URL for the Deezer public API.
pub const API_BASE_URL: &str = "https://api.deezer.com/";

/// Deezer catalog provider.
///
/// Deezer ignores storefront countries, so `country` options are unused.
#[derive(Debug, Clone)]
pub struct DeezerApi {
    http: JsonClient,
}

impl DeezerApi {
    /// Create a new Deezer client.
    pub fn new(options: ClientOptions) -> Result<Self> {
        Ok(Self {
            http: JsonClient::new(options)?,
        })
    }

    /// Make a GET request and surface in-band API errors.
    ///
    /// Deezer answers 200 with an `error` object on failure; "no data" maps
    /// to [`CatalogError::NotFound`].
    async fn get_api(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let data = self.http.get(endpoint, params).await?;

        if let Some((code, message)) = convert::api_error(&data) {
            if code == Some(convert::NO_DATA_ERROR_CODE) {
                return Err(CatalogError::NotFound(endpoint.to_string()));
            }
            error!("Deezer API error: {}", message);
            return Err(CatalogError::ApiError(message));
        }

        Ok(data)
    }
}

#[async_trait]
impl Provider for DeezerApi {
    fn name(&self) -> &str {
        "deezer"
    }

    fn source(&self) -> TrackSource {
        TrackSource::Deezer
    }

    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<Track>> {
        let query = require_query(query)?;
        let params = [
            ("q", query.to_string()),
            ("limit", options.limit.to_string()),
        ];

        match self.get_api("search/track", &params).await {
            Ok(response) => Ok(convert::parse_search_results(&response)),
            Err(CatalogError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn lookup(&self, id: i64, _options: &LookupOptions) -> Result<Option<Track>> {
        match self.get_api(&format!("track/{}", id), &[]).await {
            Ok(track_json) => convert::parse_track(&track_json).map(Some),
            Err(CatalogError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub;
    use crate::retry::RetryPolicy;
    use axum::{extract::Path, routing::get, Json, Router};
    use serde_json::json;
    use std::time::Duration;

    fn options(base_url: String) -> ClientOptions {
        ClientOptions {
            base_url: format!("{}/", base_url),
            retry: RetryPolicy::new(2, Duration::from_millis(10), Duration::from_secs(5)),
            retry_client_errors: true,
        }
    }

    fn track_json(id: i64, title: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "duration": 180,
            "artist": {"name": "Daft Punk"},
            "album": {"title": "Discovery", "cover_big": "https://cdn.example.com/500.jpg"}
        })
    }

    fn router() -> Router {
        Router::new()
            .route(
                "/search/track",
                get(|| async {
                    Json(json!({
                        "data": [track_json(1, "One More Time"), track_json(2, "Aerodynamic")],
                        "total": 2
                    }))
                }),
            )
            .route(
                "/track/{id}",
                get(|Path(id): Path<i64>| async move {
                    match id {
                        1 => Json(track_json(1, "One More Time")),
                        5 => Json(json!({"error": {"type": "Exception", "message": "Quota limit exceeded", "code": 4}})),
                        _ => Json(json!({"error": {"type": "DataException", "message": "no data", "code": 800}})),
                    }
                }),
            )
    }

    #[tokio::test]
    async fn test_search() {
        let api = DeezerApi::new(options(stub::spawn(router()).await)).unwrap();

        let tracks = api.search("daft punk", &SearchOptions::default()).await.unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].source, TrackSource::Deezer);
        assert_eq!(tracks[1].cover_image, "https://cdn.example.com/500.jpg");
    }

    #[tokio::test]
    async fn test_lookup_maps_no_data_to_none() {
        let api = DeezerApi::new(options(stub::spawn(router()).await)).unwrap();

        let found = api.lookup(1, &LookupOptions::default()).await.unwrap();
        assert_eq!(found.and_then(|t| t.external_id), Some(1));

        let missing = api.lookup(404, &LookupOptions::default()).await.unwrap();
        assert!(missing.is_none());

        let failed = api.lookup(5, &LookupOptions::default()).await;
        assert!(matches!(failed, Err(CatalogError::ApiError(_))));
    }
}
