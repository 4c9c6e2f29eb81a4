//! iTunes Search API client.
//!
//! Public API, no authentication. See
//! <https://performance-partners.apple.com/search-api>.

use async_trait::async_trait;
use tracing::error;

use super::client::{ClientOptions, JsonClient};
use super::{require_query, LookupOptions, Provider, SearchOptions};
use crate::converters::itunes as convert;
use crate::error::Result;
use crate::models::{Track, TrackSource};

/// Base URL for the iTunes Search API.
pub const API_BASE_URL: &str = "https://itunes.apple.com";

/// Largest `limit` the search endpoint accepts.
const MAX_SEARCH_LIMIT: usize = 200;

/// iTunes catalog provider.
///
/// # Example
///
/// ```rust,no_run
/// use riffus::api::{ClientOptions, ItunesApi, Provider, SearchOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = ItunesApi::new(ClientOptions::new(riffus::api::itunes::API_BASE_URL))?;
///     let tracks = api.search("kind of blue", &SearchOptions::default()).await?;
///     println!("Found {} tracks", tracks.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ItunesApi {
    http: JsonClient,
}

impl ItunesApi {
    /// Create a new iTunes client.
    pub fn new(options: ClientOptions) -> Result<Self> {
        Ok(Self {
            http: JsonClient::new(options)?,
        })
    }
}

#[async_trait]
impl Provider for ItunesApi {
    fn name(&self) -> &str {
        "itunes"
    }

    fn source(&self) -> TrackSource {
        TrackSource::Itunes
    }

    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<Track>> {
        let query = require_query(query)?;
        let params = [
            ("term", query.to_string()),
            ("media", options.media.clone()),
            ("entity", options.entity.clone()),
            ("limit", options.limit.min(MAX_SEARCH_LIMIT).to_string()),
            ("country", options.country.clone()),
        ];

        let envelope = self
            .http
            .get("/search", &params)
            .await
            .inspect_err(|e| error!("iTunes search failed: {}", e))?;

        Ok(convert::parse_search_results(&envelope))
    }

    async fn lookup(&self, id: i64, options: &LookupOptions) -> Result<Option<Track>> {
        let params = [("id", id.to_string()), ("country", options.country.clone())];

        let envelope = self
            .http
            .get("/lookup", &params)
            .await
            .inspect_err(|e| error!("iTunes lookup of {} failed: {}", id, e))?;

        Ok(convert::parse_lookup_result(&envelope))
    }
}
