//! Music catalog providers.
//!
//! A [`Provider`] searches an upstream catalog and looks tracks up by their
//! provider identifier. Two implementations are available:
//! - [`ItunesApi`]: Apple iTunes Search API
//! - [`DeezerApi`]: Deezer public API
//!
//! Both route every request through a [`RetryPolicy`](crate::retry::RetryPolicy).

mod client;
pub mod deezer;
pub mod itunes;
#[cfg(test)]
pub(crate) mod stub;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{CatalogError, Result};
use crate::models::{Track, TrackSource};

pub use client::ClientOptions;
pub use deezer::DeezerApi;
pub use itunes::ItunesApi;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 25;

/// Default storefront country.
pub const DEFAULT_COUNTRY: &str = "us";

/// Options for a search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of results.
    pub limit: usize,
    /// Two-letter storefront country code.
    pub country: String,
    /// Media type (iTunes only).
    pub media: String,
    /// Entity type (iTunes only).
    pub entity: String,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
            country: DEFAULT_COUNTRY.to_string(),
            media: "music".to_string(),
            entity: "song".to_string(),
        }
    }
}

impl SearchOptions {
    /// Default options with the given limit and country.
    pub fn new<S: Into<String>>(limit: usize, country: S) -> Self {
        Self {
            limit,
            country: country.into(),
            ..Default::default()
        }
    }
}

/// Options for a lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOptions {
    /// Two-letter storefront country code.
    pub country: String,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

/// An upstream music catalog.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Tag carried by the tracks this provider returns.
    fn source(&self) -> TrackSource;

    /// Search tracks matching `query`.
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<Track>>;

    /// Look a track up by its provider identifier.
    async fn lookup(&self, id: i64, options: &LookupOptions) -> Result<Option<Track>>;
}

/// Available provider implementations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    Itunes,
    Deezer,
}

impl ProviderKind {
    /// Production base URL of the provider.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Itunes => itunes::API_BASE_URL,
            ProviderKind::Deezer => deezer::API_BASE_URL,
        }
    }

    /// Construct the provider.
    pub fn build(&self, options: ClientOptions) -> Result<Arc<dyn Provider>> {
        Ok(match self {
            ProviderKind::Itunes => Arc::new(ItunesApi::new(options)?),
            ProviderKind::Deezer => Arc::new(DeezerApi::new(options)?),
        })
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Itunes => f.write_str("itunes"),
            ProviderKind::Deezer => f.write_str("deezer"),
        }
    }
}

/// Trimmed query, or a validation error when it is blank.
pub fn require_query(query: &str) -> Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CatalogError::Validation(
            "Search query is required".to_string(),
        ));
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_query() {
        assert_eq!(require_query("  jazz ").unwrap(), "jazz");
        assert!(matches!(
            require_query("   "),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn test_search_options_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.limit, 25);
        assert_eq!(options.country, "us");
        assert_eq!(options.media, "music");
        assert_eq!(options.entity, "song");
    }

    #[test]
    fn test_build_selects_provider() {
        let kind = ProviderKind::Deezer;
        let provider = kind
            .build(ClientOptions::new(kind.default_base_url()))
            .unwrap();
        assert_eq!(provider.name(), "deezer");
        assert_eq!(provider.source(), TrackSource::Deezer);
    }
}
