//! Song operations behind the HTTP endpoints.
//!
//! [`SongService`] owns the injected provider and optional cache and
//! combines them: provider results are written back to the cache and merged
//! with cached records through the [`Reconciler`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::{require_query, LookupOptions, Provider, SearchOptions, DEFAULT_COUNTRY};
use crate::cache::TrackCache;
use crate::error::{CatalogError, Result};
use crate::models::Track;
use crate::reconcile::Reconciler;

/// User recorded on orders placed without one.
pub const GUEST_USER: &str = "guest";

/// An acknowledged order.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub user_id: String,
    pub song: Track,
    pub created_at: DateTime<Utc>,
}

/// Parse a provider track identifier supplied by a client.
pub fn parse_track_id(raw: Option<&str>) -> Result<i64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| CatalogError::Validation("trackId parameter is required".to_string()))
}

/// Search, lookup and acknowledgement operations.
pub struct SongService {
    provider: Arc<dyn Provider>,
    cache: Option<Arc<dyn TrackCache>>,
    reconciler: Reconciler,
    default_country: String,
}

impl SongService {
    /// Service over `provider` without a cache.
    ///
    /// Collisions during reconciliation prefer the provider's own records.
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        let reconciler = Reconciler::new(provider.source());
        Self {
            provider,
            cache: None,
            reconciler,
            default_country: DEFAULT_COUNTRY.to_string(),
        }
    }

    /// Attach a track cache.
    pub fn with_cache(mut self, cache: Arc<dyn TrackCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Country used when a request does not name one.
    pub fn with_default_country<S: Into<String>>(mut self, country: S) -> Self {
        self.default_country = country.into();
        self
    }

    fn country(&self, country: Option<&str>) -> String {
        country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(self.default_country.as_str())
            .to_lowercase()
    }

    /// Search cached and remote tracks and merge them.
    ///
    /// When the provider fails but the cache had matches, the cached
    /// records are returned alone.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        country: Option<&str>,
    ) -> Result<Vec<Track>> {
        let query = require_query(query)?;

        let cached = match &self.cache {
            Some(cache) => cache.search(query, limit).await,
            None => Vec::new(),
        };

        let options = SearchOptions::new(limit, self.country(country));
        let remote = match self.provider.search(query, &options).await {
            Ok(tracks) => tracks,
            Err(e) if !cached.is_empty() => {
                warn!(
                    "{} search failed, serving {} cached tracks: {}",
                    self.provider.name(),
                    cached.len(),
                    e
                );
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        self.remember(&remote).await;

        debug!(
            "Reconciling {} cached and {} remote tracks for '{}'",
            cached.len(),
            remote.len(),
            query
        );
        Ok(self.reconciler.reconcile([cached, remote], Some(limit)))
    }

    /// Provider-only search used for the browse feeds.
    pub async fn browse(&self, term: &str, limit: usize) -> Result<Vec<Track>> {
        let options = SearchOptions::new(limit, self.default_country.clone());
        let remote = self.provider.search(term, &options).await?;
        Ok(self.reconciler.reconcile([remote], Some(limit)))
    }

    /// Look a track up by a client-supplied identifier.
    pub async fn lookup(&self, raw_id: Option<&str>, country: Option<&str>) -> Result<Track> {
        let id = parse_track_id(raw_id)?;
        let options = LookupOptions {
            country: self.country(country),
        };

        let track = self
            .provider
            .lookup(id, &options)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("track {}", id)))?;

        self.remember(std::slice::from_ref(&track)).await;
        Ok(track)
    }

    /// Validate that the track exists and acknowledge the order.
    pub async fn order(
        &self,
        user_id: Option<String>,
        raw_id: Option<&str>,
        country: Option<&str>,
    ) -> Result<Order> {
        let song = self.lookup(raw_id, country).await?;
        Ok(Order {
            user_id: user_id
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| GUEST_USER.to_string()),
            song,
            created_at: Utc::now(),
        })
    }

    /// Write valid tracks back to the cache.
    async fn remember(&self, tracks: &[Track]) {
        let Some(cache) = &self.cache else {
            return;
        };
        let valid: Vec<Track> = tracks.iter().filter(|t| t.is_valid()).cloned().collect();
        if !valid.is_empty() {
            cache.upsert(&valid).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryTrackCache;
    use crate::models::TrackSource;
    use crate::testing::{track, StubProvider};

    #[test]
    fn test_parse_track_id() {
        assert_eq!(parse_track_id(Some(" 123 ")).unwrap(), 123);
        assert!(matches!(parse_track_id(None), Err(CatalogError::Validation(_))));
        assert!(parse_track_id(Some("")).is_err());
        assert!(parse_track_id(Some("12ab")).is_err());
    }

    #[tokio::test]
    async fn test_search_merges_cache_and_provider() {
        let cache = Arc::new(MemoryTrackCache::new());
        cache
            .upsert(&[
                track("Jazz Cached Shared", Some(1), TrackSource::Itunes),
                track("Jazz Cached Only", None, TrackSource::Itunes),
            ])
            .await;
        let provider = StubProvider::new(vec![
            track("Jazz Remote Shared", Some(1), TrackSource::Itunes),
            track("Jazz Remote Only", Some(2), TrackSource::Itunes),
        ]);
        let service = SongService::new(Arc::new(provider)).with_cache(cache.clone());

        let songs = service.search("jazz", 25, Some("GB")).await.unwrap();

        let titles: Vec<_> = songs.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Jazz Remote Shared", "Jazz Remote Only", "Jazz Cached Only"]
        );
        assert_eq!(cache.len().await, 3);
    }

    #[tokio::test]
    async fn test_search_lowercases_country_and_applies_limit() {
        let provider = Arc::new(StubProvider::new(
            (1..=5)
                .map(|i| track(&format!("t{}", i), Some(i), TrackSource::Itunes))
                .collect(),
        ));
        let service = SongService::new(provider.clone());

        let songs = service.search("t", 2, Some("GB")).await.unwrap();

        assert_eq!(songs.len(), 2);
        assert_eq!(*provider.countries.lock().unwrap(), vec!["gb".to_string()]);
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let service = SongService::new(Arc::new(StubProvider::new(Vec::new())));
        let result = service.search("   ", 10, None).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_cache() {
        let cache = Arc::new(MemoryTrackCache::new());
        cache
            .upsert(&[track("Cached Jazz", Some(1), TrackSource::Itunes)])
            .await;
        let service = SongService::new(Arc::new(StubProvider::failing())).with_cache(cache);

        let songs = service.search("jazz", 10, None).await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].source, TrackSource::Cache);

        let result = service.search("rock", 10, None).await;
        assert!(matches!(result, Err(CatalogError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_invalid_tracks_are_not_cached() {
        let cache = Arc::new(MemoryTrackCache::new());
        let provider = StubProvider::new(vec![
            track("Valid", Some(1), TrackSource::Itunes),
            Track {
                external_id: Some(2),
                ..Track::new("No Cover", "Artist")
            },
        ]);
        let service = SongService::new(Arc::new(provider)).with_cache(cache.clone());

        let songs = service.search("x", 10, None).await.unwrap();

        assert_eq!(songs.len(), 2);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_lookup_and_order() {
        let provider = StubProvider::new(vec![track("Found", Some(7), TrackSource::Itunes)]);
        let service = SongService::new(Arc::new(provider));

        assert_eq!(service.lookup(Some("7"), None).await.unwrap().title, "Found");
        assert!(matches!(
            service.lookup(Some("8"), None).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            service.lookup(Some("abc"), None).await,
            Err(CatalogError::Validation(_))
        ));

        let order = service.order(None, Some("7"), None).await.unwrap();
        assert_eq!(order.user_id, GUEST_USER);
        assert_eq!(order.song.external_id, Some(7));

        let order = service
            .order(Some("u-1".to_string()), Some("7"), None)
            .await
            .unwrap();
        assert_eq!(order.user_id, "u-1");
    }
}
