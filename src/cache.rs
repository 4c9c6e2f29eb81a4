//! Track cache.
//!
//! Stores tracks seen in earlier provider responses so later searches can be
//! answered partly from memory. Records come back tagged
//! [`TrackSource::Cache`], which lets the reconciler prefer fresh provider
//! data on collisions.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{IdentityKey, Track, TrackSource};

/// Default number of records kept by [`MemoryTrackCache`].
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// A store of previously seen tracks.
#[async_trait]
pub trait TrackCache: Send + Sync {
    /// Tracks whose title, artist or album contains `query`, case-insensitively.
    async fn search(&self, query: &str, limit: usize) -> Vec<Track>;

    /// Insert tracks, replacing stored records with the same identity key.
    async fn upsert(&self, tracks: &[Track]);
}

#[derive(Debug, Default)]
struct Store {
    /// Identity keys in first-insertion order, oldest first.
    order: VecDeque<IdentityKey>,
    tracks: HashMap<IdentityKey, Track>,
}

/// In-memory [`TrackCache`] holding at most `capacity` records.
///
/// Once full, the record inserted first is evicted. Replacing a record keeps
/// its position.
#[derive(Debug, Clone)]
pub struct MemoryTrackCache {
    store: Arc<RwLock<Store>>,
    capacity: usize,
}

impl Default for MemoryTrackCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl MemoryTrackCache {
    /// Create an empty cache with the default capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
            capacity,
        }
    }

    /// Number of stored tracks.
    pub async fn len(&self) -> usize {
        self.store.read().await.tracks.len()
    }

    /// Whether the cache holds no tracks.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.tracks.is_empty()
    }
}

fn matches(track: &Track, needle: &str) -> bool {
    [&track.title, &track.artist, &track.album]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[async_trait]
impl TrackCache for MemoryTrackCache {
    async fn search(&self, query: &str, limit: usize) -> Vec<Track> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let store = self.store.read().await;
        store
            .order
            .iter()
            .filter_map(|key| store.tracks.get(key))
            .filter(|t| matches(t, &needle))
            .take(limit)
            .map(|t| Track {
                source: TrackSource::Cache,
                ..t.clone()
            })
            .collect()
    }

    async fn upsert(&self, tracks: &[Track]) {
        let mut store = self.store.write().await;
        for track in tracks {
            let key = track.identity_key();
            if store.tracks.insert(key.clone(), track.clone()).is_none() {
                store.order.push_back(key);
            }
        }

        let mut evicted = 0;
        while store.tracks.len() > self.capacity {
            let Some(oldest) = store.order.pop_front() else {
                break;
            };
            store.tracks.remove(&oldest);
            evicted += 1;
        }
        debug!(
            "Track cache holds {} records ({} evicted)",
            store.tracks.len(),
            evicted
        );
    }
}
