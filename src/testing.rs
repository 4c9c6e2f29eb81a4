//! Test doubles shared by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{LookupOptions, Provider, SearchOptions};
use crate::error::{CatalogError, Result};
use crate::models::{Track, TrackSource};

/// Provider answering from a fixed list of tracks.
pub(crate) struct StubProvider {
    pub tracks: Vec<Track>,
    pub fail: bool,
    /// Countries seen by `search`, in call order.
    pub countries: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            fail: false,
            countries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    fn unavailable() -> CatalogError {
        CatalogError::Upstream {
            status: 503,
            message: "Service Unavailable".to_string(),
        }
    }
}

#[async_trait]
impl Provider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn source(&self) -> TrackSource {
        TrackSource::Itunes
    }

    async fn search(&self, _query: &str, options: &SearchOptions) -> Result<Vec<Track>> {
        self.countries.lock().unwrap().push(options.country.clone());
        if self.fail {
            return Err(Self::unavailable());
        }
        Ok(self.tracks.clone())
    }

    async fn lookup(&self, id: i64, _options: &LookupOptions) -> Result<Option<Track>> {
        if self.fail {
            return Err(Self::unavailable());
        }
        Ok(self
            .tracks
            .iter()
            .find(|t| t.external_id == Some(id))
            .cloned())
    }
}

/// A valid track with the given title, id and source.
pub(crate) fn track(title: &str, external_id: Option<i64>, source: TrackSource) -> Track {
    Track {
        external_id,
        source,
        cover_image: "https://example.com/cover.jpg".to_string(),
        ..Track::new(title, "Artist")
    }
}
