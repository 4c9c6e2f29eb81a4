//! Track model and identity keys.
//!
//! A [`Track`] is the normalized record returned to clients, assembled per
//! request from provider responses or cache lookups.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a track record came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackSource {
    /// Apple iTunes Search API.
    #[default]
    Itunes,
    /// Deezer public API.
    Deezer,
    /// Locally curated record.
    Local,
    /// Previously seen record served from the track cache.
    Cache,
}

impl TrackSource {
    /// Get the tag used in JSON payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackSource::Itunes => "itunes",
            TrackSource::Deezer => "deezer",
            TrackSource::Local => "local",
            TrackSource::Cache => "cache",
        }
    }
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized `(title, artist, album)` tuple: trimmed and case-folded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FallbackKey {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl FallbackKey {
    fn normalize(value: &str) -> String {
        value.trim().to_lowercase()
    }
}

/// Value used to recognize two records as the same song.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    /// Provider-assigned identifier.
    External(i64),
    /// Normalized metadata tuple, used when no identifier is known.
    Fallback(FallbackKey),
}

/// A normalized track record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Track title.
    pub title: String,

    /// Artist name.
    pub artist: String,

    /// Album title, possibly empty.
    #[serde(default)]
    pub album: String,

    /// Cover image URL.
    #[serde(default)]
    pub cover_image: String,

    /// Short audio preview URL.
    #[serde(default)]
    pub preview_url: Option<String>,

    /// Store page for the full track.
    #[serde(default)]
    pub full_track_url: Option<String>,

    /// Provider-assigned identifier.
    #[serde(default)]
    pub external_id: Option<i64>,

    /// Duration in milliseconds.
    #[serde(default)]
    pub duration: Option<u64>,

    /// Primary genre.
    #[serde(default)]
    pub genre: Option<String>,

    /// Release date.
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,

    /// Provenance tag.
    #[serde(default)]
    pub source: TrackSource,
}

impl Track {
    /// Create a track with just the required fields.
    pub fn new<S1: Into<String>, S2: Into<String>>(title: S1, artist: S2) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            ..Default::default()
        }
    }

    /// The normalized metadata tuple of this track.
    pub fn fallback_key(&self) -> FallbackKey {
        FallbackKey {
            title: FallbackKey::normalize(&self.title),
            artist: FallbackKey::normalize(&self.artist),
            album: FallbackKey::normalize(&self.album),
        }
    }

    /// `external_id` when present, else the normalized metadata tuple.
    pub fn identity_key(&self) -> IdentityKey {
        match self.external_id {
            Some(id) => IdentityKey::External(id),
            None => IdentityKey::Fallback(self.fallback_key()),
        }
    }

    /// Whether the track carries a provider identifier.
    pub fn has_external_id(&self) -> bool {
        self.external_id.is_some()
    }

    /// Whether the track is complete enough to be stored.
    ///
    /// Requires a non-blank title, artist and cover image.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.artist.trim().is_empty()
            && !self.cover_image.trim().is_empty()
    }
}
