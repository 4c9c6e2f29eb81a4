//! iTunes Search API payloads.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{get_id, get_str, get_string, get_u64, PLACEHOLDER_COVER};
use crate::models::{Track, TrackSource};

/// Artwork fields from largest to smallest, with their size token.
const ARTWORK_FIELDS: [(&str, &str); 3] = [
    ("artworkUrl100", "100x100"),
    ("artworkUrl60", "60x60"),
    ("artworkUrl30", "30x30"),
];

/// Size requested when upgrading artwork URLs.
const UPGRADED_ARTWORK_SIZE: &str = "600x600";

/// Pick the best cover image.
///
/// iTunes serves 30x30, 60x60 and 100x100 artwork; rewriting the size token
/// of the largest available URL yields a 600x600 image.
pub fn best_cover_image(json: &Value) -> String {
    ARTWORK_FIELDS
        .iter()
        .find_map(|(field, size)| {
            get_str(json, field).map(|url| url.replacen(size, UPGRADED_ARTWORK_SIZE, 1))
        })
        .unwrap_or_else(|| PLACEHOLDER_COVER.to_string())
}

fn parse_release_date(json: &Value) -> Option<DateTime<Utc>> {
    get_str(json, "releaseDate")
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
}

/// Parse a single iTunes result.
pub fn parse_track(json: &Value) -> Track {
    Track {
        title: get_str(json, "trackName")
            .or_else(|| get_str(json, "collectionName"))
            .unwrap_or("Unknown")
            .to_string(),
        artist: get_str(json, "artistName")
            .unwrap_or("Unknown Artist")
            .to_string(),
        album: get_str(json, "collectionName")
            .unwrap_or("Unknown Album")
            .to_string(),
        cover_image: best_cover_image(json),
        preview_url: get_string(json, "previewUrl"),
        full_track_url: get_string(json, "trackViewUrl"),
        external_id: get_id(json, "trackId"),
        duration: get_u64(json, "trackTimeMillis"),
        genre: get_string(json, "primaryGenreName"),
        release_date: parse_release_date(json),
        source: TrackSource::Itunes,
    }
}

/// Parse a search envelope, keeping only actual songs.
pub fn parse_search_results(envelope: &Value) -> Vec<Track> {
    envelope
        .get("results")
        .and_then(|r| r.as_array())
        .map(|results| {
            results
                .iter()
                .filter(|r| r.get("kind").and_then(|k| k.as_str()) == Some("song"))
                .map(parse_track)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse a lookup envelope: the first result, if any.
pub fn parse_lookup_result(envelope: &Value) -> Option<Track> {
    envelope
        .get("results")
        .and_then(|r| r.as_array())
        .and_then(|results| results.first())
        .map(parse_track)
}
