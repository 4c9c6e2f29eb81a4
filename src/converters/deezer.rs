//! Deezer public API payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::{get_id, get_str, get_string, get_u64, PLACEHOLDER_COVER};
use crate::error::{CatalogError, Result};
use crate::models::{Track, TrackSource};

/// Cover fields from largest to smallest.
const COVER_FIELDS: [&str; 4] = ["cover_xl", "cover_big", "cover_medium", "cover_small"];

/// Error code Deezer uses for "no data".
pub const NO_DATA_ERROR_CODE: i64 = 800;

/// Pick the largest album cover.
pub fn best_cover_image(album: &Value) -> String {
    COVER_FIELDS
        .iter()
        .find_map(|field| get_string(album, field))
        .unwrap_or_else(|| PLACEHOLDER_COVER.to_string())
}

/// Parse "YYYY-MM-DD" into midnight UTC.
fn parse_release_date(json: &Value) -> Option<DateTime<Utc>> {
    get_str(json, "release_date")
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

/// Parse a track from raw JSON.
pub fn parse_track(json: &Value) -> Result<Track> {
    let id = get_id(json, "id")
        .ok_or_else(|| CatalogError::ApiError("Missing track ID".to_string()))?;

    let album = json.get("album").cloned().unwrap_or(Value::Null);
    let artist = json.get("artist").cloned().unwrap_or(Value::Null);

    Ok(Track {
        title: get_str(json, "title").unwrap_or("Unknown").to_string(),
        artist: get_str(&artist, "name")
            .unwrap_or("Unknown Artist")
            .to_string(),
        album: get_str(&album, "title")
            .unwrap_or("Unknown Album")
            .to_string(),
        cover_image: best_cover_image(&album),
        preview_url: get_string(json, "preview"),
        full_track_url: get_string(json, "link"),
        external_id: Some(id),
        duration: get_u64(json, "duration").map(|secs| secs * 1000),
        genre: None,
        release_date: parse_release_date(json),
        source: TrackSource::Deezer,
    })
}

/// Parse a search response. Entries without an ID are skipped.
pub fn parse_search_results(response: &Value) -> Vec<Track> {
    response
        .get("data")
        .and_then(|d| d.as_array())
        .map(|data| {
            data.iter()
                .filter_map(|t| parse_track(t).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Extract the error object of a response, if it has one.
///
/// Returns the error code (when present) and message.
pub fn api_error(response: &Value) -> Option<(Option<i64>, String)> {
    let error = response.get("error")?;
    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("Unknown error")
        .to_string();
    Some((error.get("code").and_then(|c| c.as_i64()), message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track_json() -> Value {
        json!({
            "id": 3135556,
            "title": "Harder, Better, Faster, Stronger",
            "link": "https://www.deezer.com/track/3135556",
            "duration": 224,
            "preview": "https://cdns-preview.example.com/preview.mp3",
            "release_date": "2001-03-07",
            "artist": {"id": 27, "name": "Daft Punk"},
            "album": {
                "id": 302127,
                "title": "Discovery",
                "cover_small": "https://e-cdns-images.example.com/56x56.jpg",
                "cover_xl": "https://e-cdns-images.example.com/1000x1000.jpg"
            },
            "type": "track"
        })
    }

    #[test]
    fn test_parse_track() {
        let track = parse_track(&track_json()).unwrap();
        assert_eq!(track.external_id, Some(3135556));
        assert_eq!(track.artist, "Daft Punk");
        assert_eq!(track.album, "Discovery");
        assert_eq!(track.duration, Some(224_000));
        assert_eq!(track.cover_image, "https://e-cdns-images.example.com/1000x1000.jpg");
        assert_eq!(
            track.release_date.map(|d| d.date_naive().to_string()),
            Some("2001-03-07".to_string())
        );
        assert_eq!(track.source, TrackSource::Deezer);
    }

    #[test]
    fn test_parse_track_requires_id() {
        assert!(parse_track(&json!({"title": "No id"})).is_err());
    }

    #[test]
    fn test_search_results_skip_invalid_entries() {
        let response = json!({"data": [track_json(), {"title": "broken"}], "total": 2});
        let tracks = parse_search_results(&response);
        assert_eq!(tracks.len(), 1);
    }

    #[test]
    fn test_api_error() {
        let response = json!({"error": {"type": "DataException", "message": "no data", "code": 800}});
        assert_eq!(
            api_error(&response),
            Some((Some(NO_DATA_ERROR_CODE), "no data".to_string()))
        );
        assert_eq!(api_error(&track_json()), None);
    }
}
