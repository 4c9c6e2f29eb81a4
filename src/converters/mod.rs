//! JSON to model converters.
//!
//! Each provider answers with its own payload shape. The functions here
//! turn raw provider JSON into normalized [`Track`](crate::models::Track)
//! records.

pub mod deezer;
pub mod itunes;

use serde_json::Value;

/// Shown when a provider has no artwork for a track.
pub const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/600x600?text=No+Image";

/// Get a non-empty string from JSON.
fn get_str<'a>(json: &'a Value, key: &str) -> Option<&'a str> {
    json.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}

/// Get an owned non-empty string from JSON.
fn get_string(json: &Value, key: &str) -> Option<String> {
    get_str(json, key).map(|s| s.to_string())
}

/// Get a numeric ID from JSON (handles both numeric and string IDs).
fn get_id(json: &Value, key: &str) -> Option<i64> {
    json.get(key).and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
    })
}

/// Get u64 from JSON.
fn get_u64(json: &Value, key: &str) -> Option<u64> {
    json.get(key).and_then(|v| v.as_u64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_str_skips_empty() {
        let json = json!({"a": "", "b": "x"});
        assert_eq!(get_str(&json, "a"), None);
        assert_eq!(get_str(&json, "b"), Some("x"));
        assert_eq!(get_str(&json, "c"), None);
    }

    #[test]
    fn test_get_id_accepts_strings() {
        let json = json!({"n": 3135556, "s": "42", "bad": "abc"});
        assert_eq!(get_id(&json, "n"), Some(3135556));
        assert_eq!(get_id(&json, "s"), Some(42));
        assert_eq!(get_id(&json, "bad"), None);
    }
}
